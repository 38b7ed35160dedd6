// Pipeline diagnostics: frame rate, routing counts, sink failures.

pub mod stats;
