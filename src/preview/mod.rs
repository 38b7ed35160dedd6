// Downstream sinks: live preview ring buffer and still-photo capture.

pub mod buffer;
pub mod snapshot;
