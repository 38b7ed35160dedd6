// Filter domain: stage kernels, the linear chain, and slider-driven parameter control.

pub mod chain;
pub mod controller;
pub mod error;
pub mod ops;
pub mod stage;
pub mod types;
