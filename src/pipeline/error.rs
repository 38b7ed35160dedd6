use thiserror::Error;

use crate::frame::FrameError;

/// Frame pipeline errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("sink '{sink}' rejected frame: {message}")]
    Sink { sink: String, message: String },

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("JPEG encoding failed: {0}")]
    Encode(String),
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, PipelineError>;
