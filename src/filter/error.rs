use thiserror::Error;

use crate::filter::types::FilterKind;

/// Filter subsystem errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error("no {0} stage in the filter chain")]
    StageNotFound(FilterKind),

    #[error("slider value must be finite, got {0}")]
    InvalidValue(f32),

    #[error("unknown filter kind: {0}")]
    UnknownKind(String),
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, FilterError>;
