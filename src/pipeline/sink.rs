use std::sync::Arc;

use crate::frame::Frame;
use crate::pipeline::error::Result;

/// Downstream consumer of frames leaving the chain (preview renderer,
/// snapshot encoder, movie writer).
///
/// Sinks are shared with the threads that read them, so `consume` takes
/// `&self` and implementors handle their own interior mutability.
pub trait FrameSink: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &str;

    /// Accept one frame. An error is logged and counted as a drop; it does
    /// not stop delivery to other sinks.
    fn consume(&self, frame: Arc<Frame>) -> Result<()>;
}
