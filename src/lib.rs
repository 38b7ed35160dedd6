pub mod diagnostics;
pub mod filter;
pub mod frame;
pub mod pipeline;
pub mod preview;
pub mod settings;

use std::sync::Arc;

pub use filter::chain::FilterChain;
pub use filter::controller::FilterParameterController;
pub use filter::error::FilterError;
pub use filter::types::{FilterKind, ParameterUpdateEvent, Route};
pub use frame::Frame;
pub use pipeline::Pipeline;

use pipeline::source::TestPatternSource;
use preview::buffer::FrameBuffer;
use preview::snapshot::SnapshotSink;
use settings::store::SettingsStore;

/// A ready-to-run beauty camera session: the pipeline plus handles to its
/// preview and photo sinks.
pub struct CameraSession {
    pub pipeline: Pipeline,
    pub preview: Arc<FrameBuffer>,
    pub snapshot: Arc<SnapshotSink>,
    /// Simulated camera, present when `DUMMY_CAMERA` is set.
    pub source: Option<TestPatternSource>,
}

/// Build the filter pipeline, restore saved slider positions, and attach the
/// preview and snapshot sinks.
pub fn create_session(store: &SettingsStore) -> CameraSession {
    let mut controller = FilterParameterController::new(FilterChain::build());
    let applied = settings::restore::apply_saved_settings(&mut controller, &store.get());
    if !applied.is_empty() {
        tracing::info!(
            "Restored {} filter settings from {}",
            applied.len(),
            store.path().display()
        );
    }

    let preview = Arc::new(FrameBuffer::default());
    let snapshot = Arc::new(SnapshotSink::default());

    let mut pipeline = Pipeline::new(controller);
    pipeline.add_sink(preview.clone());
    pipeline.add_sink(snapshot.clone());

    let source = TestPatternSource::from_env();
    if source.is_some() {
        tracing::info!("DUMMY_CAMERA set, using the test pattern source");
    }

    CameraSession {
        pipeline,
        preview,
        snapshot,
        source,
    }
}
