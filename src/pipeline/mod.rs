// Frame pipeline: source frames run through the filter chain (or around it) into sinks.

pub mod error;
pub mod sink;
pub mod source;

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

use crate::diagnostics::stats::{DiagnosticSnapshot, DiagnosticStats};
use crate::filter::controller::FilterParameterController;
use crate::frame::Frame;
use crate::pipeline::error::Result;
use crate::pipeline::sink::FrameSink;

/// Host-side processing graph: one source, the filter chain, many sinks.
///
/// Every sink sees the same output frame. Parameter and bypass changes go
/// through [`Pipeline::controller_mut`] and take effect on the next frame.
pub struct Pipeline {
    controller: FilterParameterController,
    sinks: Vec<Arc<dyn FrameSink>>,
    stats: Mutex<DiagnosticStats>,
}

impl Pipeline {
    pub fn new(controller: FilterParameterController) -> Self {
        Self {
            controller,
            sinks: Vec::new(),
            stats: Mutex::new(DiagnosticStats::new()),
        }
    }

    /// Attach a sink to the exit of the pipeline.
    pub fn add_sink(&mut self, sink: Arc<dyn FrameSink>) {
        self.sinks.push(sink);
    }

    /// Detach a sink by name, returning whether one was removed.
    pub fn remove_sink(&mut self, name: &str) -> bool {
        let before = self.sinks.len();
        self.sinks.retain(|s| s.name() != name);
        self.sinks.len() != before
    }

    pub fn sink_names(&self) -> Vec<&str> {
        self.sinks.iter().map(|s| s.name()).collect()
    }

    pub fn controller(&self) -> &FilterParameterController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut FilterParameterController {
        &mut self.controller
    }

    /// Process one source frame and hand the result to every sink.
    ///
    /// Returns the number of sinks that accepted the frame. Sink failures
    /// are logged and counted as drops. Stats are only locked after the
    /// fan-out, so sinks may read [`Pipeline::diagnostics`].
    pub fn push_frame(&self, frame: &Frame) -> usize {
        let chain = self.controller.chain();
        let route = chain.route();
        let output = Arc::new(chain.process(frame));

        let mut delivered = 0;
        let mut dropped = 0;
        for sink in &self.sinks {
            match sink.consume(Arc::clone(&output)) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    warn!(sink = sink.name(), "frame delivery failed: {e}");
                    dropped += 1;
                }
            }
        }

        let mut stats = self.stats.lock();
        stats.record_frame(output.byte_len(), route);
        for _ in 0..delivered {
            stats.record_delivery();
        }
        for _ in 0..dropped {
            stats.record_drop();
        }
        delivered
    }

    /// Decode a packed RGB8 camera buffer and push it through the pipeline.
    pub fn push_rgb8(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
        timestamp_us: u64,
    ) -> Result<usize> {
        let frame = Frame::from_rgb8(data, width, height, timestamp_us)?;
        Ok(self.push_frame(&frame))
    }

    /// Take a snapshot of diagnostic stats for this session.
    pub fn diagnostics(&self) -> DiagnosticSnapshot {
        self.stats.lock().snapshot()
    }

    pub fn reset_diagnostics(&self) {
        self.stats.lock().reset();
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(FilterParameterController::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::types::FilterKind;
    use crate::frame::FrameError;
    use crate::pipeline::error::PipelineError;
    use crate::pipeline::source::TestPatternSource;
    use std::sync::{mpsc, Weak};
    use std::time::Duration;

    /// Sink keeping every frame it receives.
    #[derive(Default)]
    struct CollectingSink {
        frames: Mutex<Vec<Arc<Frame>>>,
    }

    impl FrameSink for CollectingSink {
        fn name(&self) -> &str {
            "collect"
        }

        fn consume(&self, frame: Arc<Frame>) -> Result<()> {
            self.frames.lock().push(frame);
            Ok(())
        }
    }

    struct FailingSink;

    impl FrameSink for FailingSink {
        fn name(&self) -> &str {
            "failing"
        }

        fn consume(&self, _frame: Arc<Frame>) -> Result<()> {
            Err(PipelineError::Encode("encoder offline".to_string()))
        }
    }

    #[test]
    fn bypassed_pipeline_delivers_source_frame_unchanged() {
        let mut pipeline = Pipeline::default();
        let sink = Arc::new(CollectingSink::default());
        pipeline.add_sink(sink.clone());
        pipeline
            .controller_mut()
            .apply(FilterKind::Brightness, 1.0)
            .unwrap();
        pipeline.controller_mut().set_enabled(false);

        let frame = TestPatternSource::new(8, 8, 30.0).pattern(3);
        assert_eq!(pipeline.push_frame(&frame), 1);

        let frames = sink.frames.lock();
        assert_eq!(*frames[0], frame);
    }

    #[test]
    fn filtered_pipeline_applies_parameters() {
        let mut pipeline = Pipeline::default();
        let sink = Arc::new(CollectingSink::default());
        pipeline.add_sink(sink.clone());
        pipeline
            .controller_mut()
            .apply(FilterKind::Brightness, 1.0)
            .unwrap();

        pipeline.push_frame(&Frame::filled(4, 4, [0.2, 0.4, 0.6]));

        let frames = sink.frames.lock();
        assert!(frames[0].data().iter().all(|&s| (s - 1.0).abs() < 1e-5));
    }

    #[test]
    fn all_sinks_share_one_output_frame() {
        let mut pipeline = Pipeline::default();
        let a = Arc::new(CollectingSink::default());
        let b = Arc::new(CollectingSink::default());
        pipeline.add_sink(a.clone());
        pipeline.add_sink(b.clone());

        assert_eq!(pipeline.push_frame(&Frame::filled(2, 2, [0.5, 0.5, 0.5])), 2);
        assert!(Arc::ptr_eq(&a.frames.lock()[0], &b.frames.lock()[0]));
    }

    #[test]
    fn failing_sink_does_not_block_others() {
        let mut pipeline = Pipeline::default();
        let sink = Arc::new(CollectingSink::default());
        pipeline.add_sink(Arc::new(FailingSink));
        pipeline.add_sink(sink.clone());

        assert_eq!(pipeline.push_frame(&Frame::filled(2, 2, [0.5, 0.5, 0.5])), 1);
        assert_eq!(sink.frames.lock().len(), 1);

        let snap = pipeline.diagnostics();
        assert_eq!(snap.drop_count, 1);
        assert_eq!(snap.frame_count, 1);
    }

    #[test]
    fn diagnostics_count_routes() {
        let mut pipeline = Pipeline::default();
        let frame = Frame::filled(2, 2, [0.5, 0.5, 0.5]);
        pipeline.push_frame(&frame);
        pipeline.controller_mut().set_enabled(false);
        pipeline.push_frame(&frame);
        pipeline.push_frame(&frame);

        let snap = pipeline.diagnostics();
        assert_eq!(snap.filtered_count, 1);
        assert_eq!(snap.bypassed_count, 2);

        pipeline.reset_diagnostics();
        assert_eq!(pipeline.diagnostics().frame_count, 0);
    }

    #[test]
    fn remove_sink_detaches_by_name() {
        let mut pipeline = Pipeline::default();
        pipeline.add_sink(Arc::new(CollectingSink::default()));
        pipeline.add_sink(Arc::new(FailingSink));
        assert_eq!(pipeline.sink_names(), vec!["collect", "failing"]);

        assert!(pipeline.remove_sink("failing"));
        assert!(!pipeline.remove_sink("failing"));
        assert_eq!(pipeline.sink_names(), vec!["collect"]);
    }

    #[test]
    fn pipeline_without_sinks_still_processes() {
        let pipeline = Pipeline::default();
        assert_eq!(pipeline.push_frame(&Frame::filled(2, 2, [0.1, 0.1, 0.1])), 0);
        assert_eq!(pipeline.diagnostics().frame_count, 1);
    }

    /// Sink that reads the pipeline's diagnostics while consuming, both on
    /// its own thread and from a helper thread.
    #[derive(Default)]
    struct OverlaySink {
        pipeline: Mutex<Weak<Pipeline>>,
        seen: Mutex<Vec<u64>>,
    }

    impl FrameSink for OverlaySink {
        fn name(&self) -> &str {
            "overlay"
        }

        fn consume(&self, _frame: Arc<Frame>) -> Result<()> {
            let Some(pipeline) = self.pipeline.lock().upgrade() else {
                return Ok(());
            };
            self.seen.lock().push(pipeline.diagnostics().frame_count);

            let (tx, rx) = mpsc::channel();
            let remote = Arc::clone(&pipeline);
            std::thread::spawn(move || {
                let _ = tx.send(remote.diagnostics().frame_count);
            });
            let count = rx
                .recv_timeout(Duration::from_secs(5))
                .map_err(|e| PipelineError::Sink {
                    sink: self.name().to_string(),
                    message: e.to_string(),
                })?;
            self.seen.lock().push(count);
            Ok(())
        }
    }

    #[test]
    fn sinks_can_read_diagnostics_during_delivery() {
        let overlay = Arc::new(OverlaySink::default());
        let mut pipeline = Pipeline::default();
        pipeline.add_sink(overlay.clone());
        let pipeline = Arc::new(pipeline);
        *overlay.pipeline.lock() = Arc::downgrade(&pipeline);

        let frame = Frame::filled(2, 2, [0.5, 0.5, 0.5]);
        assert_eq!(pipeline.push_frame(&frame), 1);
        assert_eq!(pipeline.push_frame(&frame), 1);

        assert_eq!(*overlay.seen.lock(), vec![0, 0, 1, 1]);
        let snap = pipeline.diagnostics();
        assert_eq!(snap.frame_count, 2);
        assert_eq!(snap.delivery_count, 2);
        assert_eq!(snap.drop_count, 0);
    }

    #[test]
    fn push_rgb8_decodes_camera_buffer() {
        let mut pipeline = Pipeline::default();
        let sink = Arc::new(CollectingSink::default());
        pipeline.add_sink(sink.clone());
        pipeline.controller_mut().set_enabled(false);

        let bytes = [255, 0, 0, 0, 255, 0];
        assert_eq!(pipeline.push_rgb8(&bytes, 2, 1, 5).unwrap(), 1);

        let frames = sink.frames.lock();
        assert_eq!(frames[0].to_rgb8(), bytes.to_vec());
        assert_eq!(frames[0].timestamp_us, 5);
    }

    #[test]
    fn push_rgb8_rejects_bad_geometry() {
        let pipeline = Pipeline::default();
        let err = pipeline.push_rgb8(&[0; 5], 1, 2, 0).unwrap_err();
        assert!(matches!(err, PipelineError::Frame(FrameError::Size { .. })));

        let err = pipeline.push_rgb8(&[], 0, 0, 0).unwrap_err();
        assert!(matches!(err, PipelineError::Frame(FrameError::Empty { .. })));
        assert_eq!(pipeline.diagnostics().frame_count, 0);
    }
}
