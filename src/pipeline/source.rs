use crate::frame::Frame;

const DEFAULT_WIDTH: u32 = 64;
const DEFAULT_HEIGHT: u32 = 48;
const DEFAULT_FPS: f32 = 30.0;

/// Number of frames in one cycle of the blue-channel sweep.
const PATTERN_PERIOD: u64 = 60;

/// A simulated camera producing a moving gradient test pattern.
///
/// Red ramps left to right, green top to bottom, and blue sweeps with the
/// frame index, so consecutive frames differ. Timestamps advance by one
/// frame interval per frame.
///
/// Enable via `DUMMY_CAMERA=1` environment variable.
pub struct TestPatternSource {
    width: u32,
    height: u32,
    frame_interval_us: u64,
    next_index: u64,
}

impl TestPatternSource {
    pub fn new(width: u32, height: u32, fps: f32) -> Self {
        let fps = if fps.is_finite() { fps.max(1.0) } else { DEFAULT_FPS };
        Self {
            width,
            height,
            frame_interval_us: (1_000_000.0 / f64::from(fps)).round() as u64,
            next_index: 0,
        }
    }

    /// Whether the simulated camera is enabled via environment variable.
    pub fn is_enabled() -> bool {
        std::env::var("DUMMY_CAMERA").is_ok_and(|v| v == "1" || v == "true")
    }

    /// The default simulated camera, if `DUMMY_CAMERA` enables it.
    pub fn from_env() -> Option<Self> {
        Self::is_enabled().then(Self::default)
    }

    pub fn frame_interval_us(&self) -> u64 {
        self.frame_interval_us
    }

    /// Render the pattern for a given frame index.
    pub fn pattern(&self, index: u64) -> Frame {
        let x_span = self.width.max(2) as f32 - 1.0;
        let y_span = self.height.max(2) as f32 - 1.0;
        let blue = (index % PATTERN_PERIOD) as f32 / (PATTERN_PERIOD - 1) as f32;

        Frame::from_fn(
            self.width,
            self.height,
            index * self.frame_interval_us,
            |x, y| [x as f32 / x_span, y as f32 / y_span, blue],
        )
    }

    /// Produce the next frame in sequence.
    pub fn next_frame(&mut self) -> Frame {
        let frame = self.pattern(self.next_index);
        self.next_index += 1;
        frame
    }
}

impl Default for TestPatternSource {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT, DEFAULT_FPS)
    }
}

impl Iterator for TestPatternSource {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        Some(self.next_frame())
    }
}
