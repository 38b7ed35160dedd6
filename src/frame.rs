use thiserror::Error;

/// Number of interleaved channels per pixel (RGB).
pub const CHANNELS: usize = 3;

/// Frame construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("buffer holds {actual} samples, expected {expected} for {width}x{height}")]
    Size {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("frame dimensions must be non-zero, got {width}x{height}")]
    Empty { width: u32, height: u32 },
}

/// A single video frame flowing through the pipeline.
///
/// Pixels are interleaved RGB in linear `[0, 1]` floats, row-major, top row
/// first. Width and height are always at least 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    data: Vec<f32>,
    width: u32,
    height: u32,
    /// Capture timestamp in microseconds.
    pub timestamp_us: u64,
}

impl Frame {
    /// Wrap an RGB sample buffer, checking it matches the dimensions.
    pub fn new(
        data: Vec<f32>,
        width: u32,
        height: u32,
        timestamp_us: u64,
    ) -> Result<Self, FrameError> {
        if width == 0 || height == 0 {
            return Err(FrameError::Empty { width, height });
        }
        let expected = width as usize * height as usize * CHANNELS;
        if data.len() != expected {
            return Err(FrameError::Size {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            timestamp_us,
        })
    }

    /// A frame where every pixel has the same colour. Zero dimensions are
    /// raised to 1.
    pub fn filled(width: u32, height: u32, rgb: [f32; 3]) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        let pixels = width as usize * height as usize;
        let data = rgb.iter().copied().cycle().take(pixels * CHANNELS).collect();
        Self {
            data,
            width,
            height,
            timestamp_us: 0,
        }
    }

    /// Build a frame by computing every pixel from its `(x, y)` position.
    /// Zero dimensions are raised to 1.
    pub fn from_fn(
        width: u32,
        height: u32,
        timestamp_us: u64,
        f: impl Fn(u32, u32) -> [f32; 3],
    ) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        let mut data = Vec::with_capacity(width as usize * height as usize * CHANNELS);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self {
            data,
            width,
            height,
            timestamp_us,
        }
    }

    /// Decode packed 8-bit RGB (the camera's native layout).
    pub fn from_rgb8(
        data: &[u8],
        width: u32,
        height: u32,
        timestamp_us: u64,
    ) -> Result<Self, FrameError> {
        let samples = data.iter().map(|&b| f32::from(b) / 255.0).collect();
        Self::new(samples, width, height, timestamp_us)
    }

    /// Encode to packed 8-bit RGB, rounding and clamping each sample.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.data
            .iter()
            .map(|&s| (s.clamp(0.0, 1.0) * 255.0).round() as u8)
            .collect()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw interleaved samples.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Size of the frame once packed to RGB8, in bytes.
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    /// Read the pixel at `(x, y)`. Coordinates are clamped to the frame edge.
    pub fn pixel(&self, x: i64, y: i64) -> [f32; 3] {
        let x = x.clamp(0, i64::from(self.width) - 1) as usize;
        let y = y.clamp(0, i64::from(self.height) - 1) as usize;
        let i = (y * self.width as usize + x) * CHANNELS;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Build a new frame by transforming every pixel independently.
    pub fn map_pixels(&self, f: impl Fn([f32; 3]) -> [f32; 3]) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(CHANNELS) {
            data.extend_from_slice(&f([px[0], px[1], px[2]]));
        }
        Self {
            data,
            width: self.width,
            height: self.height,
            timestamp_us: self.timestamp_us,
        }
    }

    /// Build a new frame by computing every pixel from its coordinates.
    pub fn map_coords(&self, f: impl Fn(i64, i64) -> [f32; 3]) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for y in 0..i64::from(self.height) {
            for x in 0..i64::from(self.width) {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self {
            data,
            width: self.width,
            height: self.height,
            timestamp_us: self.timestamp_us,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_mismatched_buffer() {
        let result = Frame::new(vec![0.0; 10], 2, 2, 0);
        assert_eq!(
            result,
            Err(FrameError::Size {
                width: 2,
                height: 2,
                expected: 12,
                actual: 10,
            })
        );
    }

    #[test]
    fn new_rejects_zero_dimensions() {
        assert_eq!(
            Frame::new(Vec::new(), 0, 4, 0),
            Err(FrameError::Empty {
                width: 0,
                height: 4
            })
        );
        assert!(Frame::from_rgb8(&[], 0, 0, 0).is_err());
    }

    #[test]
    fn zero_sized_constructors_yield_a_readable_pixel() {
        let frame = Frame::filled(0, 0, [0.3, 0.3, 0.3]);
        assert_eq!((frame.width(), frame.height()), (1, 1));
        assert_eq!(frame.pixel(0, 0), [0.3, 0.3, 0.3]);

        let frame = Frame::from_fn(5, 0, 0, |x, _| [x as f32, 0.0, 0.0]);
        assert_eq!((frame.width(), frame.height()), (5, 1));
        assert_eq!(frame.pixel(9, -2), [4.0, 0.0, 0.0]);
    }

    #[test]
    fn filled_repeats_colour_for_every_pixel() {
        let frame = Frame::filled(3, 2, [0.1, 0.2, 0.3]);
        assert_eq!(frame.data().len(), 18);
        assert_eq!(frame.pixel(2, 1), [0.1, 0.2, 0.3]);
    }

    #[test]
    fn rgb8_conversion_preserves_bytes() {
        let bytes = vec![0, 128, 255, 10, 20, 30];
        let frame = Frame::from_rgb8(&bytes, 2, 1, 42).unwrap();
        assert_eq!(frame.timestamp_us, 42);
        assert_eq!(frame.to_rgb8(), bytes);
    }

    #[test]
    fn to_rgb8_clamps_out_of_range_samples() {
        let frame = Frame::new(vec![-0.5, 0.5, 1.5], 1, 1, 0).unwrap();
        assert_eq!(frame.to_rgb8(), vec![0, 128, 255]);
    }

    #[test]
    fn pixel_clamps_coordinates_to_edges() {
        let frame = Frame::new(vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0], 2, 1, 0).unwrap();
        assert_eq!(frame.pixel(-5, 0), [0.0, 0.0, 0.0]);
        assert_eq!(frame.pixel(9, 3), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn map_pixels_keeps_dimensions_and_timestamp() {
        let mut frame = Frame::filled(4, 3, [0.2, 0.2, 0.2]);
        frame.timestamp_us = 7;
        let out = frame.map_pixels(|[r, g, b]| [r * 2.0, g, b]);
        assert_eq!(out.width(), 4);
        assert_eq!(out.height(), 3);
        assert_eq!(out.timestamp_us, 7);
        assert_eq!(out.pixel(1, 1), [0.4, 0.2, 0.2]);
    }
}
