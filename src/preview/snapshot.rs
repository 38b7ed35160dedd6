use image::codecs::jpeg::JpegEncoder;
use image::{ImageBuffer, Rgb};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

use crate::frame::Frame;
use crate::pipeline::error::{PipelineError, Result};
use crate::pipeline::sink::FrameSink;

/// Default JPEG quality for captured photos.
pub const DEFAULT_PHOTO_QUALITY: u8 = 90;

/// Compress raw RGB pixel data to JPEG at the given quality (1-100).
pub fn compress_jpeg(data: Vec<u8>, width: u32, height: u32, quality: u8) -> Result<Vec<u8>> {
    let img: ImageBuffer<Rgb<u8>, _> = ImageBuffer::from_raw(width, height, data)
        .ok_or_else(|| PipelineError::Encode(format!("buffer too small for {width}x{height}")))?;

    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100));
    img.write_with_encoder(encoder)
        .map_err(|e| PipelineError::Encode(e.to_string()))?;
    Ok(buf)
}

/// Still-photo capture taken from the processed stream.
///
/// Idle until [`SnapshotSink::request`] arms it; the next frame to arrive is
/// encoded to JPEG and parked until [`SnapshotSink::take`] collects it.
/// Frames arriving while unarmed are ignored.
pub struct SnapshotSink {
    armed: AtomicBool,
    quality: u8,
    photo: Mutex<Option<Vec<u8>>>,
}

impl SnapshotSink {
    pub fn new(quality: u8) -> Self {
        Self {
            armed: AtomicBool::new(false),
            quality,
            photo: Mutex::new(None),
        }
    }

    /// Capture the next frame.
    pub fn request(&self) {
        self.armed.store(true, Ordering::Release);
    }

    pub fn is_pending(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    /// Collect the captured photo, if one is ready.
    pub fn take(&self) -> Option<Vec<u8>> {
        self.photo.lock().take()
    }
}

impl Default for SnapshotSink {
    fn default() -> Self {
        Self::new(DEFAULT_PHOTO_QUALITY)
    }
}

impl FrameSink for SnapshotSink {
    fn name(&self) -> &str {
        "snapshot"
    }

    fn consume(&self, frame: Arc<Frame>) -> Result<()> {
        if !self.armed.swap(false, Ordering::AcqRel) {
            return Ok(());
        }
        let jpeg = compress_jpeg(frame.to_rgb8(), frame.width(), frame.height(), self.quality)?;
        info!(
            width = frame.width(),
            height = frame.height(),
            bytes = jpeg.len(),
            "photo captured"
        );
        *self.photo.lock() = Some(jpeg);
        Ok(())
    }
}
