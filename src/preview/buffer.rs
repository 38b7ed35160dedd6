use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::frame::Frame;
use crate::pipeline::error::Result;
use crate::pipeline::sink::FrameSink;

/// Thread-safe ring buffer feeding the live preview.
///
/// Stores up to `capacity` frames, overwriting the oldest when full.
/// Frames are wrapped in `Arc` so the renderer gets a cheap reference-counted
/// pointer instead of cloning the pixel buffer.
pub struct FrameBuffer {
    slots: Mutex<Slots>,
    capacity: usize,
    /// Monotonic counter incremented on each push, so the renderer can tell
    /// a new frame from a repeat even when timestamps stall.
    sequence: AtomicU64,
}

struct Slots {
    frames: Vec<Option<Arc<Frame>>>,
    write_idx: usize,
}

impl FrameBuffer {
    /// Create a new ring buffer with the given capacity (at least one slot).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: Mutex::new(Slots {
                frames: vec![None; capacity],
                write_idx: 0,
            }),
            capacity,
            sequence: AtomicU64::new(0),
        }
    }

    /// Push a new frame into the buffer, overwriting the oldest if full.
    pub fn push(&self, frame: Arc<Frame>) {
        let mut slots = self.slots.lock();
        let idx = slots.write_idx;
        slots.frames[idx] = Some(frame);
        slots.write_idx = (idx + 1) % self.capacity;
        self.sequence.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of frames pushed so far.
    pub fn sequence(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }

    /// Get the most recently pushed frame, if any.
    pub fn latest(&self) -> Option<Arc<Frame>> {
        let slots = self.slots.lock();
        let latest_idx = if slots.write_idx == 0 {
            self.capacity - 1
        } else {
            slots.write_idx - 1
        };
        slots.frames[latest_idx].clone()
    }

    /// Drop every buffered frame, e.g. when the preview is hidden.
    pub fn clear(&self) {
        let mut slots = self.slots.lock();
        slots.frames.fill(None);
        slots.write_idx = 0;
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new(3)
    }
}

impl FrameSink for FrameBuffer {
    fn name(&self) -> &str {
        "preview"
    }

    fn consume(&self, frame: Arc<Frame>) -> Result<()> {
        self.push(frame);
        Ok(())
    }
}
