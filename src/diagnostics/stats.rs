use serde::Serialize;
use std::time::Instant;

use crate::filter::types::Route;

/// Collects statistics for a pipeline session.
pub struct DiagnosticStats {
    frame_count: u64,
    filtered_count: u64,
    bypassed_count: u64,
    delivery_count: u64,
    drop_count: u64,
    total_bytes: u64,
    start_time: Instant,
    last_frame_time: Option<Instant>,
}

/// Snapshot of diagnostic stats for the host UI.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticSnapshot {
    pub fps: f64,
    pub frame_count: u64,
    pub filtered_count: u64,
    pub bypassed_count: u64,
    pub delivery_count: u64,
    pub drop_count: u64,
    pub drop_rate: f64,
    pub bandwidth_bps: u64,
    /// Milliseconds since the last frame; `None` before the first one.
    pub idle_ms: Option<u64>,
}

impl DiagnosticStats {
    /// Create new stats with zeroed counters.
    pub fn new() -> Self {
        Self {
            frame_count: 0,
            filtered_count: 0,
            bypassed_count: 0,
            delivery_count: 0,
            drop_count: 0,
            total_bytes: 0,
            start_time: Instant::now(),
            last_frame_time: None,
        }
    }

    /// Record a frame that went through the pipeline along `route`.
    pub fn record_frame(&mut self, bytes: usize, route: Route) {
        self.frame_count += 1;
        self.total_bytes += bytes as u64;
        self.last_frame_time = Some(Instant::now());
        match route {
            Route::Filtered => self.filtered_count += 1,
            Route::Bypass => self.bypassed_count += 1,
        }
    }

    /// Record a frame handed to a sink successfully.
    pub fn record_delivery(&mut self) {
        self.delivery_count += 1;
    }

    /// Record a sink rejecting a frame.
    pub fn record_drop(&mut self) {
        self.drop_count += 1;
    }

    /// Calculate current FPS based on elapsed time.
    pub fn fps(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed < 0.001 {
            return 0.0;
        }
        self.frame_count as f64 / elapsed
    }

    /// Share of sink deliveries that failed, as a percentage (0.0 - 100.0).
    pub fn drop_rate(&self) -> f64 {
        let total = self.delivery_count + self.drop_count;
        if total == 0 {
            return 0.0;
        }
        (self.drop_count as f64 / total as f64) * 100.0
    }

    /// Processed bytes per second.
    pub fn bandwidth_bps(&self) -> u64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed < 0.001 {
            return 0;
        }
        (self.total_bytes as f64 / elapsed) as u64
    }

    /// Time since the last processed frame, if any.
    pub fn idle_for(&self) -> Option<std::time::Duration> {
        self.last_frame_time.map(|t| t.elapsed())
    }

    /// Reset all counters.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Take a serialisable snapshot.
    pub fn snapshot(&self) -> DiagnosticSnapshot {
        DiagnosticSnapshot {
            fps: self.fps(),
            frame_count: self.frame_count,
            filtered_count: self.filtered_count,
            bypassed_count: self.bypassed_count,
            delivery_count: self.delivery_count,
            drop_count: self.drop_count,
            drop_rate: self.drop_rate(),
            bandwidth_bps: self.bandwidth_bps(),
            idle_ms: self.idle_for().map(|d| d.as_millis() as u64),
        }
    }
}

impl Default for DiagnosticStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn initialises_with_zero_values() {
        let stats = DiagnosticStats::new();
        assert_eq!(stats.frame_count, 0);
        assert_eq!(stats.drop_count, 0);
        assert_eq!(stats.total_bytes, 0);
        assert!(stats.idle_for().is_none());
    }

    #[test]
    fn record_frame_counts_per_route() {
        let mut stats = DiagnosticStats::new();
        stats.record_frame(1000, Route::Filtered);
        stats.record_frame(1000, Route::Filtered);
        stats.record_frame(1000, Route::Bypass);
        assert_eq!(stats.frame_count, 3);
        assert_eq!(stats.filtered_count, 2);
        assert_eq!(stats.bypassed_count, 1);
        assert!(stats.idle_for().is_some());
    }

    #[test]
    fn fps_is_positive_after_frames() {
        let mut stats = DiagnosticStats::new();
        for _ in 0..30 {
            stats.record_frame(1000, Route::Filtered);
        }
        thread::sleep(Duration::from_millis(100));
        let fps = stats.fps();
        assert!(fps > 0.0, "fps should be positive, got {fps}");
    }

    #[test]
    fn drop_rate_returns_percentage() {
        let mut stats = DiagnosticStats::new();
        stats.record_delivery();
        stats.record_delivery();
        stats.record_drop();
        let rate = stats.drop_rate();
        assert!(
            (rate - 33.333).abs() < 1.0,
            "drop rate should be ~33%, got {rate}"
        );
    }

    #[test]
    fn drop_rate_zero_when_no_events() {
        let stats = DiagnosticStats::new();
        assert_eq!(stats.drop_rate(), 0.0);
    }

    #[test]
    fn bandwidth_bps_tracks_bytes() {
        let mut stats = DiagnosticStats::new();
        stats.record_frame(10_000, Route::Bypass);
        thread::sleep(Duration::from_millis(50));
        let bps = stats.bandwidth_bps();
        assert!(bps > 0, "bandwidth should be positive, got {bps}");
    }

    #[test]
    fn reset_clears_all_counters() {
        let mut stats = DiagnosticStats::new();
        stats.record_frame(1000, Route::Filtered);
        stats.record_drop();
        stats.reset();
        assert_eq!(stats.frame_count, 0);
        assert_eq!(stats.filtered_count, 0);
        assert_eq!(stats.drop_count, 0);
        assert_eq!(stats.total_bytes, 0);
    }

    #[test]
    fn snapshot_serialises_to_camelcase() {
        let mut stats = DiagnosticStats::new();
        stats.record_frame(5000, Route::Filtered);
        let json = serde_json::to_value(stats.snapshot()).unwrap();
        assert_eq!(json["frameCount"], 1);
        assert_eq!(json["filteredCount"], 1);
        assert_eq!(json["bypassedCount"], 0);
        assert!(json["dropRate"].is_number());
        assert!(json["idleMs"].is_number());
    }

    #[test]
    fn snapshot_idle_is_null_before_first_frame() {
        let json = serde_json::to_value(DiagnosticStats::new().snapshot()).unwrap();
        assert!(json["idleMs"].is_null());
        assert_eq!(json["deliveryCount"], 0);
    }
}
