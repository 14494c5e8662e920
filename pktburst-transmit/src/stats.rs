//! Live burst statistics

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Snapshot of a burst's progress
#[derive(Debug, Clone, Default)]
pub struct BurstStats {
    /// Frames written to the sink
    pub frames_sent: u64,
    /// Bytes written to the sink
    pub bytes_sent: u64,
    /// Full passes completed
    pub passes_completed: u64,
    /// Time since the burst started
    pub elapsed: Duration,
    /// Frames per second over `elapsed`
    pub frames_per_second: f64,
    /// Is the burst still running?
    pub is_running: bool,
}

impl BurstStats {
    /// Format statistics as a single human-readable line
    pub fn format(&self) -> String {
        format!(
            "{} frames ({} bytes), {} passes in {:.2}s, {:.0} fps",
            self.frames_sent,
            self.bytes_sent,
            self.passes_completed,
            self.elapsed.as_secs_f64(),
            self.frames_per_second
        )
    }
}

/// Thread-safe counters updated by the transmitter while it runs
#[derive(Debug, Default)]
pub struct BurstStatsCounters {
    pub frames_sent: AtomicU64,
    pub bytes_sent: AtomicU64,
    pub passes_completed: AtomicU64,
}

impl BurstStatsCounters {
    pub fn add_frames(&self, frames: u64, bytes: u64) {
        self.frames_sent.fetch_add(frames, Ordering::Relaxed);
        self.bytes_sent.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn increment_passes(&self) {
        self.passes_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn to_stats(&self, started_at: Instant, running: bool) -> BurstStats {
        let frames_sent = self.frames_sent.load(Ordering::Relaxed);
        let elapsed = started_at.elapsed();
        let secs = elapsed.as_secs_f64();

        BurstStats {
            frames_sent,
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
            passes_completed: self.passes_completed.load(Ordering::Relaxed),
            elapsed,
            frames_per_second: if secs > 0.0 {
                frames_sent as f64 / secs
            } else {
                0.0
            },
            is_running: running,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let counters = BurstStatsCounters::default();
        counters.add_frames(3, 180);
        counters.add_frames(1, 60);
        counters.increment_passes();

        let stats = counters.to_stats(Instant::now(), true);
        assert_eq!(stats.frames_sent, 4);
        assert_eq!(stats.bytes_sent, 240);
        assert_eq!(stats.passes_completed, 1);
        assert!(stats.is_running);
    }

    #[test]
    fn test_format() {
        let stats = BurstStats {
            frames_sent: 10,
            bytes_sent: 600,
            passes_completed: 10,
            elapsed: Duration::from_secs(2),
            frames_per_second: 5.0,
            is_running: false,
        };
        assert_eq!(stats.format(), "10 frames (600 bytes), 10 passes in 2.00s, 5 fps");
    }
}
