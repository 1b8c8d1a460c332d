//! Throttled progress tracking for copies.

use std::time::{Duration, Instant};

use discshelf_core::TransferProgress;

/// Accumulates copied bytes and decides when a progress event is due.
///
/// Events are spaced at least `interval` apart, measured from the start of
/// the copy. Byte counts only grow, so emitted snapshots are monotonic.
#[derive(Debug)]
pub struct ProgressTracker {
    start_time: Instant,
    last_emit: Instant,
    interval: Duration,
    copied_bytes: u64,
    total_bytes: u64,
    /// `(copied, total)` of the last snapshot handed out.
    last_reported: Option<(u64, u64)>,
}

impl ProgressTracker {
    pub fn new(total_bytes: u64, interval: Duration) -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_emit: now,
            interval,
            copied_bytes: 0,
            total_bytes,
            last_reported: None,
        }
    }

    /// Add freshly written bytes.
    pub fn record(&mut self, bytes: u64) {
        self.copied_bytes += bytes;
    }

    pub fn copied_bytes(&self) -> u64 {
        self.copied_bytes
    }

    /// Current state, regardless of throttling.
    pub fn snapshot(&self) -> TransferProgress {
        TransferProgress::new(
            self.copied_bytes,
            self.total_bytes,
            self.start_time.elapsed().as_secs_f64(),
        )
    }

    /// A snapshot if the interval has passed since the last event.
    pub fn poll(&mut self) -> Option<TransferProgress> {
        let now = Instant::now();
        if now.duration_since(self.last_emit) < self.interval {
            return None;
        }
        self.last_emit = now;
        self.last_reported = Some((self.copied_bytes, self.total_bytes));
        Some(self.snapshot())
    }

    /// The closing snapshot, with the total pinned to what was actually
    /// copied. `None` if that exact state, total included, was already
    /// reported.
    pub fn finish(&mut self) -> Option<TransferProgress> {
        self.total_bytes = self.copied_bytes;
        let closing = (self.copied_bytes, self.total_bytes);
        if self.last_reported == Some(closing) {
            return None;
        }
        self.last_reported = Some(closing);
        Some(self.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throttle_suppresses_fast_updates() {
        let mut tracker = ProgressTracker::new(100, Duration::from_secs(3600));
        tracker.record(50);
        assert!(tracker.poll().is_none());

        tracker.record(50);
        let last = tracker.finish().unwrap();
        assert_eq!(last.copied_bytes, 100);
        assert_eq!(last.total_bytes, 100);
        assert_eq!(last.percent, 100.0);
    }

    #[test]
    fn test_zero_interval_reports_every_poll() {
        let mut tracker = ProgressTracker::new(30, Duration::ZERO);
        let mut seen = Vec::new();
        for _ in 0..3 {
            tracker.record(10);
            seen.push(tracker.poll().unwrap().copied_bytes);
        }
        assert_eq!(seen, vec![10, 20, 30]);
        // Final state already reported.
        assert!(tracker.finish().is_none());
    }

    #[test]
    fn test_finish_reports_again_when_source_grew() {
        let mut tracker = ProgressTracker::new(10, Duration::ZERO);
        tracker.record(12);
        let polled = tracker.poll().unwrap();
        assert_eq!((polled.copied_bytes, polled.total_bytes), (12, 10));

        let last = tracker.finish().unwrap();
        assert_eq!((last.copied_bytes, last.total_bytes), (12, 12));
        assert_eq!(last.percent, 100.0);
    }

    #[test]
    fn test_finish_pins_total_to_copied() {
        let mut tracker = ProgressTracker::new(10, Duration::ZERO);
        tracker.record(12);
        let last = tracker.finish().unwrap();
        assert_eq!(last.total_bytes, 12);
        assert!(last.is_complete());
    }
}
