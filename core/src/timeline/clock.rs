//! Wall-clock arithmetic for the timeline
//!
//! Elapsed time is always derived from an anchor timestamp and "now", never
//! counted from ticks. Pause handling only has to move the anchor.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use super::Segment;

pub type Timestamp = DateTime<Utc>;

/// `anchor` shifted forward by `ms` milliseconds
pub fn offset(anchor: Timestamp, ms: u64) -> Timestamp {
    anchor + chrono::Duration::milliseconds(ms as i64)
}

/// Milliseconds from `anchor` to `now`, clamped to zero
pub fn elapsed_ms(anchor: Timestamp, now: Timestamp) -> u64 {
    now.signed_duration_since(anchor).num_milliseconds().max(0) as u64
}

/// Whole seconds from `anchor` to `now`, clamped to zero
pub fn elapsed_seconds(anchor: Timestamp, now: Timestamp) -> u64 {
    elapsed_ms(anchor, now) / 1000
}

/// Whole seconds since the segment began
pub fn elapsed_in_segment(segment: &Segment, anchor: Timestamp, now: Timestamp) -> u64 {
    elapsed_seconds(offset(anchor, segment.start_offset_ms), now)
}

/// True once `now` has reached the end of the segment
pub fn is_segment_expired(segment: &Segment, anchor: Timestamp, now: Timestamp) -> bool {
    now >= offset(anchor, segment.end_offset_ms)
}

/// True once `now` is past the end of the segment.
///
/// The instant a segment reaches its end still belongs to it, so a 5 second
/// segment reports 1..=5 elapsed before the runner moves on.
pub fn has_passed_segment(segment: &Segment, anchor: Timestamp, now: Timestamp) -> bool {
    now > offset(anchor, segment.end_offset_ms)
}

// ─────────────────────────────────────────────────────────────────────────────
// Clock sources
// ─────────────────────────────────────────────────────────────────────────────

/// Source of "now" for the session loop
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// System wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// Wall clock that advances with the tokio monotonic clock.
///
/// Immune to system clock adjustments, and follows virtual time in paused
/// tokio tests.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin_wall: Timestamp,
    origin: tokio::time::Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin_wall: Utc::now(),
            origin: tokio::time::Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Timestamp {
        offset(self.origin_wall, self.origin.elapsed().as_millis() as u64)
    }
}

/// Manually advanced clock for tests and replays
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Timestamp>>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn advance_ms(&self, ms: u64) {
        if let Ok(mut now) = self.now.lock() {
            *now = offset(*now, ms);
        }
    }

    pub fn set(&self, to: Timestamp) {
        if let Ok(mut now) = self.now.lock() {
            *now = to;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        match self.now.lock() {
            Ok(now) => *now,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::SegmentKind;
    use chrono::TimeZone;

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 3, 1, 7, 0, 0).unwrap()
    }

    fn segment(start: u64, end: u64) -> Segment {
        Segment {
            kind: SegmentKind::Work,
            start_offset_ms: start,
            end_offset_ms: end,
            duration_secs: ((end - start) / 1000) as u32,
        }
    }

    #[test]
    fn elapsed_seconds_floors() {
        assert_eq!(elapsed_seconds(t0(), offset(t0(), 999)), 0);
        assert_eq!(elapsed_seconds(t0(), offset(t0(), 1000)), 1);
        assert_eq!(elapsed_seconds(t0(), offset(t0(), 4_999)), 4);
    }

    #[test]
    fn elapsed_seconds_clamps_negative() {
        let anchor = offset(t0(), 10_000);
        assert_eq!(elapsed_seconds(anchor, t0()), 0);
        assert_eq!(elapsed_ms(anchor, t0()), 0);
    }

    #[test]
    fn expiry_is_inclusive_of_end() {
        let s = segment(0, 5_000);
        assert!(!is_segment_expired(&s, t0(), offset(t0(), 4_999)));
        assert!(is_segment_expired(&s, t0(), offset(t0(), 5_000)));
        assert!(!has_passed_segment(&s, t0(), offset(t0(), 5_000)));
        assert!(has_passed_segment(&s, t0(), offset(t0(), 5_001)));
    }

    #[test]
    fn elapsed_in_segment_uses_segment_start() {
        let s = segment(10_000, 15_000);
        assert_eq!(elapsed_in_segment(&s, t0(), offset(t0(), 12_500)), 2);
        assert_eq!(elapsed_in_segment(&s, t0(), offset(t0(), 9_000)), 0);
    }

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::new(t0());
        clock.advance_ms(1_500);
        assert_eq!(clock.now(), offset(t0(), 1_500));
        clock.set(t0());
        assert_eq!(clock.now(), t0());
    }

    #[tokio::test(start_paused = true)]
    async fn monotonic_clock_follows_tokio_time() {
        let clock = MonotonicClock::new();
        let before = clock.now();
        tokio::time::advance(std::time::Duration::from_secs(3)).await;
        assert_eq!(elapsed_seconds(before, clock.now()), 3);
    }
}
