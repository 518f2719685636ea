//! Exercise timelines
//!
//! - **Segments**: expansion of an exercise into Work/Rest segments
//! - **Clock**: anchor-based elapsed time, independent of tick frequency

pub mod clock;
mod segment;

pub use clock::{
    Clock, ManualClock, MonotonicClock, SystemClock, Timestamp, elapsed_seconds,
    is_segment_expired,
};
pub use segment::{Segment, SegmentKind, Timeline, generate};

pub(crate) use segment::expand;
