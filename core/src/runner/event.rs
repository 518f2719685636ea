use crate::timeline::{SegmentKind, Timestamp};

/// A state transition produced by the runner state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// A new exercise began at segment 0
    ExerciseChanged {
        exercise_index: usize,
        exercise_name: String,
        /// Kind of segment 0 (always Work for generated timelines)
        kind: SegmentKind,
    },

    /// The next segment of the current exercise began
    SegmentChanged {
        exercise_index: usize,
        segment_index: usize,
        /// Kind of the segment being entered
        kind: SegmentKind,
    },

    /// The last segment of the last exercise ended
    PlanFinished { exercise_count: usize },
}

/// A transition as published to subscribers.
///
/// `seq` increases by one for every event a runner emits, so subscribers can
/// recognise an event they have already handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerEvent {
    pub seq: u64,
    /// Boundary instant the transition belongs to
    pub at: Timestamp,
    pub transition: Transition,
}

impl RunnerEvent {
    pub fn is_plan_finished(&self) -> bool {
        matches!(self.transition, Transition::PlanFinished { .. })
    }
}
