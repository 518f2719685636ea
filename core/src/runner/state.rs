//! Runner state
//!
//! ```text
//!            start                 pause
//!   Idle ───────────▶ Running ◀─────────▶ Paused
//!    ▲                  │       resume       │
//!    └──────────────────┴────────────────────┘
//!        stop / plan finished          stop
//! ```

use crate::timeline::{Segment, Timeline, Timestamp};

/// Progress through the current exercise
#[derive(Debug, Clone, PartialEq)]
pub struct RunState {
    pub exercise_index: usize,
    pub segment_index: usize,
    pub timeline: Timeline,

    /// Wall-clock instant the current exercise's elapsed time is measured from.
    /// Shifted forward by the pause length on every resume.
    pub anchor: Timestamp,

    /// Seconds elapsed in the current segment, as of the last tick
    pub elapsed_secs_in_segment: u64,

    /// Set only while paused
    pub paused_at: Option<Timestamp>,
}

impl RunState {
    pub(crate) fn enter(exercise_index: usize, timeline: Timeline, anchor: Timestamp) -> Self {
        Self {
            exercise_index,
            segment_index: 0,
            timeline,
            anchor,
            elapsed_secs_in_segment: 0,
            paused_at: None,
        }
    }

    pub fn current_segment(&self) -> &Segment {
        // segment_index < timeline.len() and timelines are never empty
        &self.timeline.segments()[self.segment_index]
    }

    /// Seconds elapsed in the whole exercise, as of the last tick
    pub fn exercise_elapsed_secs(&self) -> u64 {
        self.current_segment().start_offset_ms / 1000 + self.elapsed_secs_in_segment
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunnerStatus {
    #[default]
    Idle,
    Running,
    Paused,
}

impl RunnerStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RunnerStatus::Idle => "idle",
            RunnerStatus::Running => "running",
            RunnerStatus::Paused => "paused",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum RunnerState {
    #[default]
    Idle,
    Running(RunState),
    Paused(RunState),
}

impl RunnerState {
    pub fn status(&self) -> RunnerStatus {
        match self {
            RunnerState::Idle => RunnerStatus::Idle,
            RunnerState::Running(_) => RunnerStatus::Running,
            RunnerState::Paused(_) => RunnerStatus::Paused,
        }
    }

    pub fn run_state(&self) -> Option<&RunState> {
        match self {
            RunnerState::Idle => None,
            RunnerState::Running(run) | RunnerState::Paused(run) => Some(run),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, RunnerState::Idle)
    }

    pub fn is_paused(&self) -> bool {
        matches!(self, RunnerState::Paused(_))
    }
}
