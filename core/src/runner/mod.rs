//! Plan runner
//!
//! This module provides:
//! - **State**: `Idle | Running | Paused` with the progress of the current exercise
//! - **Machine**: pure transition functions over that state
//! - **PlanRunner**: applies transitions, numbers and publishes events, holds the tick source
//! - **Snapshot**: read-only view for displays
//!
//! # Transitions
//!
//! ```text
//! tick ──▶ segment passed? ──no──▶ update elapsed
//!               │yes
//!               ▼
//!        next segment? ──yes──▶ SegmentChanged ──┐
//!               │no                              │ (repeat until
//!               ▼                                │  caught up)
//!        next exercise? ──yes──▶ ExerciseChanged ┘
//!               │no
//!               ▼
//!         PlanFinished, Idle
//! ```

mod event;
mod handler;
pub mod machine;
mod plan_runner;
mod snapshot;
mod state;


pub use event::{RunnerEvent, Transition};
pub use handler::EventHandler;
pub use plan_runner::PlanRunner;
pub use snapshot::{RunnerSnapshot, SegmentSnapshot};
pub use state::{RunState, RunnerState, RunnerStatus};
