//! Plan runner
//!
//! Owns the runner state and applies the effects of each transition:
//! numbering and publishing events, and holding the tick source while a
//! plan is active.

use super::machine::{self, Step};
use super::{
    EventHandler, RunnerEvent, RunnerSnapshot, RunnerState, RunnerStatus, SegmentSnapshot,
};
use crate::plan::{Plan, PlanError, ValidatedPlan};
use crate::ticker::{TickHandle, TickSource};
use crate::timeline::Timestamp;

#[derive(Default)]
pub struct PlanRunner {
    plan: Option<ValidatedPlan>,
    state: RunnerState,
    finished: bool,
    next_seq: u64,
    handlers: Vec<Box<dyn EventHandler>>,
    tick_source: Option<Box<dyn TickSource>>,
    ticks: Option<TickHandle>,
}

impl PlanRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire ticks from `source` while a plan is running
    pub fn with_tick_source(mut self, source: impl TickSource + 'static) -> Self {
        self.tick_source = Some(Box::new(source));
        self
    }

    pub fn subscribe(&mut self, handler: impl EventHandler + 'static) {
        self.handlers.push(Box::new(handler));
    }

    // ─── Operations ─────────────────────────────────────────────────────────

    /// Validate `plan` and start it from the first exercise.
    /// On error the runner is left untouched.
    pub fn start(&mut self, plan: Plan, now: Timestamp) -> Result<Vec<RunnerEvent>, PlanError> {
        let plan = plan.validate()?;
        Ok(self.start_validated(plan, now))
    }

    /// Start (or restart) a validated plan from the first exercise
    pub fn start_validated(&mut self, plan: ValidatedPlan, now: Timestamp) -> Vec<RunnerEvent> {
        if !self.state.is_idle() {
            tracing::info!("Restarting plan from the first exercise");
        }
        tracing::info!(plan = plan.name(), exercises = plan.len(), "Plan started");

        let step = machine::start(&plan, now);
        self.plan = Some(plan);
        self.finished = false;
        self.acquire_ticks();
        self.apply(step)
    }

    pub fn tick(&mut self, now: Timestamp) -> Vec<RunnerEvent> {
        let Some(plan) = self.plan.as_ref() else {
            return Vec::new();
        };
        let state = std::mem::take(&mut self.state);
        let step = machine::tick(state, plan, now);
        self.apply(step)
    }

    /// Returns false (and does nothing) unless running
    pub fn pause(&mut self, now: Timestamp) -> bool {
        let state = std::mem::take(&mut self.state);
        let applied = self.apply_quiet(machine::pause(state, now));
        if applied {
            tracing::info!("Paused");
        } else {
            tracing::debug!("Pause ignored, not running");
        }
        applied
    }

    /// Returns false (and does nothing) unless paused
    pub fn resume(&mut self, now: Timestamp) -> bool {
        let state = std::mem::take(&mut self.state);
        let applied = self.apply_quiet(machine::resume(state, now));
        if applied {
            tracing::info!("Resumed");
        } else {
            tracing::debug!("Resume ignored, not paused");
        }
        applied
    }

    /// Return to idle from any state and release the tick source.
    /// Returns whether a plan was active.
    pub fn stop(&mut self) -> bool {
        let state = std::mem::take(&mut self.state);
        let applied = self.apply_quiet(machine::stop(state));
        self.finished = false;
        self.release_ticks();
        if applied {
            tracing::info!("Stopped");
        }
        applied
    }

    /// Jump to the next exercise. Empty when idle or already at the last exercise.
    pub fn skip_to_next_exercise(&mut self, now: Timestamp) -> Vec<RunnerEvent> {
        let Some(plan) = self.plan.as_ref() else {
            return Vec::new();
        };
        let state = std::mem::take(&mut self.state);
        let step = machine::skip_to_next_exercise(state, plan, now);
        if !step.applied {
            tracing::debug!("Skip ignored, no next exercise");
        }
        self.apply(step)
    }

    // ─── Queries ────────────────────────────────────────────────────────────

    pub fn state(&self) -> &RunnerState {
        &self.state
    }

    pub fn status(&self) -> RunnerStatus {
        self.state.status()
    }

    pub fn plan(&self) -> Option<&ValidatedPlan> {
        self.plan.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// True while the tick source is held
    pub fn holds_ticks(&self) -> bool {
        self.ticks.is_some()
    }

    pub fn snapshot(&self) -> RunnerSnapshot {
        let mut snapshot = RunnerSnapshot {
            status: self.state.status(),
            plan_name: self.plan.as_ref().map(|p| p.name().to_string()),
            plan_len: self.plan.as_ref().map_or(0, ValidatedPlan::len),
            paused: self.state.is_paused(),
            finished: self.finished,
            ..Default::default()
        };

        let (Some(run), Some(plan)) = (self.state.run_state(), self.plan.as_ref()) else {
            return snapshot;
        };

        let segment = run.current_segment();
        snapshot.exercise_index = Some(run.exercise_index);
        if let Some(exercise) = plan.exercise(run.exercise_index) {
            snapshot.exercise_name = Some(exercise.name.clone());
            snapshot.on_screen_text = exercise.on_screen_text.clone();
        }
        snapshot.exercise_elapsed_secs = run.exercise_elapsed_secs();
        snapshot.exercise_total_secs = run.timeline.total_duration_secs();
        snapshot.segment = Some(SegmentSnapshot {
            index: run.segment_index,
            count: run.timeline.len(),
            kind: segment.kind,
            elapsed_secs: run.elapsed_secs_in_segment,
            total_secs: u64::from(segment.duration_secs),
        });
        snapshot
    }

    // ─── Effects ────────────────────────────────────────────────────────────

    fn apply(&mut self, step: Step) -> Vec<RunnerEvent> {
        self.state = step.state;

        let events: Vec<RunnerEvent> = step
            .transitions
            .into_iter()
            .map(|(at, transition)| {
                let event = RunnerEvent {
                    seq: self.next_seq,
                    at,
                    transition,
                };
                self.next_seq += 1;
                event
            })
            .collect();

        for event in &events {
            tracing::debug!(seq = event.seq, transition = ?event.transition, "Transition");
        }

        if events.iter().any(RunnerEvent::is_plan_finished) {
            self.finished = true;
            self.release_ticks();
            tracing::info!("Plan finished");
        }

        for handler in &mut self.handlers {
            handler.handle_events(&events);
        }

        events
    }

    /// Apply a step that never produces transitions
    fn apply_quiet(&mut self, step: Step) -> bool {
        let applied = step.applied;
        self.state = step.state;
        applied
    }

    fn acquire_ticks(&mut self) {
        if self.ticks.is_some() {
            return;
        }
        if let Some(source) = self.tick_source.as_mut() {
            self.ticks = Some(source.acquire());
        }
    }

    fn release_ticks(&mut self) {
        if let Some(ticks) = self.ticks.take() {
            ticks.cancel();
        }
    }
}

impl std::fmt::Debug for PlanRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanRunner")
            .field("plan", &self.plan.as_ref().map(ValidatedPlan::name))
            .field("state", &self.state)
            .field("finished", &self.finished)
            .field("next_seq", &self.next_seq)
            .field("handlers", &self.handlers.len())
            .field("ticks", &self.ticks)
            .finish()
    }
}
