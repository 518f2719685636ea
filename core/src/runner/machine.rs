//! Pure runner transitions
//!
//! Every operation maps (state, plan, now) to a new state plus the transitions
//! it produced. Nothing here touches cues, tick sources or subscribers; the
//! [`PlanRunner`](super::PlanRunner) applies those effects.

use super::{RunState, RunnerState, Transition};
use crate::plan::ValidatedPlan;
use crate::timeline::Timestamp;
use crate::timeline::clock;

/// Result of a transition function
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub state: RunnerState,
    /// Transitions with the boundary instant each belongs to, in order
    pub transitions: Vec<(Timestamp, Transition)>,
    /// False when the operation was a no-op for the given state
    pub applied: bool,
}

impl Step {
    fn applied(state: RunnerState, transitions: Vec<(Timestamp, Transition)>) -> Self {
        Self {
            state,
            transitions,
            applied: true,
        }
    }

    fn ignored(state: RunnerState) -> Self {
        Self {
            state,
            transitions: Vec::new(),
            applied: false,
        }
    }
}

/// Enter exercise `index` with its accounting anchored at `anchor`.
/// None when the plan has no such exercise.
fn enter_exercise(
    plan: &ValidatedPlan,
    index: usize,
    anchor: Timestamp,
) -> Option<(RunState, Transition)> {
    let exercise = plan.exercise(index)?;
    let timeline = plan.timeline_at(index)?;
    let run = RunState::enter(index, timeline, anchor);
    let transition = Transition::ExerciseChanged {
        exercise_index: index,
        exercise_name: exercise.name.clone(),
        kind: run.current_segment().kind,
    };
    Some((run, transition))
}

/// Begin the plan at exercise 0, discarding any previous run
pub fn start(plan: &ValidatedPlan, now: Timestamp) -> Step {
    match enter_exercise(plan, 0, now) {
        Some((run, transition)) => {
            Step::applied(RunnerState::Running(run), vec![(now, transition)])
        }
        None => Step::ignored(RunnerState::Idle),
    }
}

/// Account for time up to `now`, crossing as many boundaries as have passed
pub fn tick(state: RunnerState, plan: &ValidatedPlan, now: Timestamp) -> Step {
    match state {
        RunnerState::Running(run) => advance(run, plan, now),
        other => Step::ignored(other),
    }
}

fn advance(mut run: RunState, plan: &ValidatedPlan, now: Timestamp) -> Step {
    let mut transitions = Vec::new();

    loop {
        let segment = *run.current_segment();
        if !clock::has_passed_segment(&segment, run.anchor, now) {
            run.elapsed_secs_in_segment = clock::elapsed_in_segment(&segment, run.anchor, now);
            return Step::applied(RunnerState::Running(run), transitions);
        }

        let boundary = clock::offset(run.anchor, segment.end_offset_ms);

        if run.segment_index + 1 < run.timeline.len() {
            run.segment_index += 1;
            run.elapsed_secs_in_segment = 0;
            transitions.push((
                boundary,
                Transition::SegmentChanged {
                    exercise_index: run.exercise_index,
                    segment_index: run.segment_index,
                    kind: run.current_segment().kind,
                },
            ));
            continue;
        }

        // Last segment done: the next exercise is anchored where this one ended
        match enter_exercise(plan, run.exercise_index + 1, boundary) {
            Some((next, transition)) => {
                transitions.push((boundary, transition));
                run = next;
            }
            None => {
                transitions.push((
                    boundary,
                    Transition::PlanFinished {
                        exercise_count: plan.len(),
                    },
                ));
                return Step::applied(RunnerState::Idle, transitions);
            }
        }
    }
}

pub fn pause(state: RunnerState, now: Timestamp) -> Step {
    match state {
        RunnerState::Running(mut run) => {
            run.paused_at = Some(now);
            Step::applied(RunnerState::Paused(run), Vec::new())
        }
        other => Step::ignored(other),
    }
}

/// Resume, excising the paused interval by shifting the anchor
pub fn resume(state: RunnerState, now: Timestamp) -> Step {
    match state {
        RunnerState::Paused(mut run) => {
            if let Some(paused_at) = run.paused_at.take() {
                run.anchor = clock::offset(run.anchor, clock::elapsed_ms(paused_at, now));
            }
            Step::applied(RunnerState::Running(run), Vec::new())
        }
        other => Step::ignored(other),
    }
}

pub fn stop(state: RunnerState) -> Step {
    let applied = !state.is_idle();
    Step {
        state: RunnerState::Idle,
        transitions: Vec::new(),
        applied,
    }
}

/// Jump to the next exercise regardless of elapsed time.
///
/// A no-op at the last exercise. A paused runner stays paused in the new exercise.
pub fn skip_to_next_exercise(state: RunnerState, plan: &ValidatedPlan, now: Timestamp) -> Step {
    let (run, was_paused) = match state {
        RunnerState::Running(run) => (run, false),
        RunnerState::Paused(run) => (run, true),
        RunnerState::Idle => return Step::ignored(RunnerState::Idle),
    };

    match enter_exercise(plan, run.exercise_index + 1, now) {
        Some((mut next, transition)) => {
            let state = if was_paused {
                next.paused_at = Some(now);
                RunnerState::Paused(next)
            } else {
                RunnerState::Running(next)
            };
            Step::applied(state, vec![(now, transition)])
        }
        None if was_paused => Step::ignored(RunnerState::Paused(run)),
        None => Step::ignored(RunnerState::Running(run)),
    }
}
