//! Session driver
//!
//! Runs one plan on a background task. The task is the only writer of the
//! runner state: operator commands and ticks are both received here and
//! applied one at a time, so a tick never interleaves with another mutation.
//!
//! ```text
//! SessionHandle ──SessionCommand──┐
//!                                 ▼
//! IntervalTickSource ──Tick──▶ session task ──▶ PlanRunner ──▶ CueDispatcher
//!                                 │                  └──────▶ RunnerEvent channel
//!                                 └──RunnerSnapshot (watch)──▶ display
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::cues::{AudioSender, CueDispatcher};
use crate::plan::ValidatedPlan;
use crate::runner::{PlanRunner, RunnerEvent, RunnerSnapshot};
use crate::ticker::{IntervalTickSource, Tick};
use crate::timeline::Clock;

const COMMAND_QUEUE: usize = 16;
const TICK_QUEUE: usize = 4;

/// Operator commands for a running session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Pause,
    Resume,
    /// Skip to the next exercise
    Next,
    /// Start the plan again from the first exercise
    Restart,
    Stop,
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Finished,
    Stopped,
}

pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    pub snapshots: watch::Receiver<RunnerSnapshot>,
    pub events: mpsc::UnboundedReceiver<RunnerEvent>,
    task: JoinHandle<SessionOutcome>,
}

impl SessionHandle {
    /// Queue a command. Returns false once the session has ended.
    pub async fn send(&self, command: SessionCommand) -> bool {
        self.commands.send(command).await.is_ok()
    }

    /// Take the event stream, leaving a closed receiver in its place
    pub fn take_events(&mut self) -> mpsc::UnboundedReceiver<RunnerEvent> {
        std::mem::replace(&mut self.events, mpsc::unbounded_channel().1)
    }

    /// Sender for use from other tasks (e.g. an input reader)
    pub fn commands(&self) -> mpsc::Sender<SessionCommand> {
        self.commands.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the session to end
    pub async fn wait(self) -> SessionOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "Session task failed");
                SessionOutcome::Stopped
            }
        }
    }
}

/// Start `plan` on a background task ticking every `interval`.
///
/// When `audio` is given, cues are dispatched to it.
pub fn spawn_session(
    plan: ValidatedPlan,
    interval: Duration,
    clock: Arc<dyn Clock>,
    audio: Option<AudioSender>,
) -> SessionHandle {
    let (command_tx, command_rx) = mpsc::channel(COMMAND_QUEUE);
    let (tick_tx, tick_rx) = mpsc::channel(TICK_QUEUE);
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (snapshot_tx, snapshot_rx) = watch::channel(RunnerSnapshot::default());

    let mut runner = PlanRunner::new().with_tick_source(IntervalTickSource::new(interval, tick_tx));
    if let Some(audio) = audio {
        runner.subscribe(CueDispatcher::new(audio));
    }
    runner.subscribe(event_tx);

    let task = tokio::spawn(run_session(
        runner,
        plan,
        clock,
        command_rx,
        tick_rx,
        snapshot_tx,
    ));

    SessionHandle {
        commands: command_tx,
        snapshots: snapshot_rx,
        events: event_rx,
        task,
    }
}

async fn run_session(
    mut runner: PlanRunner,
    plan: ValidatedPlan,
    clock: Arc<dyn Clock>,
    mut commands: mpsc::Receiver<SessionCommand>,
    mut ticks: mpsc::Receiver<Tick>,
    snapshots: watch::Sender<RunnerSnapshot>,
) -> SessionOutcome {
    runner.start_validated(plan.clone(), clock.now());
    snapshots.send_replace(runner.snapshot());

    let outcome = loop {
        tokio::select! {
            command = commands.recv() => {
                let now = clock.now();
                match command {
                    Some(SessionCommand::Pause) => {
                        runner.pause(now);
                    }
                    Some(SessionCommand::Resume) => {
                        runner.resume(now);
                    }
                    Some(SessionCommand::Next) => {
                        runner.skip_to_next_exercise(now);
                    }
                    Some(SessionCommand::Restart) => {
                        runner.start_validated(plan.clone(), now);
                    }
                    Some(SessionCommand::Stop) | None => {
                        runner.stop();
                        snapshots.send_replace(runner.snapshot());
                        break SessionOutcome::Stopped;
                    }
                }
            }
            Some(_tick) = ticks.recv() => {
                runner.tick(clock.now());
            }
        }

        snapshots.send_replace(runner.snapshot());
        if runner.is_finished() {
            break SessionOutcome::Finished;
        }
    };

    tracing::info!(?outcome, "Session ended");
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cues::{AudioEvent, create_audio_channel};
    use crate::plan::{ExerciseDefinition, Plan};
    use crate::runner::{RunnerStatus, Transition};
    use crate::timeline::{MonotonicClock, SegmentKind};

    fn plan() -> ValidatedPlan {
        Plan::new(
            "Session test",
            vec![
                ExerciseDefinition::new("Squats", 2, 2).with_rest(1),
                ExerciseDefinition::new("Plank", 2, 1),
            ],
        )
        .validate()
        .unwrap()
    }

    fn drain(events: &mut mpsc::UnboundedReceiver<RunnerEvent>) -> Vec<RunnerEvent> {
        let mut out = Vec::new();
        while let Ok(event) = events.try_recv() {
            out.push(event);
        }
        out
    }

    #[tokio::test(start_paused = true)]
    async fn runs_plan_to_completion_with_cues() {
        let (audio_tx, mut audio_rx) = create_audio_channel(16);
        let clock = Arc::new(MonotonicClock::new());
        let mut handle = spawn_session(plan(), Duration::from_secs(1), clock, Some(audio_tx));

        let mut events_rx = handle.take_events();
        let snapshots = handle.snapshots.clone();
        assert_eq!(handle.wait().await, SessionOutcome::Finished);

        let events = drain(&mut events_rx);
        assert_eq!(events.len(), 5);
        assert!(events.last().unwrap().is_plan_finished());

        let final_snapshot = snapshots.borrow().clone();
        assert!(final_snapshot.finished);
        assert_eq!(final_snapshot.status, RunnerStatus::Idle);

        let mut cues = Vec::new();
        while let Ok(cue) = audio_rx.try_recv() {
            cues.push(cue);
        }
        assert_eq!(cues.len(), 5);
        assert_eq!(cues[0], AudioEvent::Announce { exercise: "Squats".into() });
        assert_eq!(cues[1], AudioEvent::SegmentCue { kind: SegmentKind::Rest });
        assert_eq!(cues[2], AudioEvent::SegmentCue { kind: SegmentKind::Work });
        assert_eq!(cues[3], AudioEvent::Announce { exercise: "Plank".into() });
        assert!(matches!(cues[4], AudioEvent::Praise { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn pause_excises_time() {
        let clock = Arc::new(MonotonicClock::new());
        let handle = spawn_session(plan(), Duration::from_secs(1), clock, None);
        let start = tokio::time::Instant::now();

        assert!(handle.send(SessionCommand::Pause).await);
        tokio::time::sleep(Duration::from_secs(30)).await;

        let snapshot = handle.snapshots.borrow().clone();
        assert_eq!(snapshot.status, RunnerStatus::Paused);
        assert_eq!(snapshot.exercise_index, Some(0));
        assert_eq!(snapshot.exercise_elapsed_secs, 0);

        assert!(handle.send(SessionCommand::Resume).await);
        assert_eq!(handle.wait().await, SessionOutcome::Finished);
        // 7 seconds of plan plus the held final second, after a 30 second pause
        assert!(start.elapsed() >= Duration::from_secs(37));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_ends_session() {
        let clock = Arc::new(MonotonicClock::new());
        let mut handle = spawn_session(plan(), Duration::from_secs(1), clock, None);

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        assert!(handle.send(SessionCommand::Stop).await);

        let mut events_rx = handle.take_events();
        let snapshots = handle.snapshots.clone();
        assert_eq!(handle.wait().await, SessionOutcome::Stopped);

        let snapshot = snapshots.borrow().clone();
        assert_eq!(snapshot.status, RunnerStatus::Idle);
        assert!(!snapshot.finished);
        assert!(!drain(&mut events_rx).iter().any(RunnerEvent::is_plan_finished));
    }

    #[tokio::test(start_paused = true)]
    async fn next_skips_exercise() {
        let clock = Arc::new(MonotonicClock::new());
        let mut handle = spawn_session(plan(), Duration::from_secs(1), clock, None);

        assert!(handle.send(SessionCommand::Next).await);
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(handle.snapshots.borrow().exercise_name.as_deref(), Some("Plank"));

        let events = drain(&mut handle.events);
        assert!(matches!(
            &events[1].transition,
            Transition::ExerciseChanged { exercise_index: 1, .. }
        ));
        assert_eq!(handle.wait().await, SessionOutcome::Finished);
    }
}
