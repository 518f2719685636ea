//! Cue dispatcher
//!
//! Turns runner transitions into audio events. Sending never blocks: the
//! runner's transition is complete before any audio work starts, and a full
//! or closed audio queue only costs a cue.

use tokio::sync::mpsc::error::TrySendError;

use super::{AudioEvent, AudioSender, CueError, random_praise};
use crate::runner::{EventHandler, RunnerEvent, Transition};

pub struct CueDispatcher {
    sender: AudioSender,
    /// Highest event sequence number already dispatched
    last_seq: Option<u64>,
}

impl CueDispatcher {
    pub fn new(sender: AudioSender) -> Self {
        Self {
            sender,
            last_seq: None,
        }
    }

    /// Cue for a transition
    pub fn cue_for(transition: &Transition) -> AudioEvent {
        match transition {
            Transition::ExerciseChanged { exercise_name, .. } => AudioEvent::Announce {
                exercise: exercise_name.clone(),
            },
            Transition::SegmentChanged { kind, .. } => AudioEvent::SegmentCue { kind: *kind },
            Transition::PlanFinished { .. } => AudioEvent::Praise {
                phrase: random_praise().to_string(),
            },
        }
    }

    fn send(&self, event: AudioEvent) -> Result<(), CueError> {
        self.sender.try_send(event).map_err(|e| match e {
            TrySendError::Full(_) => CueError::QueueFull,
            TrySendError::Closed(_) => CueError::ServiceGone,
        })
    }
}

impl EventHandler for CueDispatcher {
    fn handle_event(&mut self, event: &RunnerEvent) {
        if self.last_seq.is_some_and(|last| event.seq <= last) {
            tracing::debug!(seq = event.seq, "Cue already dispatched");
            return;
        }
        self.last_seq = Some(event.seq);

        let cue = Self::cue_for(&event.transition);
        if let Err(e) = self.send(cue) {
            tracing::warn!(seq = event.seq, error = %e, "Cue not delivered");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cues::{PRAISE_PHRASES, create_audio_channel};
    use crate::timeline::SegmentKind;
    use chrono::Utc;

    fn event(seq: u64, transition: Transition) -> RunnerEvent {
        RunnerEvent {
            seq,
            at: Utc::now(),
            transition,
        }
    }

    fn exercise(seq: u64, name: &str) -> RunnerEvent {
        event(
            seq,
            Transition::ExerciseChanged {
                exercise_index: 0,
                exercise_name: name.to_string(),
                kind: SegmentKind::Work,
            },
        )
    }

    fn segment(seq: u64, kind: SegmentKind) -> RunnerEvent {
        event(
            seq,
            Transition::SegmentChanged {
                exercise_index: 0,
                segment_index: 1,
                kind,
            },
        )
    }

    #[test]
    fn maps_transitions_to_cues() {
        let (tx, mut rx) = create_audio_channel(8);
        let mut dispatcher = CueDispatcher::new(tx);

        dispatcher.handle_events(&[
            exercise(0, "Blink Often"),
            segment(1, SegmentKind::Rest),
            segment(2, SegmentKind::Work),
            event(3, Transition::PlanFinished { exercise_count: 1 }),
        ]);

        assert_eq!(
            rx.try_recv().unwrap(),
            AudioEvent::Announce {
                exercise: "Blink Often".into()
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            AudioEvent::SegmentCue {
                kind: SegmentKind::Rest
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            AudioEvent::SegmentCue {
                kind: SegmentKind::Work
            }
        );
        match rx.try_recv().unwrap() {
            AudioEvent::Praise { phrase } => assert!(PRAISE_PHRASES.contains(&phrase.as_str())),
            other => panic!("expected praise, got {other:?}"),
        }
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn each_transition_fires_once() {
        let (tx, mut rx) = create_audio_channel(8);
        let mut dispatcher = CueDispatcher::new(tx);

        let rest = segment(4, SegmentKind::Rest);
        dispatcher.handle_event(&rest);
        dispatcher.handle_event(&rest);
        dispatcher.handle_event(&segment(3, SegmentKind::Work));

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn full_or_closed_queue_is_tolerated() {
        let (tx, rx) = create_audio_channel(1);
        let mut dispatcher = CueDispatcher::new(tx);

        dispatcher.handle_event(&segment(0, SegmentKind::Work));
        dispatcher.handle_event(&segment(1, SegmentKind::Rest));
        assert!(matches!(
            dispatcher.send(AudioEvent::SegmentCue {
                kind: SegmentKind::Work
            }),
            Err(CueError::QueueFull)
        ));

        drop(rx);
        dispatcher.handle_event(&segment(2, SegmentKind::Work));
        assert!(matches!(
            dispatcher.send(AudioEvent::SegmentCue {
                kind: SegmentKind::Work
            }),
            Err(CueError::ServiceGone)
        ));
    }
}
