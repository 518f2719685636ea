//! Audio event types sent from the dispatcher to the audio service

use tokio::sync::mpsc;

use crate::timeline::SegmentKind;

/// Events that can trigger audio playback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioEvent {
    /// A new exercise started: announce its name
    Announce { exercise: String },

    /// A segment started: play the cue for the entered kind
    SegmentCue { kind: SegmentKind },

    /// The plan is complete: speak the praise phrase
    Praise { phrase: String },
}

pub type AudioSender = mpsc::Sender<AudioEvent>;
pub type AudioReceiver = mpsc::Receiver<AudioEvent>;

/// Channel between the cue dispatcher and the audio service
pub fn create_audio_channel(capacity: usize) -> (AudioSender, AudioReceiver) {
    mpsc::channel(capacity.max(1))
}
