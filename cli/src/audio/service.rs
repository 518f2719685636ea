//! Audio playback service
//!
//! Runs in a background task, receiving AudioEvents via channel.
//! Playback failures are logged and never reach the session.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;

use cadence_core::cues::{AudioEvent, AudioReceiver, sounds};
use cadence_core::timeline::SegmentKind;
use cadence_types::{AudioSettings, VoiceMode};

use super::CuePlayer;

pub struct AudioService<P: CuePlayer> {
    event_rx: AudioReceiver,

    /// Shared audio settings (can be updated at runtime)
    settings: Arc<RwLock<AudioSettings>>,

    /// Holds cue sounds and the `announcements/` clips
    sounds_dir: PathBuf,

    player: P,
}

impl<P: CuePlayer> AudioService<P> {
    pub fn new(
        event_rx: AudioReceiver,
        settings: Arc<RwLock<AudioSettings>>,
        sounds_dir: PathBuf,
        player: P,
    ) -> Self {
        Self {
            event_rx,
            settings,
            sounds_dir,
            player,
        }
    }

    /// Run until every sender is gone
    pub async fn run(mut self) {
        while let Some(event) = self.event_rx.recv().await {
            // Copy the settings out so the lock is not held during playback
            let settings = self.settings.read().await.clone();
            self.handle(&event, &settings);
        }
        tracing::debug!("Audio service stopped");
    }

    fn handle(&mut self, event: &AudioEvent, settings: &AudioSettings) {
        // Master audio toggle
        if !settings.enabled {
            return;
        }

        match event {
            AudioEvent::Announce { exercise } => {
                if settings.announcements_enabled {
                    self.announce(exercise, settings.voice_mode);
                }
            }
            AudioEvent::SegmentCue { kind } => {
                if settings.cues_enabled {
                    self.segment_cue(*kind);
                }
            }
            AudioEvent::Praise { phrase } => {
                if settings.praise_enabled {
                    self.speak(phrase);
                }
            }
        }
    }

    fn announce(&mut self, exercise: &str, voice_mode: VoiceMode) {
        if voice_mode == VoiceMode::Clips {
            match sounds::announcement_clip(&self.sounds_dir, exercise) {
                Some(clip) => match self.player.play_announcement(&clip) {
                    Ok(()) => return,
                    Err(e) => tracing::debug!(error = %e, exercise, "Clip failed, speaking instead"),
                },
                None => tracing::debug!(exercise, "No announcement clip, speaking instead"),
            }
        }
        self.speak(exercise);
    }

    fn segment_cue(&mut self, kind: SegmentKind) {
        if let Some(sound) = sounds::cue_sound(&self.sounds_dir, kind) {
            match self.player.play_file(&sound) {
                Ok(()) => return,
                Err(e) => tracing::debug!(error = %e, %kind, "Cue sound failed, speaking instead"),
            }
        }
        self.speak(kind.label());
    }

    fn speak(&mut self, text: &str) {
        if let Err(e) = self.player.speak(text) {
            tracing::warn!(error = %e, "Speech failed");
        }
    }
}
