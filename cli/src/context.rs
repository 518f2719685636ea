use std::sync::Arc;

use cadence_core::context::{AppConfig, AppConfigExt, MIN_TICK_INTERVAL_MS};
use cadence_types::{AudioSettings, VoiceMode};
use tokio::sync::RwLock;

/// Command line settings that override the stored configuration for one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOverrides {
    pub interval_ms: Option<u64>,
    pub voice: Option<VoiceMode>,
    pub mute: bool,
}

impl RunOverrides {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(interval_ms) = self.interval_ms {
            config.tick_interval_ms = interval_ms;
        }
        if let Some(voice) = self.voice {
            config.audio.voice_mode = voice;
        }
        if self.mute {
            config.audio.enabled = false;
        }
    }
}

/// Changes to the stored configuration requested with `cadence config`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigUpdate {
    pub interval_ms: Option<u64>,
    pub voice: Option<VoiceMode>,
    /// Some(false) mutes, Some(true) unmutes
    pub audio_enabled: Option<bool>,
}

impl ConfigUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the update, returning whether anything changed
    pub fn apply(&self, config: &mut AppConfig) -> bool {
        let before = config.clone();
        if let Some(interval_ms) = self.interval_ms {
            config.tick_interval_ms = interval_ms.max(MIN_TICK_INTERVAL_MS);
        }
        if let Some(voice) = self.voice {
            config.audio.voice_mode = voice;
        }
        if let Some(enabled) = self.audio_enabled {
            config.audio.enabled = enabled;
        }
        *config != before
    }
}

/// Holds all shared state for the CLI application.
#[derive(Clone)]
pub struct CliContext {
    pub config: AppConfig,
    /// Shared with the audio service
    pub audio: Arc<RwLock<AudioSettings>>,
}

impl CliContext {
    /// Load the stored configuration and apply `overrides`
    pub fn load(overrides: &RunOverrides) -> Self {
        let mut config = AppConfig::load();
        overrides.apply(&mut config);
        Self::new(config)
    }

    pub fn new(config: AppConfig) -> Self {
        let audio = Arc::new(RwLock::new(config.audio.clone()));
        Self { config, audio }
    }
}
