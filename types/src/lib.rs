//! Shared configuration types for cadence
//!
//! This crate contains serializable configuration types that are shared between
//! the timer engine (cadence-core) and the command line front end.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Audio
// ─────────────────────────────────────────────────────────────────────────────

/// How exercise names are announced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceMode {
    /// Pre-recorded announcement clips, falling back to speech when a clip is missing
    #[default]
    Clips,
    /// Always use the speech synthesizer
    Speech,
}

impl VoiceMode {
    pub fn label(&self) -> &'static str {
        match self {
            VoiceMode::Clips => "clips",
            VoiceMode::Speech => "speech",
        }
    }
}

impl std::str::FromStr for VoiceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "clips" | "mp3" => Ok(VoiceMode::Clips),
            "speech" | "tts" => Ok(VoiceMode::Speech),
            other => Err(format!("unknown voice mode '{other}' (expected clips or speech)")),
        }
    }
}

/// Audio settings for cues and announcements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioSettings {
    /// Master enable for all audio
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Announce the exercise name when an exercise starts
    #[serde(default = "default_true")]
    pub announcements_enabled: bool,

    /// Play the work/rest cue when a segment starts
    #[serde(default = "default_true")]
    pub cues_enabled: bool,

    /// Speak a praise phrase when the plan is finished
    #[serde(default = "default_true")]
    pub praise_enabled: bool,

    #[serde(default)]
    pub voice_mode: VoiceMode,

    /// Program used to speak text (receives the text as its last argument)
    #[serde(default = "default_speech_command")]
    pub speech_command: String,

    /// Program used to play sound files (receives the file path as its last argument).
    /// None = sound files are never played and speech is used instead.
    #[serde(default = "default_sound_command")]
    pub sound_command: Option<String>,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            announcements_enabled: true,
            cues_enabled: true,
            praise_enabled: true,
            voice_mode: VoiceMode::default(),
            speech_command: default_speech_command(),
            sound_command: default_sound_command(),
        }
    }
}

fn default_speech_command() -> String {
    if cfg!(target_os = "macos") {
        "say".to_string()
    } else {
        "espeak".to_string()
    }
}

fn default_sound_command() -> Option<String> {
    if cfg!(target_os = "macos") {
        Some("afplay".to_string())
    } else if cfg!(target_os = "linux") {
        Some("paplay".to_string())
    } else {
        None
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Application Config
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration, stored as TOML in the user config directory.
///
/// Note: Persistence methods (load/save) are provided by cadence-core via the
/// `AppConfigExt` trait, as they require platform-specific dependencies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Interval between timer ticks in milliseconds
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Directory scanned for plan definition files
    #[serde(default)]
    pub plans_dir: String,

    /// Directory holding cue sounds and the `announcements/` clips
    #[serde(default)]
    pub sounds_dir: String,

    #[serde(default)]
    pub audio: AudioSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            plans_dir: String::new(),
            sounds_dir: String::new(),
            audio: AudioSettings::default(),
        }
    }
}

impl AppConfig {
    /// Create a config rooted at the given data directory.
    /// Plans and sounds live in subdirectories of it.
    pub fn with_data_directory(data_dir: &str) -> Self {
        let base = data_dir.trim_end_matches(['/', '\\']);
        Self {
            plans_dir: format!("{base}/plans"),
            sounds_dir: format!("{base}/sounds"),
            ..Default::default()
        }
    }
}

pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;

fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.tick_interval_ms, 1000);
        assert!(config.audio.enabled);
        assert_eq!(config.audio.voice_mode, VoiceMode::Clips);
    }

    #[test]
    fn voice_mode_parses_aliases() {
        assert_eq!("tts".parse::<VoiceMode>(), Ok(VoiceMode::Speech));
        assert_eq!("MP3".parse::<VoiceMode>(), Ok(VoiceMode::Clips));
        assert!("loud".parse::<VoiceMode>().is_err());
    }

    #[test]
    fn data_directory_layout() {
        let config = AppConfig::with_data_directory("/home/me/cadence/");
        assert_eq!(config.plans_dir, "/home/me/cadence/plans");
        assert_eq!(config.sounds_dir, "/home/me/cadence/sounds");
    }

    #[test]
    fn partial_audio_table_keeps_other_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [audio]
            voice_mode = "speech"
            cues_enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(config.audio.voice_mode, VoiceMode::Speech);
        assert!(!config.audio.cues_enabled);
        assert!(config.audio.announcements_enabled);
    }
}
