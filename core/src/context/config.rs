//! Application configuration
//!
//! This module re-exports shared types from cadence-types and provides
//! platform-specific defaults and persistence for AppConfig.

use std::path::{Path, PathBuf};
use std::time::Duration;

pub use cadence_types::{AppConfig, AudioSettings, DEFAULT_TICK_INTERVAL_MS, VoiceMode};

use super::ConfigError;

const APP_NAME: &str = "cadence";
const CONFIG_NAME: &str = "config";

/// Shortest tick interval accepted from configuration
pub const MIN_TICK_INTERVAL_MS: u64 = 50;

// ─────────────────────────────────────────────────────────────────────────────
// Platform-Specific Defaults
// ─────────────────────────────────────────────────────────────────────────────

fn default_data_directory() -> String {
    dirs::data_dir()
        .map(|p| p.join(APP_NAME))
        .and_then(|p| p.to_str().map(String::from))
        .unwrap_or_default()
}

// ─────────────────────────────────────────────────────────────────────────────
// AppConfig Extensions
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for AppConfig persistence and derived settings
pub trait AppConfigExt: Sized {
    fn load() -> Self;
    fn load_with_defaults() -> Self;
    fn save_to(&self, path: &Path) -> Result<(), ConfigError>;
    fn config_path() -> Result<PathBuf, ConfigError>;

    /// Fill in directories left empty in the stored file
    fn fill_defaults(self) -> Self;
    fn tick_interval(&self) -> Duration;
    fn plans_path(&self) -> PathBuf;
    fn sounds_path(&self) -> PathBuf;
}

impl AppConfigExt for AppConfig {
    fn load() -> Self {
        match confy::load::<AppConfig>(APP_NAME, CONFIG_NAME) {
            Ok(config) => config.fill_defaults(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load configuration, using defaults");
                Self::load_with_defaults()
            }
        }
    }

    fn load_with_defaults() -> Self {
        AppConfig::with_data_directory(&default_data_directory())
    }

    fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        confy::store_path(path, self).map_err(ConfigError::Save)
    }

    fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)?)
    }

    fn fill_defaults(mut self) -> Self {
        if self.plans_dir.is_empty() || self.sounds_dir.is_empty() {
            let defaults = Self::load_with_defaults();
            if self.plans_dir.is_empty() {
                self.plans_dir = defaults.plans_dir;
            }
            if self.sounds_dir.is_empty() {
                self.sounds_dir = defaults.sounds_dir;
            }
        }
        self
    }

    fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(MIN_TICK_INTERVAL_MS))
    }

    fn plans_path(&self) -> PathBuf {
        PathBuf::from(&self.plans_dir)
    }

    fn sounds_path(&self) -> PathBuf {
        PathBuf::from(&self.sounds_dir)
    }
}
