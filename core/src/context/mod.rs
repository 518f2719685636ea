mod config;
mod error;

pub use config::{
    AppConfig, AppConfigExt, AudioSettings, DEFAULT_TICK_INTERVAL_MS, MIN_TICK_INTERVAL_MS,
    VoiceMode,
};
pub use error::ConfigError;
