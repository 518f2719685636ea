//! Error types for cue playback

use std::path::PathBuf;
use thiserror::Error;

/// Failures of the audio side. Logged, never propagated into the runner.
#[derive(Debug, Error)]
pub enum CueError {
    #[error("failed to start '{command}'")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("sound file {} not found", .path.display())]
    MissingSound { path: PathBuf },

    #[error("no sound player configured")]
    NoSoundPlayer,

    #[error("audio queue is full, cue dropped")]
    QueueFull,

    #[error("audio service has stopped")]
    ServiceGone,
}
