//! Error types for plan loading and validation

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised for malformed plans and exercises, and while loading plan files
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("plan '{plan}' has no exercises")]
    EmptyPlan { plan: String },

    #[error("exercise '{exercise}' must have a positive work duration")]
    NonPositiveDuration { exercise: String },

    #[error("exercise '{exercise}' must have at least one repetition")]
    NonPositiveRepetitions { exercise: String },

    #[error("exercise '{exercise}' is longer than {max_secs} seconds")]
    DurationTooLong { exercise: String, max_secs: u64 },

    #[error("exercise index {index} is out of bounds for a plan of {len} exercises")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("failed to read plan file {}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse plan TOML in {}", .path.display())]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to read plan directory {}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid plan in {}", .path.display())]
    InvalidFile {
        path: PathBuf,
        #[source]
        source: Box<PlanError>,
    },
}
