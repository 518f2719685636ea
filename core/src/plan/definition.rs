//! Plan and exercise definition types
//!
//! Definitions are loaded from TOML plan files (or the built-in plan) and are
//! never mutated while a plan is running.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::PlanError;
use crate::timeline::{self, Timeline};

/// Longest exercise accepted, in seconds
pub const MAX_EXERCISE_SECS: u64 = 24 * 60 * 60;

/// One exercise of a plan: `repetitions` rounds of work, separated by optional rest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseDefinition {
    /// Display name, also used for the spoken announcement
    pub name: String,

    /// Length of each work round in seconds
    #[serde(rename = "duration_secs")]
    pub work_duration_secs: u32,

    /// Number of work rounds
    #[serde(default = "default_repetitions")]
    pub repetitions: u32,

    /// Rest between work rounds in seconds (None or 0 = no rest)
    #[serde(rename = "rest_secs", default, skip_serializing_if = "Option::is_none")]
    pub rest_duration_secs: Option<u32>,

    /// Instruction shown while the exercise runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_screen_text: Option<String>,
}

impl ExerciseDefinition {
    pub fn new(name: impl Into<String>, work_duration_secs: u32, repetitions: u32) -> Self {
        Self {
            name: name.into(),
            work_duration_secs,
            repetitions,
            rest_duration_secs: None,
            on_screen_text: None,
        }
    }

    pub fn with_rest(mut self, rest_duration_secs: u32) -> Self {
        self.rest_duration_secs = Some(rest_duration_secs);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.on_screen_text = Some(text.into());
        self
    }

    /// Rest length if rest segments are generated for this exercise
    pub fn rest_secs(&self) -> Option<u32> {
        self.rest_duration_secs.filter(|&rest| rest > 0)
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        if self.work_duration_secs == 0 {
            return Err(PlanError::NonPositiveDuration {
                exercise: self.name.clone(),
            });
        }
        if self.repetitions == 0 {
            return Err(PlanError::NonPositiveRepetitions {
                exercise: self.name.clone(),
            });
        }
        match self.checked_duration_secs() {
            Some(total) if total <= MAX_EXERCISE_SECS => Ok(()),
            _ => Err(PlanError::DurationTooLong {
                exercise: self.name.clone(),
                max_secs: MAX_EXERCISE_SECS,
            }),
        }
    }

    /// Total length of the exercise: every work round plus the rests between them
    pub fn total_duration_secs(&self) -> u64 {
        self.checked_duration_secs().unwrap_or(u64::MAX)
    }

    fn checked_duration_secs(&self) -> Option<u64> {
        let reps = u64::from(self.repetitions);
        let rest = u64::from(self.rest_secs().unwrap_or(0));
        let work = reps.checked_mul(u64::from(self.work_duration_secs))?;
        let rests = reps.saturating_sub(1).checked_mul(rest)?;
        work.checked_add(rests)
    }
}

fn default_repetitions() -> u32 {
    1
}

/// An ordered list of exercises
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "exercise", default)]
    pub exercises: Vec<ExerciseDefinition>,
}

impl Plan {
    pub fn new(name: impl Into<String>, exercises: Vec<ExerciseDefinition>) -> Self {
        Self {
            name: name.into(),
            description: None,
            exercises,
        }
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    pub fn total_duration_secs(&self) -> u64 {
        self.exercises
            .iter()
            .map(ExerciseDefinition::total_duration_secs)
            .fold(0, u64::saturating_add)
    }

    /// Check the plan is runnable: non-empty, every exercise valid
    pub fn validate(self) -> Result<ValidatedPlan, PlanError> {
        if self.exercises.is_empty() {
            return Err(PlanError::EmptyPlan { plan: self.name });
        }
        for exercise in &self.exercises {
            exercise.validate()?;
        }
        Ok(ValidatedPlan(Arc::new(self)))
    }
}

/// A plan that passed validation. Only obtainable through [`Plan::validate`],
/// so every exercise in it expands to a non-empty timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPlan(Arc<Plan>);

impl ValidatedPlan {
    pub fn plan(&self) -> &Plan {
        &self.0
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn len(&self) -> usize {
        self.0.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn exercise(&self, index: usize) -> Option<&ExerciseDefinition> {
        self.0.exercises.get(index)
    }

    pub fn timeline(&self, index: usize) -> Result<Timeline, PlanError> {
        self.timeline_at(index).ok_or(PlanError::IndexOutOfBounds {
            index,
            len: self.len(),
        })
    }

    pub(crate) fn timeline_at(&self, index: usize) -> Option<Timeline> {
        self.exercise(index).map(timeline::expand)
    }
}
