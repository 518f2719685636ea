//! Exercise plans
//!
//! - **Definitions**: plans and exercises, as authored (TOML or built-in)
//! - **Validation**: [`Plan::validate`] turns a definition into a runnable [`ValidatedPlan`]
//! - **Loader**: reads plan files and plan directories

mod builtin;
mod definition;
mod error;
mod loader;

pub use builtin::{BUILTIN_PLAN_NAME, builtin_plan};
pub use definition::{ExerciseDefinition, MAX_EXERCISE_SECS, Plan, ValidatedPlan};
pub use error::PlanError;
pub use loader::{PlanWithPath, load_plan_from_file, load_plans_from_dir, parse_plan};
