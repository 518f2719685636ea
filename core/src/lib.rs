pub mod context;
pub mod cues;
pub mod plan;
pub mod runner;
pub mod session;
pub mod ticker;
pub mod timeline;

// Re-exports for convenience
pub use context::{AppConfig, AppConfigExt, AudioSettings, ConfigError, VoiceMode};
pub use cues::{AudioEvent, AudioReceiver, AudioSender, CueDispatcher, create_audio_channel};
pub use plan::{
    BUILTIN_PLAN_NAME, ExerciseDefinition, Plan, PlanError, PlanWithPath, ValidatedPlan,
    builtin_plan, load_plan_from_file, load_plans_from_dir,
};
pub use runner::{
    EventHandler, PlanRunner, RunnerEvent, RunnerSnapshot, RunnerState, RunnerStatus, Transition,
};
pub use session::{SessionCommand, SessionHandle, SessionOutcome, spawn_session};
pub use ticker::{IntervalTickSource, TickHandle, TickSource};
pub use timeline::{Clock, MonotonicClock, SegmentKind, SystemClock, Timeline, Timestamp};
