//! Audio cues
//!
//! This module provides:
//! - **Dispatcher**: runner event handler that emits one audio event per transition
//! - **Audio events**: what the audio service is asked to play
//! - **Sounds**: lookup of cue sounds and announcement clips on disk
//! - **Praise**: phrases spoken when a plan is finished
//!
//! ```text
//! PlanRunner ──RunnerEvent──▶ CueDispatcher ──AudioEvent (try_send)──▶ audio service
//! ```

mod dispatcher;
mod error;
mod events;
mod praise;
pub mod sounds;

pub use dispatcher::CueDispatcher;
pub use error::CueError;
pub use events::{AudioEvent, AudioReceiver, AudioSender, create_audio_channel};
pub use praise::{PRAISE_PHRASES, random_praise};
