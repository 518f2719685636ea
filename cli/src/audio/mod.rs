//! Audio subsystem for exercise announcements and segment cues
//!
//! Speech goes through an external synthesizer (or the platform TTS engine
//! where available); cue sounds and announcement clips through an external
//! player program.

mod player;
mod service;

pub use player::{CommandPlayer, CuePlayer};
pub use service::AudioService;
