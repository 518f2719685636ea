pub mod audio;
pub mod commands;
pub mod context;
pub mod logging;
pub mod repl;

pub use context::CliContext;
