//! Interactive input while a session runs

use std::io::BufRead;

use cadence_core::session::SessionCommand;
use clap::{Parser, Subcommand};
use tokio::sync::mpsc;

#[derive(Parser, Debug)]
#[command(name = "cadence", no_binary_name = true, disable_version_flag = true)]
struct ReplLine {
    #[command(subcommand)]
    command: ReplCommand,
}

/// Commands accepted while a plan is running
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplCommand {
    /// Pause the current exercise
    #[command(alias = "p")]
    Pause,
    /// Continue after a pause
    #[command(alias = "r")]
    Resume,
    /// Skip to the next exercise
    #[command(alias = "n", alias = "skip")]
    Next,
    /// Start the plan over
    Restart,
    /// Stop the plan
    #[command(alias = "quit", alias = "q", alias = "exit")]
    Stop,
    /// Show the current exercise and segment
    #[command(alias = "s")]
    Status,
}

impl ReplCommand {
    /// The session command this maps to, None for display-only commands
    pub fn session_command(self) -> Option<SessionCommand> {
        match self {
            ReplCommand::Pause => Some(SessionCommand::Pause),
            ReplCommand::Resume => Some(SessionCommand::Resume),
            ReplCommand::Next => Some(SessionCommand::Next),
            ReplCommand::Restart => Some(SessionCommand::Restart),
            ReplCommand::Stop => Some(SessionCommand::Stop),
            ReplCommand::Status => None,
        }
    }
}

/// Parse one input line. Ok(None) for a blank line.
pub fn parse_line(line: &str) -> Result<Option<ReplCommand>, String> {
    let args = shlex::split(line).ok_or("error: Invalid quoting")?;
    if args.is_empty() {
        return Ok(None);
    }
    let parsed = ReplLine::try_parse_from(args).map_err(|e| e.to_string())?;
    Ok(Some(parsed.command))
}

/// Forward stdin lines to the returned channel.
///
/// Reads on a plain thread: a blocked stdin read must not keep the runtime
/// from shutting down. The channel closes at end of input.
pub fn spawn_line_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(8);
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}
