use std::path::PathBuf;

use cadence_cli::context::{ConfigUpdate, RunOverrides};
use cadence_cli::{CliContext, commands, logging};
use cadence_types::VoiceMode;
use clap::{Parser, Subcommand};

#[tokio::main]
async fn main() -> Result<(), String> {
    let cli = Cli::parse();
    let _log_guard = logging::init();

    match cli.command {
        Commands::Run {
            plan,
            interval_ms,
            voice,
            mute,
        } => {
            let ctx = CliContext::load(&RunOverrides {
                interval_ms,
                voice,
                mute,
            });
            let plan = commands::resolve_plan(plan.as_deref())?;
            commands::run_plan(&ctx, plan).await
        }
        Commands::List { dir } => {
            let ctx = CliContext::load(&RunOverrides::default());
            commands::list_plans(&ctx.config, dir.as_deref())
        }
        Commands::Show { plan } => {
            let plan = commands::resolve_plan(plan.as_deref())?;
            commands::show_plan(&plan)
        }
        Commands::Config {
            interval_ms,
            voice,
            mute,
            unmute,
        } => commands::configure(&ConfigUpdate {
            interval_ms,
            voice,
            audio_enabled: match (mute, unmute) {
                (true, _) => Some(false),
                (_, true) => Some(true),
                _ => None,
            },
        }),
    }
}

#[derive(Parser)]
#[command(name = "cadence", version, about = "Timed exercise plans with audio cues")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a plan (the built-in eye exercises when no file is given)
    Run {
        #[arg(short, long)]
        plan: Option<PathBuf>,
        /// Tick interval in milliseconds
        #[arg(long)]
        interval_ms: Option<u64>,
        /// Announce exercises with recorded clips or speech
        #[arg(long)]
        voice: Option<VoiceMode>,
        /// Disable all audio for this run
        #[arg(long)]
        mute: bool,
    },
    /// List plans in the plan directory
    List {
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    /// Print the timeline of every exercise in a plan
    Show {
        #[arg(short, long)]
        plan: Option<PathBuf>,
    },
    /// Print the effective configuration, saving any settings given
    Config {
        /// Tick interval in milliseconds
        #[arg(long)]
        interval_ms: Option<u64>,
        /// Announce exercises with recorded clips or speech
        #[arg(long)]
        voice: Option<VoiceMode>,
        /// Disable audio
        #[arg(long, conflicts_with = "unmute")]
        mute: bool,
        /// Enable audio
        #[arg(long)]
        unmute: bool,
    },
}
