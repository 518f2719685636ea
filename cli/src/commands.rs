use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use cadence_core::context::{AppConfig, AppConfigExt};
use cadence_core::cues::create_audio_channel;
use cadence_core::plan::{
    BUILTIN_PLAN_NAME, ValidatedPlan, builtin_plan, load_plan_from_file, load_plans_from_dir,
};
use cadence_core::runner::{RunnerEvent, RunnerSnapshot, Transition};
use cadence_core::session::{SessionOutcome, spawn_session};
use cadence_core::timeline::SystemClock;

use crate::CliContext;
use crate::context::ConfigUpdate;
use crate::audio::{AudioService, CommandPlayer};
use crate::repl::{self, ReplCommand};

const AUDIO_QUEUE: usize = 64;

/// Load the plan at `path`, or the built-in plan when none is given
pub fn resolve_plan(path: Option<&Path>) -> Result<ValidatedPlan, String> {
    let plan = match path {
        Some(path) => load_plan_from_file(path).map_err(|e| error_chain(&e))?,
        None => builtin_plan(),
    };
    plan.validate().map_err(|e| e.to_string())
}

/// Run a plan to completion, reading operator commands from stdin
pub async fn run_plan(ctx: &CliContext, plan: ValidatedPlan) -> Result<(), String> {
    println!(
        "Starting '{}': {} exercises, {}",
        plan.name(),
        plan.len(),
        format_duration(plan.plan().total_duration_secs())
    );
    println!("Commands: pause, resume, next, restart, status, stop");

    let (audio, audio_task) = if ctx.config.audio.enabled {
        let (tx, rx) = create_audio_channel(AUDIO_QUEUE);
        let player = CommandPlayer::new(&ctx.config.audio);
        let service = AudioService::new(rx, Arc::clone(&ctx.audio), ctx.config.sounds_path(), player);
        (Some(tx), Some(tokio::spawn(service.run())))
    } else {
        (None, None)
    };

    let mut handle = spawn_session(
        plan.clone(),
        ctx.config.tick_interval(),
        Arc::new(SystemClock),
        audio,
    );
    let mut events = handle.take_events();
    let mut snapshots = handle.snapshots.clone();
    let commands = handle.commands();
    let mut lines = repl::spawn_line_reader();

    let finished = handle.wait();
    tokio::pin!(finished);

    let outcome = loop {
        tokio::select! {
            outcome = &mut finished => break outcome,

            Some(event) = events.recv() => {
                clear_line()?;
                println!("{}", describe_event(&plan, &event));
            }

            Ok(()) = snapshots.changed() => {
                let line = snapshots.borrow_and_update().status_line();
                print_status(&line)?;
            }

            Some(line) = lines.recv() => match repl::parse_line(&line) {
                Ok(Some(ReplCommand::Status)) => {
                    let snapshot = snapshots.borrow().clone();
                    clear_line()?;
                    println!("{}", describe_snapshot(&snapshot));
                }
                Ok(Some(command)) => {
                    if let Some(command) = command.session_command() {
                        if commands.send(command).await.is_err() {
                            tracing::debug!(?command, "Session already ended");
                        }
                    }
                }
                Ok(None) => {}
                Err(err) => {
                    clear_line()?;
                    println!("{}", err.trim_end());
                }
            },
        }
    };

    clear_line()?;
    while let Ok(event) = events.try_recv() {
        println!("{}", describe_event(&plan, &event));
    }
    // The session dropped its audio sender; let queued cues start before exiting
    if let Some(task) = audio_task
        && let Err(e) = task.await
    {
        tracing::error!(error = %e, "Audio task failed");
    }

    match outcome {
        SessionOutcome::Finished => println!(
            "Finished '{}' at {}",
            plan.name(),
            chrono::Local::now().format("%H:%M")
        ),
        SessionOutcome::Stopped => println!("Stopped"),
    }
    Ok(())
}

/// List plan files under `dir` (or the configured plan directory)
pub fn list_plans(config: &AppConfig, dir: Option<&Path>) -> Result<(), String> {
    let dir = dir.map_or_else(|| config.plans_path(), Path::to_path_buf);
    let plans = load_plans_from_dir(&dir).map_err(|e| error_chain(&e))?;

    println!("{:<32} {:>9} {:>8}  File", "Plan", "Exercises", "Total");
    println!("{}", "-".repeat(80));

    let builtin = builtin_plan();
    println!(
        "{:<32} {:>9} {:>8}  (built-in)",
        BUILTIN_PLAN_NAME,
        builtin.len(),
        format_duration(builtin.total_duration_secs())
    );
    for entry in &plans {
        println!(
            "{:<32} {:>9} {:>8}  {}",
            entry.plan.name,
            entry.plan.len(),
            format_duration(entry.plan.total_duration_secs()),
            entry.file_path.display()
        );
    }

    println!("\nTotal: {} plans in {}", plans.len(), dir.display());
    Ok(())
}

/// Print every exercise with its expanded timeline
pub fn show_plan(plan: &ValidatedPlan) -> Result<(), String> {
    let definition = plan.plan();
    println!("{}", definition.name);
    if let Some(description) = &definition.description {
        println!("{description}");
    }
    println!();

    for (index, exercise) in definition.exercises.iter().enumerate() {
        let timeline = plan.timeline(index).map_err(|e| e.to_string())?;
        println!(
            "{:>2}. {} ({}x{}s{}, {})",
            index + 1,
            exercise.name,
            exercise.repetitions,
            exercise.work_duration_secs,
            exercise
                .rest_secs()
                .map(|rest| format!(" + {rest}s rest"))
                .unwrap_or_default(),
            format_duration(timeline.total_duration_secs())
        );
        if let Some(text) = &exercise.on_screen_text {
            println!("    {text}");
        }
        for segment in timeline.iter() {
            println!(
                "    {:<4} {:>6} - {:>6}",
                segment.kind,
                format_offset(segment.start_offset_ms),
                format_offset(segment.end_offset_ms)
            );
        }
    }

    println!("\nTotal: {}", format_duration(definition.total_duration_secs()));
    Ok(())
}

/// Print the effective configuration and where it is stored
pub fn show_config(config: &AppConfig) -> Result<(), String> {
    match AppConfig::config_path() {
        Ok(path) => println!("# {}", path.display()),
        Err(e) => println!("# configuration path unavailable: {}", error_chain(&e)),
    }
    let rendered = toml::to_string_pretty(config).map_err(|e| e.to_string())?;
    println!("{rendered}");
    Ok(())
}

/// Apply `update` to the stored configuration, then print it
pub fn configure(update: &ConfigUpdate) -> Result<(), String> {
    let mut config = AppConfig::load();
    if !update.is_empty() {
        let path = AppConfig::config_path().map_err(|e| error_chain(&e))?;
        if update_config(&mut config, update, &path)? {
            println!("Saved {}", path.display());
        } else {
            println!("Nothing to change");
        }
    }
    show_config(&config)
}

/// Write `config` to `path` if `update` changed it
pub fn update_config(
    config: &mut AppConfig,
    update: &ConfigUpdate,
    path: &Path,
) -> Result<bool, String> {
    if !update.apply(config) {
        return Ok(false);
    }
    config.save_to(path).map_err(|e| error_chain(&e))?;
    tracing::info!(path = %path.display(), "Configuration saved");
    Ok(true)
}

// ─────────────────────────────────────────────────────────────────────────────
// Formatting
// ─────────────────────────────────────────────────────────────────────────────

/// `m:ss`, or `h:mm:ss` from an hour up
pub fn format_duration(secs: u64) -> String {
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

fn format_offset(ms: u64) -> String {
    format_duration(ms / 1000)
}

fn describe_event(plan: &ValidatedPlan, event: &RunnerEvent) -> String {
    match &event.transition {
        Transition::ExerciseChanged {
            exercise_index,
            exercise_name,
            ..
        } => {
            let text = plan
                .exercise(*exercise_index)
                .and_then(|e| e.on_screen_text.as_deref())
                .map(|text| format!(": {text}"))
                .unwrap_or_default();
            format!(
                "[{}/{}] {}{}",
                exercise_index + 1,
                plan.len(),
                exercise_name,
                text
            )
        }
        Transition::SegmentChanged { kind, .. } => format!("  {kind}"),
        Transition::PlanFinished { exercise_count } => {
            format!("All {exercise_count} exercises done")
        }
    }
}

fn describe_snapshot(snapshot: &RunnerSnapshot) -> String {
    let mut line = snapshot.status_line();
    if snapshot.exercise_index.is_some() {
        line.push_str(&format!(
            " · exercise {}/{}",
            format_duration(snapshot.exercise_elapsed_secs),
            format_duration(snapshot.exercise_total_secs)
        ));
    }
    if let Some(segment) = snapshot.segment {
        line.push_str(&format!(" · {}s left", segment.remaining_secs()));
    }
    line
}

fn print_status(line: &str) -> Result<(), String> {
    write!(std::io::stdout(), "\r\x1b[2K{line}").map_err(|e| e.to_string())?;
    std::io::stdout().flush().map_err(|e| e.to_string())
}

fn clear_line() -> Result<(), String> {
    print_status("")
}

/// Error message followed by its sources
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(&format!(": {cause}"));
        source = cause.source();
    }
    message
}
