//! Logging configuration with file-based output and size-based rotation.
//!
//! Writes logs to `~/.config/cadence/cadence.log` (or platform equivalent) with
//! 10 MB size-based rotation. Set `DEBUG_LOGGING=1` to enable debug output
//! for cadence crates.

use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const DEBUG_DIRECTIVE: &str = "info,cadence_core=debug,cadence_cli=debug";

/// Initialize logging with dual output (file + stderr).
///
/// Returns a `WorkerGuard` that MUST be held for the application lifetime
/// to ensure all buffered logs are flushed on shutdown.
///
/// # Behavior
/// - **File output:** INFO+, DEBUG+ for cadence crates when `DEBUG_LOGGING=1`
/// - **Stderr output:** WARN+ only, so the status line on stdout stays readable.
///   Follows the file filter when `DEBUG_LOGGING=1`.
/// - **Rotation:** Size-based at 10 MB, keeps only latest rotated file
///
/// # Fallback
/// If log directory creation fails, returns `None` and falls back to stderr-only logging.
pub fn init() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let debug_logging = std::env::var("DEBUG_LOGGING").is_ok();

    let log_dir = match dirs::config_dir() {
        Some(config) => config.join("cadence"),
        None => {
            init_stderr_only(debug_logging);
            return None;
        }
    };

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        // Can't use tracing yet since subscriber not initialized
        eprintln!(
            "Failed to create log directory {:?}: {}, using stderr only",
            log_dir, e
        );
        init_stderr_only(debug_logging);
        return None;
    }

    let log_path = log_dir.join("cadence.log");
    let file_appender = match BasicRollingFileAppender::new(
        &log_path,
        RollingConditionBasic::new().max_size(10 * 1024 * 1024),
        1, // cadence.log and cadence.log.1
    ) {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("Failed to create log file at {:?}: {}", log_path, e);
            init_stderr_only(debug_logging);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_span_events(FmtSpan::NONE)
        .with_filter(file_filter(debug_logging));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer(debug_logging))
        .init();

    tracing::info!(log_file = ?log_path, debug_logging, "Cadence logging initialized");

    Some(guard)
}

/// Fallback when file logging is unavailable
fn init_stderr_only(debug_logging: bool) {
    tracing_subscriber::registry()
        .with(stderr_layer(debug_logging))
        .init();

    tracing::debug!(debug_logging, "Cadence logging initialized (stderr only)");
}

fn stderr_layer<S>(debug_logging: bool) -> impl Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    let filter = if debug_logging {
        EnvFilter::new(DEBUG_DIRECTIVE)
    } else {
        EnvFilter::new("warn")
    };

    fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::NONE)
        .with_filter(filter)
}

fn file_filter(debug_logging: bool) -> EnvFilter {
    if debug_logging {
        EnvFilter::new(DEBUG_DIRECTIVE)
    } else {
        EnvFilter::new("info")
    }
}
