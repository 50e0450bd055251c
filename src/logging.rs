//! Logging initialization.
//!
//! Logs go to a per-run file under the user state directory so they never
//! interfere with the TUI. The log level is controlled via `RUST_LOG`,
//! defaulting to `info`. Initialization failures degrade to a warning on
//! stderr (printed before the TUI starts) and never abort the program.

use std::fs;
use std::path::PathBuf;

use chrono::Local;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init() {
    let Some(log_dir) = log_dir() else {
        return;
    };
    if let Err(err) = fs::create_dir_all(&log_dir) {
        eprintln!("Warning: failed to create log directory: {err}");
        return;
    }

    // One file per run, e.g. logs/cmdgen.2026-08-06-14-30-25.log
    let timestamp = Local::now().format("%Y-%m-%d-%H-%M-%S");
    let log_path = log_dir.join(format!("cmdgen.{timestamp}.log"));
    let log_file = match fs::File::create(&log_path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("Warning: failed to create log file: {err}");
            return;
        }
    };

    // Non-blocking writer so logging never stalls the event loop.
    let (non_blocking, guard) = tracing_appender::non_blocking(log_file);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    // Keep the non-blocking writer alive for the whole program lifetime.
    std::mem::forget(guard);

    tracing::info!("logging to {}", log_path.display());
}

fn log_dir() -> Option<PathBuf> {
    dirs::state_dir()
        .or_else(dirs::cache_dir)
        .map(|dir| dir.join("cmdgen").join("logs"))
}
