use color_eyre::{eyre::eyre, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;

pub const LOG_FILE: &str = "bistro.log";

/// Log to a file in `dir`, since the terminal belongs to the UI.
///
/// The filter comes from `BISTRO_LOG` (e.g. `BISTRO_LOG=bistro=debug`),
/// defaulting to `info`. Keep the guard alive until exit so buffered lines
/// are flushed.
pub fn init(dir: &Path) -> Result<WorkerGuard> {
  std::fs::create_dir_all(dir)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", dir.display(), e))?;

  let filter = tracing_subscriber::EnvFilter::try_from_env("BISTRO_LOG")
    .or_else(|_| tracing_subscriber::EnvFilter::try_new("info"))
    .map_err(|e| eyre!("Invalid log filter: {}", e))?;

  let appender = tracing_appender::rolling::never(dir, LOG_FILE);
  let (writer, guard) = tracing_appender::non_blocking(appender);

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(writer)
    .with_ansi(false)
    .with_target(false)
    .try_init()
    .map_err(|e| eyre!("Failed to initialize logging: {}", e))?;

  Ok(guard)
}
