pub mod schema;

use color_eyre::{eyre::eyre, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Open or create the database at `path` and run migrations.
pub fn open(path: &Path) -> Result<Connection> {
  // Ensure parent directory exists
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent)
      .map_err(|e| eyre!("Failed to create database directory: {}", e))?;
  }

  let conn = Connection::open(path)
    .map_err(|e| eyre!("Failed to open database at {}: {}", path.display(), e))?;

  // The offline cache and the key-value store hold separate connections
  conn
    .busy_timeout(Duration::from_secs(5))
    .map_err(|e| eyre!("Failed to configure database: {}", e))?;

  run_migrations(&conn)?;
  Ok(conn)
}

/// Open a throwaway database that lives only as long as the connection.
pub fn open_in_memory() -> Result<Connection> {
  let conn =
    Connection::open_in_memory().map_err(|e| eyre!("Failed to open in-memory database: {}", e))?;
  run_migrations(&conn)?;
  Ok(conn)
}

/// Get the database path inside `data_dir`, or the platform data directory.
pub fn default_path(data_dir: Option<&Path>) -> Result<PathBuf> {
  Ok(data_dir_or_default(data_dir)?.join("bistro.db"))
}

/// Resolve the directory for the database and log files.
pub fn data_dir_or_default(data_dir: Option<&Path>) -> Result<PathBuf> {
  if let Some(dir) = data_dir {
    return Ok(dir.to_path_buf());
  }

  let data_dir = dirs::data_dir()
    .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
    .ok_or_else(|| eyre!("Could not determine data directory"))?;

  Ok(data_dir.join("bistro"))
}

fn run_migrations(conn: &Connection) -> Result<()> {
  conn
    .execute_batch(schema::SCHEMA)
    .map_err(|e| eyre!("Failed to run migrations: {}", e))?;
  Ok(())
}
