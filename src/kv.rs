//! Local key-value storage for favorites, cart and user profile.
//!
//! Values are JSON strings. Reads degrade to defaults: a missing key or a
//! value that no longer parses is treated as "nothing saved".

use color_eyre::{eyre::eyre, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::db;

pub const FAVORITES_KEY: &str = "favorites";
pub const CART_KEY: &str = "cart";
pub const USER_KEY: &str = "user";

/// Storage port for string values.
pub trait KeyValueStore: Send + Sync {
  fn get(&self, key: &str) -> Result<Option<String>>;

  fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// SQLite-backed key-value store.
pub struct SqliteKvStore {
  conn: Mutex<Connection>,
}

impl SqliteKvStore {
  pub fn open(path: &Path) -> Result<Self> {
    Ok(Self {
      conn: Mutex::new(db::open(path)?),
    })
  }

  pub fn open_in_memory() -> Result<Self> {
    Ok(Self {
      conn: Mutex::new(db::open_in_memory()?),
    })
  }
}

impl KeyValueStore for SqliteKvStore {
  fn get(&self, key: &str) -> Result<Option<String>> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .query_row(
        "SELECT value FROM kv_store WHERE key = ?",
        params![key],
        |row| row.get(0),
      )
      .optional()
      .map_err(|e| eyre!("Failed to read key {}: {}", key, e))
  }

  fn set(&self, key: &str, value: &str) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .execute(
        "INSERT OR REPLACE INTO kv_store (key, value, updated_at) VALUES (?, ?, datetime('now'))",
        params![key, value],
      )
      .map_err(|e| eyre!("Failed to write key {}: {}", key, e))?;

    Ok(())
  }
}

/// In-process store with no persistence.
#[derive(Default)]
pub struct MemoryKvStore {
  values: Mutex<HashMap<String, String>>,
}

impl MemoryKvStore {
  pub fn new() -> Self {
    Self::default()
  }
}

impl KeyValueStore for MemoryKvStore {
  fn get(&self, key: &str) -> Result<Option<String>> {
    let values = self
      .values
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;
    Ok(values.get(key).cloned())
  }

  fn set(&self, key: &str, value: &str) -> Result<()> {
    let mut values = self
      .values
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;
    values.insert(key.to_string(), value.to_string());
    Ok(())
  }
}

/// Load and parse a JSON value, falling back to `T::default()`.
pub fn load_or_default<T, K>(kv: &K, key: &str) -> T
where
  T: DeserializeOwned + Default,
  K: KeyValueStore + ?Sized,
{
  let raw = match kv.get(key) {
    Ok(Some(raw)) => raw,
    Ok(None) => {
      debug!(key, "no saved value");
      return T::default();
    }
    Err(e) => {
      warn!(key, error = %e, "failed to read saved value, using default");
      return T::default();
    }
  };

  match serde_json::from_str(&raw) {
    Ok(value) => value,
    Err(e) => {
      warn!(key, error = %e, "saved value is not valid JSON, using default");
      T::default()
    }
  }
}

/// Serialize and store a value. Failures are logged; storage is best-effort.
pub fn save<T, K>(kv: &K, key: &str, value: &T)
where
  T: Serialize + ?Sized,
  K: KeyValueStore + ?Sized,
{
  let json = match serde_json::to_string(value) {
    Ok(json) => json,
    Err(e) => {
      warn!(key, error = %e, "failed to serialize value");
      return;
    }
  };

  if let Err(e) = kv.set(key, &json) {
    warn!(key, error = %e, "failed to persist value");
  }
}
