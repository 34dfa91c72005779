use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Name shown in the header and in the order message
  pub business_name: String,
  /// Where the menu app is published; relative paths resolve against it
  pub base_url: String,
  /// Catalog location, relative to `base_url`
  pub catalog_path: String,
  /// Fixed delay before the menu is shown, in milliseconds (0 disables it)
  pub loading_gate_ms: u64,
  /// Directory for the database and log file (defaults to the platform data dir)
  pub data_dir: Option<PathBuf>,
  pub network: NetworkConfig,
  pub cache: CacheConfig,
  pub checkout: CheckoutConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
  pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
  /// Name of the current cache generation; older generations are purged on activation
  pub version: String,
  /// Assets stored on install. Relative entries resolve against `base_url`.
  pub manifest: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CheckoutConfig {
  /// Messaging service base URL
  pub endpoint: String,
  /// Recipient id appended to the endpoint (international phone number, digits only)
  pub recipient: String,
  /// Command used to open the handoff link (defaults to the platform opener)
  pub opener: Option<Vec<String>>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      business_name: "Bistrô Recantinho da Serra".to_string(),
      base_url: "http://localhost:8080/bistrorecantinhodaserra/".to_string(),
      catalog_path: "data/data.json".to_string(),
      loading_gate_ms: 800,
      data_dir: None,
      network: NetworkConfig::default(),
      cache: CacheConfig::default(),
      checkout: CheckoutConfig::default(),
    }
  }
}

impl Default for NetworkConfig {
  fn default() -> Self {
    Self { timeout_secs: 10 }
  }
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      version: "bistro-recantinho-v1".to_string(),
      manifest: [
        "./",
        "index.html",
        "css/styles.css",
        "js/app.js",
        "data/data.json",
        "assets/logo.PNG",
        "css/tailwind/output.css",
        "https://fonts.googleapis.com/css2?family=Inter:wght@400;500;600;700&display=swap",
        "https://unpkg.com/alpinejs@3.x.x/dist/cdn.min.js",
      ]
      .iter()
      .map(|s| s.to_string())
      .collect(),
    }
  }
}

impl Default for CheckoutConfig {
  fn default() -> Self {
    Self {
      endpoint: "https://wa.me".to_string(),
      recipient: "558381157571".to_string(),
      opener: None,
    }
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided (must exist)
  /// 2. ./bistro.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/bistro/config.yaml
  ///
  /// Built-in defaults are used when no file is found.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    let config = match path {
      Some(p) => Self::load_from_path(&p)?,
      None => Self::default(),
    };

    config.with_env_overrides().validated()
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("bistro.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("bistro").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::from_yaml(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn from_yaml(contents: &str) -> Result<Self> {
    // An empty file deserializes to null, which should mean "all defaults"
    if contents.trim().is_empty() {
      return Ok(Self::default());
    }
    Ok(serde_yaml::from_str(contents)?)
  }

  /// BISTRO_RECIPIENT replaces the configured messaging recipient.
  fn with_env_overrides(mut self) -> Self {
    if let Ok(recipient) = std::env::var("BISTRO_RECIPIENT") {
      if !recipient.trim().is_empty() {
        self.checkout.recipient = recipient.trim().to_string();
      }
    }
    self
  }

  fn validated(self) -> Result<Self> {
    self.base_url()?;
    if self.cache.version.trim().is_empty() {
      return Err(eyre!("cache.version must not be empty"));
    }
    if self.checkout.recipient.trim().is_empty() {
      return Err(eyre!("checkout.recipient must not be empty"));
    }
    Ok(self)
  }

  /// The base URL, always ending in '/' so relative paths join beneath it.
  pub fn base_url(&self) -> Result<Url> {
    let mut raw = self.base_url.trim().to_string();
    if !raw.ends_with('/') {
      raw.push('/');
    }
    Url::parse(&raw).map_err(|e| eyre!("Invalid base_url '{}': {}", self.base_url, e))
  }

  /// Resolve a manifest or catalog entry against the base URL.
  pub fn resolve(&self, entry: &str) -> Result<Url> {
    self
      .base_url()?
      .join(entry.trim())
      .map_err(|e| eyre!("Invalid URL '{}': {}", entry, e))
  }

  pub fn catalog_url(&self) -> Result<Url> {
    self.resolve(&self.catalog_path)
  }

  pub fn loading_gate(&self) -> Duration {
    Duration::from_millis(self.loading_gate_ms)
  }

  pub fn request_timeout(&self) -> Duration {
    Duration::from_secs(self.network.timeout_secs.max(1))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_yaml_uses_defaults() {
    let config = Config::from_yaml("").unwrap();
    assert_eq!(config.cache.version, "bistro-recantinho-v1");
    assert_eq!(config.loading_gate_ms, 800);
    assert_eq!(config.cache.manifest.len(), 9);
  }

  #[test]
  fn test_partial_yaml_overrides() {
    let yaml = r#"
base_url: https://example.com/menu
loading_gate_ms: 0
cache:
  version: bistro-v2
checkout:
  recipient: "5511999999999"
"#;
    let config = Config::from_yaml(yaml).unwrap();
    assert_eq!(config.cache.version, "bistro-v2");
    // Manifest keeps its default when only the version is given
    assert!(!config.cache.manifest.is_empty());
    assert_eq!(config.checkout.recipient, "5511999999999");
    assert_eq!(config.checkout.endpoint, "https://wa.me");
    assert!(config.loading_gate().is_zero());
  }

  #[test]
  fn test_base_url_gets_trailing_slash() {
    let config = Config {
      base_url: "https://example.com/menu".to_string(),
      ..Config::default()
    };
    assert_eq!(
      config.catalog_url().unwrap().as_str(),
      "https://example.com/menu/data/data.json"
    );
    assert_eq!(
      config.resolve("./").unwrap().as_str(),
      "https://example.com/menu/"
    );
  }

  #[test]
  fn test_absolute_manifest_entry_is_kept() {
    let config = Config::default();
    let url = config
      .resolve("https://unpkg.com/alpinejs@3.x.x/dist/cdn.min.js")
      .unwrap();
    assert_eq!(url.host_str(), Some("unpkg.com"));
  }

  #[test]
  fn test_invalid_base_url_is_rejected() {
    let config = Config {
      base_url: "not a url".to_string(),
      ..Config::default()
    };
    assert!(config.validated().is_err());
  }

  #[test]
  fn test_missing_explicit_path_is_an_error() {
    assert!(Config::load(Some(Path::new("/nonexistent/bistro.yaml"))).is_err());
  }
}
