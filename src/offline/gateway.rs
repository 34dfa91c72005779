//! Gateway that puts the network first and the cache behind it.

use color_eyre::{eyre::eyre, Result};
use futures::future::try_join_all;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, warn};
use url::Url;

use super::storage::CacheStorage;
use super::traits::{CacheResult, Network, Request, Response};
use crate::config::Config;

/// Lifecycle of the current cache generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayState {
  /// Created; nothing pre-cached yet
  Parsed,
  /// Every manifest entry is stored in the current generation
  Installed,
  /// Old generations purged; the gateway controls all requests
  Activated,
}

/// Fixed settings for one gateway version.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
  /// Name of the current cache generation
  pub version: String,
  /// Assets pre-cached on install
  pub manifest: Vec<Url>,
  /// Root document served to navigations that miss the cache
  pub offline_root: Url,
}

impl GatewaySettings {
  pub fn from_config(config: &Config) -> Result<Self> {
    let manifest = config
      .cache
      .manifest
      .iter()
      .map(|entry| config.resolve(entry))
      .collect::<Result<Vec<_>>>()?;

    Ok(Self {
      version: config.cache.version.clone(),
      manifest,
      offline_root: config.base_url()?,
    })
  }
}

/// Network-first gateway over a versioned response cache.
pub struct CacheGateway<S: CacheStorage, N: Network> {
  storage: Arc<S>,
  network: Arc<N>,
  settings: Arc<GatewaySettings>,
  state: Arc<Mutex<GatewayState>>,
}

impl<S: CacheStorage, N: Network> CacheGateway<S, N> {
  pub fn new(storage: S, network: N, settings: GatewaySettings) -> Self {
    Self {
      storage: Arc::new(storage),
      network: Arc::new(network),
      settings: Arc::new(settings),
      state: Arc::new(Mutex::new(GatewayState::Parsed)),
    }
  }

  pub fn version(&self) -> &str {
    &self.settings.version
  }

  pub fn state(&self) -> GatewayState {
    self
      .state
      .lock()
      .map(|s| *s)
      .unwrap_or(GatewayState::Parsed)
  }

  fn set_state(&self, state: GatewayState) {
    if let Ok(mut current) = self.state.lock() {
      *current = state;
    }
  }

  /// Pre-cache every manifest entry into the current generation.
  ///
  /// All-or-nothing: responses are collected first and committed in a single
  /// transaction. The first failed fetch (or non-200 status) aborts the batch
  /// and nothing is written.
  pub async fn install(&self) -> Result<usize> {
    info!(
      version = %self.settings.version,
      entries = self.settings.manifest.len(),
      "installing offline cache"
    );

    let fetches = self.settings.manifest.iter().map(|url| async move {
      let response = self
        .network
        .fetch(&Request::get(url.clone()))
        .await
        .map_err(|e| eyre!("Failed to fetch {}: {}", url, e))?;

      if !response.is_ok() {
        return Err(eyre!("{} returned status {}", url, response.status));
      }

      Ok((url.to_string(), response))
    });

    let entries = match try_join_all(fetches).await {
      Ok(entries) => entries,
      Err(e) => {
        error!(version = %self.settings.version, error = %e, "offline cache install failed");
        return Err(e);
      }
    };

    self
      .storage
      .put_all(&self.settings.version, &entries)
      .inspect_err(|e| error!(error = %e, "failed to store offline cache"))?;

    self.set_state(GatewayState::Installed);
    info!(entries = entries.len(), "offline cache installed");
    Ok(entries.len())
  }

  /// Delete every generation except the current one and take control.
  ///
  /// Returns the names of the deleted generations.
  pub async fn activate(&self) -> Result<Vec<String>> {
    let mut deleted = Vec::new();

    for name in self.storage.generations()? {
      if name != self.settings.version {
        info!(generation = %name, "deleting old cache generation");
        self.storage.delete_generation(&name)?;
        deleted.push(name);
      }
    }

    self.set_state(GatewayState::Activated);
    info!(version = %self.settings.version, "offline cache active");
    Ok(deleted)
  }

  /// Install then activate. An install failure is logged and activation still
  /// happens; runtime fetches repopulate the current generation.
  pub async fn start(&self) -> Result<GatewayState> {
    if let Err(e) = self.install().await {
      warn!(error = %e, "continuing without a pre-cached app shell");
    }
    self.activate().await?;
    Ok(self.state())
  }

  /// Fetch a request, network first.
  ///
  /// 1. Try the network; a 200 response is stored and returned
  /// 2. Other statuses are returned without being stored
  /// 3. On network failure, return the stored response for the URL
  /// 4. Navigations with no stored response get the cached root document
  /// 5. Otherwise the request fails
  pub async fn fetch(&self, request: &Request) -> Result<CacheResult<Response>> {
    let url = request.url.as_str();

    let network_error = match self.network.fetch(request).await {
      Ok(response) => {
        if response.is_ok() {
          if let Err(e) = self.storage.put(&self.settings.version, url, &response) {
            warn!(url, error = %e, "failed to cache response");
          }
        } else {
          debug!(url, status = response.status, "not caching non-200 response");
        }
        return Ok(CacheResult::from_network(response));
      }
      Err(e) => e,
    };

    debug!(url, error = %network_error, "network failed, trying cache");

    if let Some(entry) = self.storage.lookup(&self.settings.version, url)? {
      info!(url, "serving cached response");
      return Ok(CacheResult::from_cache(entry.response, entry.cached_at));
    }

    if request.is_navigation() {
      let root = self.settings.offline_root.as_str();
      if let Some(entry) = self.storage.lookup(&self.settings.version, root)? {
        info!(url, root, "serving cached root document");
        return Ok(CacheResult::navigation_fallback(
          entry.response,
          entry.cached_at,
        ));
      }
    }

    Err(eyre!(
      "Offline and no cached response for {}: {}",
      url,
      network_error
    ))
  }
}

impl<S: CacheStorage, N: Network> Clone for CacheGateway<S, N> {
  fn clone(&self) -> Self {
    Self {
      storage: Arc::clone(&self.storage),
      network: Arc::clone(&self.network),
      settings: Arc::clone(&self.settings),
      state: Arc::clone(&self.state),
    }
  }
}
