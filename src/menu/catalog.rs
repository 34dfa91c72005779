//! Loads the menu catalog through the offline gateway.

use async_trait::async_trait;
use color_eyre::{eyre::eyre, Result};
use tracing::info;
use url::Url;

use super::types::MenuSection;
use crate::offline::{CacheGateway, CacheResult, CacheStorage, Network, Request};

/// Anything that can produce the ordered list of menu sections.
#[async_trait]
pub trait CatalogSource: Send + Sync {
  async fn load(&self) -> Result<CacheResult<Vec<MenuSection>>>;
}

/// Fetches the catalog JSON document at a fixed URL.
pub struct CatalogLoader<S: CacheStorage, N: Network> {
  gateway: CacheGateway<S, N>,
  url: Url,
}

impl<S: CacheStorage, N: Network> CatalogLoader<S, N> {
  pub fn new(gateway: CacheGateway<S, N>, url: Url) -> Self {
    Self { gateway, url }
  }

  pub fn url(&self) -> &Url {
    &self.url
  }
}

#[async_trait]
impl<S, N> CatalogSource for CatalogLoader<S, N>
where
  S: CacheStorage + 'static,
  N: Network + 'static,
{
  async fn load(&self) -> Result<CacheResult<Vec<MenuSection>>> {
    let result = self.gateway.fetch(&Request::get(self.url.clone())).await?;

    if !result.data.is_ok() {
      return Err(eyre!(
        "Catalog request to {} returned status {}",
        self.url,
        result.data.status
      ));
    }

    let sections: Vec<MenuSection> = serde_json::from_slice(&result.data.body)
      .map_err(|e| eyre!("Failed to parse catalog {}: {}", self.url, e))?;

    info!(
      sections = sections.len(),
      source = ?result.source,
      "menu catalog loaded"
    );

    Ok(result.map(|_| sections))
  }
}
