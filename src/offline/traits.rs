//! Core traits and types for the offline gateway.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use color_eyre::Result;
use url::Url;

/// How a request was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
  /// Full-page navigation; may fall back to the cached root document
  Navigate,
  /// Any other resource (catalog, stylesheet, script, image)
  Resource,
}

/// An outgoing GET request.
#[derive(Debug, Clone)]
pub struct Request {
  pub url: Url,
  pub mode: RequestMode,
}

impl Request {
  pub fn get(url: Url) -> Self {
    Self {
      url,
      mode: RequestMode::Resource,
    }
  }

  pub fn navigate(url: Url) -> Self {
    Self {
      url,
      mode: RequestMode::Navigate,
    }
  }

  pub fn is_navigation(&self) -> bool {
    self.mode == RequestMode::Navigate
  }
}

/// A captured response: status, headers and the raw body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
  pub status: u16,
  pub headers: Vec<(String, String)>,
  pub body: Vec<u8>,
}

impl Response {
  pub fn is_ok(&self) -> bool {
    self.status == 200
  }

  pub fn header(&self, name: &str) -> Option<&str> {
    self
      .headers
      .iter()
      .find(|(k, _)| k.eq_ignore_ascii_case(name))
      .map(|(_, v)| v.as_str())
  }
}

/// Transport used by the gateway. An `Err` means the network is unreachable,
/// timed out or refused the connection; HTTP error statuses are `Ok`.
#[async_trait]
pub trait Network: Send + Sync {
  async fn fetch(&self, request: &Request) -> Result<Response>;
}

/// Result from a gateway fetch, including data and metadata about the source.
#[derive(Debug, Clone)]
pub struct CacheResult<T> {
  /// The actual data
  pub data: T,
  /// Where the data came from
  pub source: ResponseSource,
  /// When the data was cached (if from cache)
  pub cached_at: Option<DateTime<Utc>>,
}

impl<T> CacheResult<T> {
  pub fn from_network(data: T) -> Self {
    Self {
      data,
      source: ResponseSource::Network,
      cached_at: None,
    }
  }

  pub fn from_cache(data: T, cached_at: DateTime<Utc>) -> Self {
    Self {
      data,
      source: ResponseSource::Cache,
      cached_at: Some(cached_at),
    }
  }

  pub fn navigation_fallback(data: T, cached_at: DateTime<Utc>) -> Self {
    Self {
      data,
      source: ResponseSource::NavigationFallback,
      cached_at: Some(cached_at),
    }
  }

  /// Transform the payload, keeping the source metadata.
  pub fn map<U>(self, f: impl FnOnce(T) -> U) -> CacheResult<U> {
    CacheResult {
      data: f(self.data),
      source: self.source,
      cached_at: self.cached_at,
    }
  }

  pub fn is_offline(&self) -> bool {
    self.source.is_offline()
  }
}

/// Indicates where a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
  /// Fresh response from the network
  Network,
  /// Network failed; stored response for the same URL
  Cache,
  /// Network failed on a navigation; cached root document
  NavigationFallback,
}

impl ResponseSource {
  /// Served from storage rather than the network
  pub fn is_offline(&self) -> bool {
    *self != ResponseSource::Network
  }
}
