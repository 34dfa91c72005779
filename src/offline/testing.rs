//! Test doubles for the offline gateway.

use async_trait::async_trait;
use color_eyre::{eyre::eyre, Result};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use super::traits::{Network, Request, Response};

/// Network stub: serves fixed responses and can be switched off or told to
/// fail individual URLs.
#[derive(Default)]
pub struct StubNetwork {
  responses: Mutex<HashMap<String, Response>>,
  failing: Mutex<HashSet<String>>,
  offline: Mutex<bool>,
}

impl StubNetwork {
  pub fn serve(&self, url: &str, status: u16, body: &str) {
    self.responses.lock().unwrap().insert(
      url.to_string(),
      Response {
        status,
        headers: vec![("content-type".to_string(), "text/plain".to_string())],
        body: body.as_bytes().to_vec(),
      },
    );
  }

  pub fn fail(&self, url: &str) {
    self.failing.lock().unwrap().insert(url.to_string());
  }

  pub fn set_offline(&self, offline: bool) {
    *self.offline.lock().unwrap() = offline;
  }
}

#[async_trait]
impl Network for StubNetwork {
  async fn fetch(&self, request: &Request) -> Result<Response> {
    let url = request.url.as_str();
    if *self.offline.lock().unwrap() || self.failing.lock().unwrap().contains(url) {
      return Err(eyre!("connection refused"));
    }
    self
      .responses
      .lock()
      .unwrap()
      .get(url)
      .cloned()
      .ok_or_else(|| eyre!("connection reset"))
  }
}
