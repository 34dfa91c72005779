//! Offline cache gateway for every outgoing request.
//!
//! This module provides a network-first caching mechanism that:
//! - Stores every successful (200) response in the current cache generation
//! - Serves the stored response byte-for-byte when the network fails
//! - Falls back to the cached root document for navigations
//! - Pre-caches a fixed manifest on install and purges old generations on activate

mod gateway;
mod http;
mod storage;
mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use gateway::{CacheGateway, GatewaySettings, GatewayState};
pub use http::HttpNetwork;
pub use storage::{CacheStorage, SqliteCacheStorage};
pub use traits::{CacheResult, Network, Request, ResponseSource};
