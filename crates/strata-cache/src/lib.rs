//! Strata Cache - Distributed Cache Client
//!
//! Client facade for a TTL-aware distributed cache. Provides a thin cluster
//! connection holder, typed region handles with optional per-entry expiry,
//! region-scoped change listeners, publish/subscribe topics, and a queued
//! async lookup.
//!
//! Key Features:
//! - Typed regions over transport-encoded keys and values
//! - Per-entry TTL with logical expiry and lazy reclamation
//! - Region-scoped change listeners with cancellable handles
//! - Named topics for out-of-band string messaging
//!
//! @version 0.1.0
//! @author Strata Development Team

pub mod config;
pub mod connection;
pub mod entry;
pub mod listener;
pub mod region;
pub mod topic;

pub use config::CacheConfig;
pub use connection::CacheConnection;
pub use entry::CacheEntry;
pub use listener::{EntryEvent, EntryEventKind, ListenerHandle};
pub use region::RegionHandle;
pub use topic::{TopicHandle, TopicSubscription};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use strata_common::{Codec, JsonCodec, Result, TaskWorker};

// =============================================================================
// Cache Client
// =============================================================================

/// The distributed cache client: holds the cluster connection and hands out
/// region and topic facades. All async lookups of this client share one
/// background worker.
pub struct CacheClient {
    connection: Arc<CacheConnection>,
    worker: Arc<TaskWorker>,
}

impl CacheClient {
    /// Create a client with the given configuration. The client starts
    /// unconnected; call [`connect`](Self::connect) before use.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            connection: Arc::new(CacheConnection::new(config)),
            worker: Arc::new(TaskWorker::new("strata-cache")),
        }
    }

    /// Join the cluster.
    pub fn connect(&self) -> Result<()> {
        self.connection.connect()
    }

    /// Leave the cluster and stop the background worker. Queued async
    /// lookups run to completion first; subsequent operations fail.
    pub fn shutdown(&self) {
        self.connection.disconnect();
        self.worker.shutdown();
    }

    /// Check if connected.
    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    /// Get a typed facade for a named region.
    pub fn region<K, V>(&self, name: impl Into<String>) -> RegionHandle<K, V>
    where
        K: Serialize + DeserializeOwned,
        V: Serialize + DeserializeOwned + 'static,
    {
        self.region_with_codec(name, JsonCodec::new())
    }

    /// Get a region facade with a custom transport codec.
    pub fn region_with_codec<K, V, C>(
        &self,
        name: impl Into<String>,
        codec: C,
    ) -> RegionHandle<K, V, C>
    where
        K: Serialize + DeserializeOwned,
        V: Serialize + DeserializeOwned + 'static,
        C: Codec + Clone + 'static,
    {
        RegionHandle::new(
            name,
            Arc::clone(&self.connection),
            codec,
            Arc::clone(&self.worker),
        )
    }

    /// Get a handle for a named publish/subscribe topic.
    pub fn topic(&self, name: &str) -> Result<TopicHandle> {
        Ok(TopicHandle::new(self.connection.topic(name)?))
    }
}

// =============================================================================
// Tests
// =============================================================================
