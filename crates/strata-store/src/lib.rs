//! Strata Store - Document Store Client
//!
//! Client facade for a document-oriented store. Provides a thin connection
//! holder, per-collection handles with CRUD and async CRUD, paired lookups,
//! and the aggregation engine (sum, leaderboard rank, top-N).
//!
//! Key Features:
//! - Single-field equality lookups with exact matching
//! - Fire-and-forget and callback-style async operations, FIFO per handle
//! - Server-side aggregation pipelines (sort, group/sum, limit, rank)
//! - Pluggable transport codec with a JSON default
//!
//! @version 0.1.0
//! @author Strata Development Team

mod aggregate;
pub mod collection;
pub mod config;
pub mod connection;

pub use collection::CollectionHandle;
pub use config::StoreConfig;
pub use connection::StoreConnection;

use std::sync::Arc;
use strata_common::{Codec, JsonCodec, Result};

// =============================================================================
// Store Client
// =============================================================================

/// The document store client: holds the connection and hands out collection
/// facades. The facade never caches documents; the store owns them.
pub struct StoreClient {
    connection: Arc<StoreConnection>,
}

impl StoreClient {
    /// Create a client with the given configuration. The client starts
    /// unconnected; call [`connect`](Self::connect) before use.
    pub fn new(config: StoreConfig) -> Self {
        Self {
            connection: Arc::new(StoreConnection::new(config)),
        }
    }

    /// Create a client from a `strata://` URL.
    pub fn from_url(url: &str) -> Result<Self> {
        Ok(Self::new(StoreConfig::from_url(url)?))
    }

    /// Establish the connection to the store.
    pub fn connect(&self) -> Result<()> {
        self.connection.connect()
    }

    /// Release the connection. Subsequent operations on this client and on
    /// handles derived from it fail with `NotConnected`.
    pub fn disconnect(&self) {
        self.connection.disconnect();
    }

    /// Check if connected.
    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    /// Get a facade for a named collection in the configured database.
    pub fn collection(&self, name: impl Into<String>) -> CollectionHandle {
        self.collection_with_codec(name, JsonCodec::new())
    }

    /// Get a facade for a named collection in another database on the same
    /// client.
    pub fn collection_in(
        &self,
        database: impl Into<String>,
        name: impl Into<String>,
    ) -> CollectionHandle {
        CollectionHandle::new(database, name, Arc::clone(&self.connection), JsonCodec::new())
    }

    /// Get a collection facade with a custom transport codec.
    pub fn collection_with_codec<C: Codec + Clone + 'static>(
        &self,
        name: impl Into<String>,
        codec: C,
    ) -> CollectionHandle<C> {
        CollectionHandle::new(
            self.connection.database().to_string(),
            name,
            Arc::clone(&self.connection),
            codec,
        )
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use strata_common::StrataError;
    use strata_document::Document;

    #[test]
    fn test_client_lifecycle() {
        let client = StoreClient::new(StoreConfig::default());
        assert!(!client.is_connected());

        client.connect().unwrap();
        assert!(client.is_connected());

        client.disconnect();
        assert!(!client.is_connected());
    }

    #[test]
    fn test_collections_share_connection() {
        let client = StoreClient::new(StoreConfig::default());
        client.connect().unwrap();

        let writer = client.collection("players");
        let reader = client.collection("players");

        writer
            .create(&Document::new().with("name", "alice"))
            .unwrap();
        assert!(reader.get("name", "alice").unwrap().is_some());
    }

    #[test]
    fn test_collections_in_other_database_are_isolated() {
        let client = StoreClient::new(StoreConfig::default());
        client.connect().unwrap();

        client
            .collection("players")
            .create(&Document::new().with("name", "alice"))
            .unwrap();

        let other = client.collection_in("lobby", "players");
        assert!(other.get("name", "alice").unwrap().is_none());
    }

    #[test]
    fn test_operations_after_disconnect_fail() {
        let client = StoreClient::new(StoreConfig::default());
        client.connect().unwrap();
        let coll = client.collection("players");

        client.disconnect();
        let result = coll.create(&Document::new().with("name", "alice"));
        assert!(matches!(result, Err(StrataError::NotConnected)));
    }

    #[test]
    fn test_from_url() {
        let client = StoreClient::from_url("strata://localhost:27017/game").unwrap();
        assert!(!client.is_connected());
    }
}
