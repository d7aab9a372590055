//! Strata Cache Configuration
//!
//! Connection configuration for the distributed cache cluster.
//!
//! @version 0.1.0
//! @author Strata Development Team

use serde::{Deserialize, Serialize};

// =============================================================================
// Cache Configuration
// =============================================================================

/// Configuration for a cache cluster connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Address of a cluster member to bootstrap from.
    pub address: String,
    /// Name of the cluster to join.
    pub cluster_name: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            address: "localhost:5701".to_string(),
            cluster_name: "dev".to_string(),
        }
    }
}

impl CacheConfig {
    /// Create a new configuration.
    pub fn new(address: impl Into<String>, cluster_name: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            cluster_name: cluster_name.into(),
        }
    }

    /// Set the cluster address.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Set the cluster name.
    pub fn with_cluster_name(mut self, name: impl Into<String>) -> Self {
        self.cluster_name = name.into();
        self
    }
}

// =============================================================================
// Tests
// =============================================================================
