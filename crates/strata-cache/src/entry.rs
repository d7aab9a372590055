//! Strata Cache Entry
//!
//! One cache entry: transport-encoded value plus optional expiry. Expiry is
//! logical: once the deadline passes the entry is unreachable via get and
//! contains, whether or not the cluster has physically reclaimed it yet.
//! Reclamation happens lazily when an expired entry is observed.
//!
//! @version 0.1.0
//! @author Strata Development Team

use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};

// =============================================================================
// Cache Entry
// =============================================================================

/// A single entry in a cache region.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    value: String,
    stored_at: DateTime<Utc>,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    /// Create an entry, TTL-bounded when `ttl` is given.
    pub fn new(value: String, ttl: Option<Duration>) -> Self {
        Self {
            value,
            stored_at: Utc::now(),
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        }
    }

    /// Get the transport-encoded value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replace the value, keeping the expiry deadline.
    pub fn set_value(&mut self, value: String) {
        self.value = value;
        self.stored_at = Utc::now();
    }

    /// When the entry was stored.
    pub fn stored_at(&self) -> DateTime<Utc> {
        self.stored_at
    }

    /// Whether the entry carries a TTL.
    pub fn is_ttl_bounded(&self) -> bool {
        self.expires_at.is_some()
    }

    /// Whether the expiry deadline has passed.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(deadline) => Instant::now() >= deadline,
            None => false,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_without_ttl_never_expires() {
        let entry = CacheEntry::new("\"v\"".to_string(), None);
        assert!(!entry.is_ttl_bounded());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_with_ttl() {
        let entry = CacheEntry::new("\"v\"".to_string(), Some(Duration::from_secs(60)));
        assert!(entry.is_ttl_bounded());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expires() {
        let entry = CacheEntry::new("\"v\"".to_string(), Some(Duration::from_millis(0)));
        assert!(entry.is_expired());
    }

    #[test]
    fn test_set_value_keeps_deadline() {
        let mut entry = CacheEntry::new("\"a\"".to_string(), Some(Duration::from_secs(60)));
        entry.set_value("\"b\"".to_string());
        assert_eq!(entry.value(), "\"b\"");
        assert!(entry.is_ttl_bounded());
    }
}
