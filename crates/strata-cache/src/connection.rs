//! Strata Cache Connection
//!
//! Connection handle to the cache cluster. Holds region state (entries plus
//! their listeners) and topic state behind the connection, so every region
//! handle for the same name observes the same entries and the same
//! subscriptions.
//!
//! Expiry is enforced here: any operation that observes an expired entry
//! purges it and fires an expired event before answering.
//!
//! @version 0.1.0
//! @author Strata Development Team

use crate::config::CacheConfig;
use crate::entry::CacheEntry;
use crate::listener::{EntryEvent, EntryEventKind, ListenerFn};
use crate::topic::TopicState;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use strata_common::{Result, StrataError};

// =============================================================================
// Region State
// =============================================================================

/// Cluster-side state for one named region.
struct RegionData {
    entries: HashMap<String, CacheEntry>,
    listeners: Vec<(u64, ListenerFn)>,
    next_listener_id: u64,
}

impl RegionData {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
            listeners: Vec::new(),
            next_listener_id: 1,
        }
    }

    fn snapshot_listeners(&self) -> Vec<ListenerFn> {
        self.listeners.iter().map(|(_, f)| Arc::clone(f)).collect()
    }
}

// =============================================================================
// Cache Connection
// =============================================================================

/// Connection to the cache cluster.
pub struct CacheConnection {
    config: CacheConfig,
    connected: AtomicBool,
    regions: RwLock<HashMap<String, RegionData>>,
    topics: RwLock<HashMap<String, Arc<TopicState>>>,
}

impl CacheConnection {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            connected: AtomicBool::new(false),
            regions: RwLock::new(HashMap::new()),
            topics: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Join the cluster.
    pub fn connect(&self) -> Result<()> {
        if self.connected.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        tracing::info!(
            address = %self.config.address,
            cluster = %self.config.cluster_name,
            "joined cache cluster"
        );
        Ok(())
    }

    /// Leave the cluster, releasing region and topic state.
    pub fn disconnect(&self) {
        if self.connected.swap(false, Ordering::SeqCst) {
            self.regions.write().clear();
            self.topics.write().clear();
            tracing::info!(cluster = %self.config.cluster_name, "left cache cluster");
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(StrataError::NotConnected)
        }
    }

    // -------------------------------------------------------------------------
    // Entry operations
    // -------------------------------------------------------------------------

    /// Store an entry without expiry, replacing any existing entry.
    pub(crate) fn set(&self, region: &str, key: String, value: String) -> Result<()> {
        self.store(region, key, value, None)
    }

    /// Store an entry with a TTL, replacing any existing entry and its deadline.
    pub(crate) fn set_with_ttl(
        &self,
        region: &str,
        key: String,
        value: String,
        ttl: Duration,
    ) -> Result<()> {
        self.store(region, key, value, Some(ttl))
    }

    fn store(&self, region: &str, key: String, value: String, ttl: Option<Duration>) -> Result<()> {
        self.ensure_connected()?;

        let listeners = {
            let mut regions = self.regions.write();
            let data = regions.entry(region.to_string()).or_insert_with(RegionData::new);
            data.entries.insert(key.clone(), CacheEntry::new(value.clone(), ttl));
            data.snapshot_listeners()
        };

        self.dispatch(
            &listeners,
            EntryEvent {
                kind: EntryEventKind::Updated,
                region: region.to_string(),
                key,
                value: Some(value),
            },
        );
        Ok(())
    }

    /// Look up an entry. Expired entries are purged and answer as absent.
    pub(crate) fn get(&self, region: &str, key: &str) -> Result<Option<String>> {
        self.ensure_connected()?;

        let (value, expired_listeners) = {
            let mut regions = self.regions.write();
            let Some(data) = regions.get_mut(region) else {
                return Ok(None);
            };
            match data.entries.get(key) {
                Some(entry) if entry.is_expired() => {
                    data.entries.remove(key);
                    (None, Some(data.snapshot_listeners()))
                }
                Some(entry) => (Some(entry.value().to_string()), None),
                None => (None, None),
            }
        };

        if let Some(listeners) = expired_listeners {
            self.dispatch(
                &listeners,
                EntryEvent {
                    kind: EntryEventKind::Expired,
                    region: region.to_string(),
                    key: key.to_string(),
                    value: None,
                },
            );
        }
        Ok(value)
    }

    /// Whether a live entry exists for the key.
    pub(crate) fn contains(&self, region: &str, key: &str) -> Result<bool> {
        Ok(self.get(region, key)?.is_some())
    }

    /// Remove an entry. Returns the removed value, if a live entry existed.
    pub(crate) fn remove(&self, region: &str, key: &str) -> Result<Option<String>> {
        self.ensure_connected()?;

        let (removed, event) = {
            let mut regions = self.regions.write();
            let Some(data) = regions.get_mut(region) else {
                return Ok(None);
            };
            match data.entries.remove(key) {
                Some(entry) if entry.is_expired() => (
                    None,
                    Some((data.snapshot_listeners(), EntryEventKind::Expired, None)),
                ),
                Some(entry) => {
                    let value = entry.value().to_string();
                    (
                        Some(value.clone()),
                        Some((data.snapshot_listeners(), EntryEventKind::Removed, Some(value))),
                    )
                }
                None => (None, None),
            }
        };

        if let Some((listeners, kind, value)) = event {
            self.dispatch(
                &listeners,
                EntryEvent {
                    kind,
                    region: region.to_string(),
                    key: key.to_string(),
                    value,
                },
            );
        }
        Ok(removed)
    }

    /// Replace the value of an existing live entry, keeping its deadline.
    /// Never creates an entry; returns whether a replacement happened.
    pub(crate) fn replace(&self, region: &str, key: &str, value: String) -> Result<bool> {
        self.ensure_connected()?;

        let (replaced, event) = {
            let mut regions = self.regions.write();
            let Some(data) = regions.get_mut(region) else {
                return Ok(false);
            };
            match data.entries.get_mut(key) {
                Some(entry) if entry.is_expired() => {
                    data.entries.remove(key);
                    (
                        false,
                        Some((data.snapshot_listeners(), EntryEventKind::Expired, None)),
                    )
                }
                Some(entry) => {
                    entry.set_value(value.clone());
                    (
                        true,
                        Some((data.snapshot_listeners(), EntryEventKind::Updated, Some(value))),
                    )
                }
                None => (false, None),
            }
        };

        if let Some((listeners, kind, value)) = event {
            self.dispatch(
                &listeners,
                EntryEvent {
                    kind,
                    region: region.to_string(),
                    key: key.to_string(),
                    value,
                },
            );
        }
        Ok(replaced)
    }

    /// Snapshot the keys of every live entry in a region.
    pub(crate) fn keys(&self, region: &str) -> Result<Vec<String>> {
        Ok(self
            .entries_snapshot(region)?
            .into_iter()
            .map(|(key, _)| key)
            .collect())
    }

    /// Snapshot every live entry in a region as (key, value) pairs.
    pub(crate) fn entries_snapshot(&self, region: &str) -> Result<Vec<(String, String)>> {
        self.ensure_connected()?;

        let (snapshot, expired) = {
            let mut regions = self.regions.write();
            let Some(data) = regions.get_mut(region) else {
                return Ok(Vec::new());
            };

            let expired_keys: Vec<String> = data
                .entries
                .iter()
                .filter(|(_, entry)| entry.is_expired())
                .map(|(key, _)| key.clone())
                .collect();
            for key in &expired_keys {
                data.entries.remove(key);
            }

            let snapshot: Vec<(String, String)> = data
                .entries
                .iter()
                .map(|(key, entry)| (key.clone(), entry.value().to_string()))
                .collect();

            let expired = if expired_keys.is_empty() {
                None
            } else {
                Some((data.snapshot_listeners(), expired_keys))
            };
            (snapshot, expired)
        };

        if let Some((listeners, keys)) = expired {
            for key in keys {
                self.dispatch(
                    &listeners,
                    EntryEvent {
                        kind: EntryEventKind::Expired,
                        region: region.to_string(),
                        key,
                        value: None,
                    },
                );
            }
        }
        Ok(snapshot)
    }

    // -------------------------------------------------------------------------
    // Listeners
    // -------------------------------------------------------------------------

    /// Register a region-scoped listener; returns its registration id.
    pub(crate) fn add_listener(&self, region: &str, listener: ListenerFn) -> Result<u64> {
        self.ensure_connected()?;

        let mut regions = self.regions.write();
        let data = regions.entry(region.to_string()).or_insert_with(RegionData::new);
        let id = data.next_listener_id;
        data.next_listener_id += 1;
        data.listeners.push((id, listener));
        Ok(id)
    }

    /// Deregister a listener by id. Unknown ids are ignored.
    pub(crate) fn remove_listener(&self, region: &str, id: u64) {
        let mut regions = self.regions.write();
        if let Some(data) = regions.get_mut(region) {
            data.listeners.retain(|(listener_id, _)| *listener_id != id);
        }
    }

    /// Invoke listeners outside any lock. Panicking listeners must not
    /// poison the region, so each runs under catch_unwind.
    fn dispatch(&self, listeners: &[ListenerFn], event: EntryEvent) {
        for listener in listeners {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                listener(&event);
            }));
            if result.is_err() {
                tracing::warn!(
                    region = %event.region,
                    kind = event.kind.as_str(),
                    "entry listener panicked"
                );
            }
        }
    }

    // -------------------------------------------------------------------------
    // Topics
    // -------------------------------------------------------------------------

    /// Get or create the state for a named topic.
    pub(crate) fn topic(&self, name: &str) -> Result<Arc<TopicState>> {
        self.ensure_connected()?;

        let mut topics = self.topics.write();
        Ok(Arc::clone(
            topics
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(TopicState::new(name))),
        ))
    }
}

// =============================================================================
// Tests
// =============================================================================
