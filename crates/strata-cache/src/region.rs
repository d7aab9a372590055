//! Strata Region Facade
//!
//! The per-region operation surface: typed put/get/remove/replace with
//! optional TTL, region-scoped change listeners, snapshots, and an async
//! lookup. Codec conversion runs at this boundary for both keys and values;
//! the connection below it only sees transport text.
//!
//! Async lookups queue on the client-wide background worker, so async calls
//! across every region of the same client run in FIFO order. There is no
//! ordering guarantee relative to synchronous calls from other threads.
//!
//! @version 0.1.0
//! @author Strata Development Team

use crate::connection::CacheConnection;
use crate::listener::{EntryEvent, ListenerHandle};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use strata_common::{Codec, JsonCodec, Result, StrataError, TaskWorker};

// =============================================================================
// Region Handle
// =============================================================================

/// Facade over one named region of the cache cluster.
///
/// Handles for the same region name share entries and listeners; the types
/// `K` and `V` are a per-handle view, not enforced by the cluster.
pub struct RegionHandle<K, V, C: Codec = JsonCodec> {
    name: String,
    connection: Arc<CacheConnection>,
    codec: C,
    worker: Arc<TaskWorker>,
    _marker: PhantomData<fn(K) -> V>,
}

impl<K, V, C> RegionHandle<K, V, C>
where
    K: Serialize + DeserializeOwned,
    V: Serialize + DeserializeOwned + 'static,
    C: Codec + Clone + 'static,
{
    pub(crate) fn new(
        name: impl Into<String>,
        connection: Arc<CacheConnection>,
        codec: C,
        worker: Arc<TaskWorker>,
    ) -> Self {
        Self {
            name: name.into(),
            connection,
            codec,
            worker,
            _marker: PhantomData,
        }
    }

    /// Get the region name.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn check_ttl(ttl_seconds: u64) -> Result<Duration> {
        if ttl_seconds == 0 {
            return Err(StrataError::InvalidArgument(
                "ttl must be positive".to_string(),
            ));
        }
        Ok(Duration::from_secs(ttl_seconds))
    }

    // -------------------------------------------------------------------------
    // Entry operations
    // -------------------------------------------------------------------------

    /// Store a value under a key without expiry, replacing any existing
    /// entry and discarding its TTL if it had one.
    pub fn set(&self, key: &K, value: &V) -> Result<()> {
        let key = self.codec.encode(key)?;
        let value = self.codec.encode(value)?;
        self.connection.set(&self.name, key, value)
    }

    /// Store a value under a key, expiring `ttl_seconds` from now.
    ///
    /// A zero TTL is rejected as invalid rather than interpreted as
    /// "no expiry". Replaces any existing entry and its deadline.
    pub fn set_with_ttl(&self, key: &K, value: &V, ttl_seconds: u64) -> Result<()> {
        let ttl = Self::check_ttl(ttl_seconds)?;
        let key = self.codec.encode(key)?;
        let value = self.codec.encode(value)?;
        self.connection.set_with_ttl(&self.name, key, value, ttl)
    }

    /// Store a TTL-bounded value and register a region-scoped listener in
    /// one call.
    ///
    /// The listener observes the whole region, not just this key, and it is
    /// registered after the write lands, so it observes subsequent entry
    /// lifecycle events but not the write's own update event.
    pub fn set_with_ttl_listening<F>(
        &self,
        key: &K,
        value: &V,
        ttl_seconds: u64,
        listener: F,
    ) -> Result<ListenerHandle>
    where
        F: Fn(&EntryEvent) + Send + Sync + 'static,
    {
        let ttl = Self::check_ttl(ttl_seconds)?;
        let key = self.codec.encode(key)?;
        let value = self.codec.encode(value)?;

        self.connection.set_with_ttl(&self.name, key, value, ttl)?;
        self.listen(listener)
    }

    /// Register a region-scoped change listener.
    ///
    /// The listener observes update, remove, and expire events for every key
    /// in the region until the returned handle is cancelled. Events carry
    /// transport-form keys and values.
    pub fn listen<F>(&self, listener: F) -> Result<ListenerHandle>
    where
        F: Fn(&EntryEvent) + Send + Sync + 'static,
    {
        let id = self.connection.add_listener(&self.name, Arc::new(listener))?;
        Ok(ListenerHandle::new(
            self.name.clone(),
            id,
            Arc::clone(&self.connection),
        ))
    }

    /// Look up a value by key. Expired or absent entries are `None`; decode
    /// failures are errors, not absence.
    pub fn get(&self, key: &K) -> Result<Option<V>> {
        let key = self.codec.encode(key)?;
        match self.connection.get(&self.name, &key)? {
            Some(encoded) => Ok(Some(self.codec.decode(&encoded)?)),
            None => Ok(None),
        }
    }

    /// Queued lookup: invokes `on_result` exactly once on the worker thread
    /// with the same result a synchronous `get` would produce, including
    /// transport and decode failures.
    pub fn get_async<F>(&self, key: &K, on_result: F) -> Result<()>
    where
        F: FnOnce(Result<Option<V>>) + Send + 'static,
    {
        let key = self.codec.encode(key)?;
        let connection = Arc::clone(&self.connection);
        let codec = self.codec.clone();
        let name = self.name.clone();

        self.worker.submit(move || {
            let result = connection
                .get(&name, &key)
                .and_then(|encoded| match encoded {
                    Some(encoded) => codec.decode(&encoded).map(Some),
                    None => Ok(None),
                });
            on_result(result);
        })
    }

    /// Whether a live (unexpired) entry exists for the key.
    pub fn contains(&self, key: &K) -> Result<bool> {
        let key = self.codec.encode(key)?;
        self.connection.contains(&self.name, &key)
    }

    /// Remove an entry, returning its value if a live entry existed.
    pub fn remove(&self, key: &K) -> Result<Option<V>> {
        let key = self.codec.encode(key)?;
        match self.connection.remove(&self.name, &key)? {
            Some(encoded) => Ok(Some(self.codec.decode(&encoded)?)),
            None => Ok(None),
        }
    }

    /// Replace the value of an existing live entry, keeping its TTL
    /// deadline. Never creates an entry; returns whether a replacement
    /// happened.
    pub fn replace(&self, key: &K, value: &V) -> Result<bool> {
        let key = self.codec.encode(key)?;
        let value = self.codec.encode(value)?;
        self.connection.replace(&self.name, &key, value)
    }

    // -------------------------------------------------------------------------
    // Snapshots
    // -------------------------------------------------------------------------

    /// Snapshot of every live key in the region.
    ///
    /// A point-in-time copy in no particular order; entries that expire
    /// after the call may still appear in the result.
    pub fn keys(&self) -> Result<Vec<K>> {
        self.connection
            .keys(&self.name)?
            .iter()
            .map(|key| self.codec.decode(key))
            .collect()
    }

    /// Snapshot of every live entry in the region.
    pub fn entries(&self) -> Result<HashMap<K, V>>
    where
        K: Eq + Hash,
    {
        self.connection
            .entries_snapshot(&self.name)?
            .iter()
            .map(|(key, value)| Ok((self.codec.decode(key)?, self.codec.decode(value)?)))
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheConfig;
    use crate::listener::EntryEventKind;
    use serde::Deserialize;
    use std::sync::mpsc::channel;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Profile {
        name: String,
        level: u32,
    }

    fn region() -> RegionHandle<String, Profile> {
        let connection = Arc::new(CacheConnection::new(CacheConfig::default()));
        connection.connect().unwrap();
        let worker = Arc::new(TaskWorker::new("strata-cache-test"));
        RegionHandle::new("profiles", connection, JsonCodec::new(), worker)
    }

    fn profile(name: &str, level: u32) -> Profile {
        Profile {
            name: name.to_string(),
            level,
        }
    }

    #[test]
    fn test_set_get_round_trip() {
        let region = region();
        let value = profile("alice", 3);
        region.set(&"alice".to_string(), &value).unwrap();
        assert_eq!(region.get(&"alice".to_string()).unwrap(), Some(value));
    }

    #[test]
    fn test_get_missing() {
        let region = region();
        assert_eq!(region.get(&"ghost".to_string()).unwrap(), None);
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let region = region();
        let result = region.set_with_ttl(&"k".to_string(), &profile("a", 1), 0);
        assert!(result.unwrap_err().is_user_error());
        // Nothing was stored.
        assert!(!region.contains(&"k".to_string()).unwrap());
    }

    #[test]
    fn test_set_discards_previous_ttl() {
        let region = region();
        region
            .set_with_ttl(&"k".to_string(), &profile("a", 1), 60)
            .unwrap();
        region.set(&"k".to_string(), &profile("a", 2)).unwrap();
        assert_eq!(region.get(&"k".to_string()).unwrap(), Some(profile("a", 2)));
    }

    #[test]
    fn test_remove_returns_value() {
        let region = region();
        region.set(&"k".to_string(), &profile("a", 1)).unwrap();
        assert_eq!(
            region.remove(&"k".to_string()).unwrap(),
            Some(profile("a", 1))
        );
        assert_eq!(region.remove(&"k".to_string()).unwrap(), None);
    }

    #[test]
    fn test_replace_never_creates() {
        let region = region();
        assert!(!region.replace(&"k".to_string(), &profile("a", 1)).unwrap());
        assert!(!region.contains(&"k".to_string()).unwrap());

        region.set(&"k".to_string(), &profile("a", 1)).unwrap();
        assert!(region.replace(&"k".to_string(), &profile("a", 2)).unwrap());
        assert_eq!(region.get(&"k".to_string()).unwrap(), Some(profile("a", 2)));
    }

    #[test]
    fn test_listener_sees_region_wide_events() {
        let region = region();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);

        let handle = region
            .listen(move |event: &EntryEvent| {
                sink.lock().unwrap().push(event.kind);
            })
            .unwrap();

        region.set(&"a".to_string(), &profile("a", 1)).unwrap();
        region.set(&"b".to_string(), &profile("b", 2)).unwrap();
        region.remove(&"a".to_string()).unwrap();

        assert_eq!(
            *events.lock().unwrap(),
            vec![
                EntryEventKind::Updated,
                EntryEventKind::Updated,
                EntryEventKind::Removed
            ]
        );

        handle.cancel();
        region.set(&"c".to_string(), &profile("c", 3)).unwrap();
        assert_eq!(events.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_set_with_ttl_listening_skips_own_write() {
        let region = region();
        let (tx, rx) = channel();

        let handle = region
            .set_with_ttl_listening(&"k".to_string(), &profile("a", 1), 60, move |event| {
                tx.send((event.kind, event.key.clone())).unwrap();
            })
            .unwrap();
        assert_eq!(handle.region(), "profiles");

        // The combined call's own put happens before registration.
        assert!(rx.try_recv().is_err());

        region.remove(&"k".to_string()).unwrap();
        assert_eq!(
            rx.recv().unwrap(),
            (EntryEventKind::Removed, "\"k\"".to_string())
        );
        handle.cancel();
    }

    #[test]
    fn test_snapshots() {
        let region = region();
        region.set(&"a".to_string(), &profile("a", 1)).unwrap();
        region.set(&"b".to_string(), &profile("b", 2)).unwrap();

        let mut keys = region.keys().unwrap();
        keys.sort();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);

        let entries = region.entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries.get("b"), Some(&profile("b", 2)));
    }

    #[test]
    fn test_keys_snapshot_unaffected_by_later_remove() {
        let region = region();
        region.set(&"a".to_string(), &profile("a", 1)).unwrap();
        region.set(&"b".to_string(), &profile("b", 2)).unwrap();

        let keys = region.keys().unwrap();
        region.remove(&"a".to_string()).unwrap();

        assert!(keys.contains(&"a".to_string()));
        assert_eq!(keys.len(), 2);
        assert_eq!(region.keys().unwrap(), vec!["b".to_string()]);
    }

    #[test]
    fn test_get_async_missing_key_calls_back_once() {
        let region = region();
        let (tx, rx) = channel();

        region
            .get_async(&"ghost".to_string(), move |result| {
                tx.send(result).unwrap();
            })
            .unwrap();

        let result = rx.recv().unwrap();
        assert!(matches!(result, Ok(None)));
        // Sender dropped after the single invocation.
        assert!(rx.recv().is_err());
    }

    #[test]
    fn test_get_async_matches_sync_result() {
        let region = region();
        region.set(&"k".to_string(), &profile("a", 5)).unwrap();

        let (tx, rx) = channel();
        region
            .get_async(&"k".to_string(), move |result| {
                tx.send(result).unwrap();
            })
            .unwrap();

        let result = rx.recv().unwrap();
        assert_eq!(result.unwrap(), Some(profile("a", 5)));
        // Sender dropped after the single invocation.
        assert!(rx.recv().is_err());
    }

    #[test]
    fn test_get_async_delivers_transport_error() {
        let connection = Arc::new(CacheConnection::new(CacheConfig::default()));
        connection.connect().unwrap();
        let worker = Arc::new(TaskWorker::new("strata-cache-test"));
        let region: RegionHandle<String, Profile> = RegionHandle::new(
            "profiles",
            Arc::clone(&connection),
            JsonCodec::new(),
            worker,
        );

        connection.disconnect();

        let (tx, rx) = channel();
        region
            .get_async(&"k".to_string(), move |result| {
                tx.send(result).unwrap();
            })
            .unwrap();

        assert!(rx.recv().unwrap().unwrap_err().is_connection_error());
    }
}
