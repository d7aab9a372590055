//! Strata Store Connection
//!
//! Connection handle to the document store. The store itself is a black-box
//! service reached over the network; this module holds the connection state
//! and the store-native operation surface the facade translates calls into.
//! Collections hold codec-encoded documents in insertion order, which is the
//! stable order "first match" and tie-breaks follow.
//!
//! @version 0.1.0
//! @author Strata Development Team

use crate::aggregate;
use crate::config::StoreConfig;
use parking_lot::RwLock;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use strata_common::{Result, StrataError};

type CollectionData = Vec<String>;
type DatabaseData = HashMap<String, CollectionData>;

// =============================================================================
// Store Connection
// =============================================================================

/// A connection to the document store.
///
/// Thread-safe to the extent the underlying store is: the handle is shared
/// read/write across all facade calls without additional locking beyond what
/// the store provides.
pub struct StoreConnection {
    config: StoreConfig,
    connected: AtomicBool,
    databases: RwLock<HashMap<String, DatabaseData>>,
}

impl StoreConnection {
    /// Create a new, unconnected handle.
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            connected: AtomicBool::new(false),
            databases: RwLock::new(HashMap::new()),
        }
    }

    /// Establish the connection.
    pub fn connect(&self) -> Result<()> {
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Release the connection; all subsequent operations fail with
    /// `NotConnected`.
    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    /// Check if connected.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Get the configured default database name.
    pub fn database(&self) -> &str {
        &self.config.database
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(StrataError::NotConnected)
        }
    }

    // -------------------------------------------------------------------------
    // Document Operations
    // -------------------------------------------------------------------------

    /// Insert an encoded document. No uniqueness is enforced.
    pub(crate) fn insert(&self, db: &str, coll: &str, encoded: String) -> Result<()> {
        self.ensure_connected()?;

        let mut databases = self.databases.write();
        databases
            .entry(db.to_string())
            .or_default()
            .entry(coll.to_string())
            .or_default()
            .push(encoded);
        Ok(())
    }

    /// Delete every document whose `field` equals `value`. Returns whether
    /// the store acknowledged the operation; zero matches still acknowledge.
    pub(crate) fn delete_matching(
        &self,
        db: &str,
        coll: &str,
        field: &str,
        value: &JsonValue,
    ) -> Result<bool> {
        self.ensure_connected()?;

        let mut databases = self.databases.write();
        if let Some(docs) = databases.get_mut(db).and_then(|d| d.get_mut(coll)) {
            docs.retain(|doc| aggregate::field_of(doc, field).as_ref() != Some(value));
        }
        Ok(true)
    }

    /// Find the first document whose `field` equals `value`.
    pub(crate) fn find_first(
        &self,
        db: &str,
        coll: &str,
        field: &str,
        value: &JsonValue,
    ) -> Result<Option<String>> {
        self.ensure_connected()?;

        let databases = self.databases.read();
        let found = databases
            .get(db)
            .and_then(|d| d.get(coll))
            .and_then(|docs| {
                docs.iter()
                    .find(|doc| aggregate::field_of(doc, field).as_ref() == Some(value))
            })
            .cloned();
        Ok(found)
    }

    /// Materialize every document in the collection.
    pub(crate) fn find_all(&self, db: &str, coll: &str) -> Result<Vec<String>> {
        self.ensure_connected()?;

        let databases = self.databases.read();
        Ok(databases
            .get(db)
            .and_then(|d| d.get(coll))
            .cloned()
            .unwrap_or_default())
    }

    /// Replace the first matching document in full. No-op when nothing
    /// matches; no document is created.
    pub(crate) fn replace_first(
        &self,
        db: &str,
        coll: &str,
        field: &str,
        value: &JsonValue,
        encoded: String,
    ) -> Result<()> {
        self.ensure_connected()?;

        let mut databases = self.databases.write();
        if let Some(docs) = databases.get_mut(db).and_then(|d| d.get_mut(coll)) {
            if let Some(doc) = docs
                .iter_mut()
                .find(|doc| aggregate::field_of(doc, field).as_ref() == Some(value))
            {
                *doc = encoded;
            }
        }
        Ok(())
    }

    /// Set a single field on the first matching document, leaving the other
    /// fields untouched. No-op when nothing matches.
    pub(crate) fn set_field_first(
        &self,
        db: &str,
        coll: &str,
        field: &str,
        value: &JsonValue,
        target_field: &str,
        target_value: JsonValue,
    ) -> Result<()> {
        self.ensure_connected()?;

        let mut databases = self.databases.write();
        if let Some(docs) = databases.get_mut(db).and_then(|d| d.get_mut(coll)) {
            if let Some(doc) = docs
                .iter_mut()
                .find(|doc| aggregate::field_of(doc, field).as_ref() == Some(value))
            {
                if let Ok(JsonValue::Object(mut obj)) = serde_json::from_str(doc) {
                    obj.insert(target_field.to_string(), target_value);
                    *doc = JsonValue::Object(obj).to_string();
                }
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Aggregation Pipelines
    // -------------------------------------------------------------------------

    /// Run the group/sum pipeline over the collection.
    pub(crate) fn sum(&self, db: &str, coll: &str, field: &str) -> Result<Option<i64>> {
        let docs = self.find_all(db, coll)?;
        Ok(aggregate::sum_field(&docs, field))
    }

    /// Run the sort-descending/rank-projection pipeline.
    pub(crate) fn rank(
        &self,
        db: &str,
        coll: &str,
        order_field: &str,
        id_field: &str,
        identifier: &JsonValue,
    ) -> Result<Option<u64>> {
        let docs = self.find_all(db, coll)?;
        Ok(aggregate::rank_of(&docs, order_field, id_field, identifier))
    }

    /// Run the sort-descending/limit pipeline.
    pub(crate) fn top(
        &self,
        db: &str,
        coll: &str,
        field: &str,
        limit: usize,
    ) -> Result<Vec<String>> {
        let docs = self.find_all(db, coll)?;
        Ok(aggregate::top_n(&docs, field, limit))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn connected() -> StoreConnection {
        let conn = StoreConnection::new(StoreConfig::default());
        conn.connect().unwrap();
        conn
    }

    fn doc(name: &str, score: i64) -> String {
        serde_json::json!({ "name": name, "score": score }).to_string()
    }

    #[test]
    fn test_insert_and_find() {
        let conn = connected();
        conn.insert("db", "players", doc("alice", 10)).unwrap();

        let found = conn
            .find_first("db", "players", "name", &serde_json::json!("alice"))
            .unwrap();
        assert!(found.is_some());

        let missing = conn
            .find_first("db", "players", "name", &serde_json::json!("bob"))
            .unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_delete_acknowledged_without_matches() {
        let conn = connected();
        let acknowledged = conn
            .delete_matching("db", "players", "name", &serde_json::json!("ghost"))
            .unwrap();
        assert!(acknowledged);
    }

    #[test]
    fn test_delete_removes_all_matches() {
        let conn = connected();
        conn.insert("db", "players", doc("alice", 1)).unwrap();
        conn.insert("db", "players", doc("alice", 2)).unwrap();
        conn.insert("db", "players", doc("bob", 3)).unwrap();

        conn.delete_matching("db", "players", "name", &serde_json::json!("alice"))
            .unwrap();

        let all = conn.find_all("db", "players").unwrap();
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn test_replace_first_no_match_is_noop() {
        let conn = connected();
        conn.replace_first(
            "db",
            "players",
            "name",
            &serde_json::json!("ghost"),
            doc("ghost", 9),
        )
        .unwrap();

        assert!(conn.find_all("db", "players").unwrap().is_empty());
    }

    #[test]
    fn test_set_field_first() {
        let conn = connected();
        conn.insert("db", "players", doc("alice", 10)).unwrap();

        conn.set_field_first(
            "db",
            "players",
            "name",
            &serde_json::json!("alice"),
            "score",
            serde_json::json!(99),
        )
        .unwrap();

        let found = conn
            .find_first("db", "players", "name", &serde_json::json!("alice"))
            .unwrap()
            .unwrap();
        assert!(found.contains("99"));
    }

    #[test]
    fn test_not_connected() {
        let conn = StoreConnection::new(StoreConfig::default());
        let result = conn.insert("db", "players", doc("alice", 1));
        assert!(matches!(result, Err(StrataError::NotConnected)));

        let conn = connected();
        conn.insert("db", "players", doc("alice", 1)).unwrap();
        conn.disconnect();
        let result = conn.find_all("db", "players");
        assert!(matches!(result, Err(StrataError::NotConnected)));
    }
}
