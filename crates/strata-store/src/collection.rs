//! Strata Collection Facade
//!
//! The per-collection operation surface: CRUD, async CRUD, paired lookups,
//! and the aggregation engine (sum, rank, top-N). Codec conversion runs at
//! this boundary; the connection below it only sees transport text.
//!
//! Async variants queue work on one single-worker background queue owned by
//! this handle, so async calls on the same handle run in FIFO order. There
//! is no ordering guarantee relative to synchronous calls from other
//! threads, nor relative to async calls on a different handle.
//!
//! @version 0.1.0
//! @author Strata Development Team

use crate::connection::StoreConnection;
use std::sync::Arc;
use strata_common::{Codec, JsonCodec, Result, TaskWorker};
use strata_document::{Document, Pair, Value};

// =============================================================================
// Collection Handle
// =============================================================================

/// Facade over one named collection in the document store.
pub struct CollectionHandle<C: Codec = JsonCodec> {
    database: String,
    name: String,
    connection: Arc<StoreConnection>,
    codec: C,
    worker: TaskWorker,
}

impl<C: Codec + Clone + 'static> CollectionHandle<C> {
    pub(crate) fn new(
        database: impl Into<String>,
        name: impl Into<String>,
        connection: Arc<StoreConnection>,
        codec: C,
    ) -> Self {
        let name = name.into();
        let worker = TaskWorker::new(format!("strata-store-{}", name));
        Self {
            database: database.into(),
            name,
            connection,
            codec,
            worker,
        }
    }

    /// Get the collection name.
    pub fn name(&self) -> &str {
        &self.name
    }

    // -------------------------------------------------------------------------
    // CRUD
    // -------------------------------------------------------------------------

    /// Insert a document. No uniqueness is enforced beyond whatever the
    /// store does natively.
    pub fn create(&self, doc: &Document) -> Result<()> {
        let encoded = self.codec.encode(doc)?;
        self.connection.insert(&self.database, &self.name, encoded)
    }

    /// Insert a document on the background worker, fire-and-forget.
    ///
    /// Execution failures are logged, not delivered back; only queue
    /// submission can fail synchronously.
    pub fn create_async(&self, doc: Document) -> Result<()> {
        let connection = Arc::clone(&self.connection);
        let codec = self.codec.clone();
        let (database, name) = (self.database.clone(), self.name.clone());

        self.worker.submit(move || {
            let result = codec
                .encode(&doc)
                .and_then(|encoded| connection.insert(&database, &name, encoded));
            if let Err(err) = result {
                tracing::warn!(collection = %name, %err, "async create failed");
            }
        })
    }

    /// Delete every document whose `key` field equals `value`.
    ///
    /// Returns whether the store acknowledged the operation, not whether
    /// anything matched; zero matches is still acknowledged.
    pub fn delete(&self, key: &str, value: impl Into<Value>) -> Result<bool> {
        let value = value.into().to_json();
        self.connection
            .delete_matching(&self.database, &self.name, key, &value)
    }

    /// Delete on the background worker, fire-and-forget.
    pub fn delete_async(&self, key: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let connection = Arc::clone(&self.connection);
        let (database, name) = (self.database.clone(), self.name.clone());
        let key = key.into();
        let value = value.into().to_json();

        self.worker.submit(move || {
            if let Err(err) = connection.delete_matching(&database, &name, &key, &value) {
                tracing::warn!(collection = %name, %err, "async delete failed");
            }
        })
    }

    /// Get the first document whose `key` field equals `value`.
    ///
    /// Matching is exact equality; an absent result is `None`, never an
    /// error.
    pub fn get(&self, key: &str, value: impl Into<Value>) -> Result<Option<Document>> {
        let value = value.into().to_json();
        let encoded = self
            .connection
            .find_first(&self.database, &self.name, key, &value)?;

        match encoded {
            Some(encoded) => Ok(Some(self.codec.decode(&encoded)?)),
            None => Ok(None),
        }
    }

    /// Queued lookup: invokes `on_result` exactly once on the worker thread
    /// with the same result a synchronous `get` would produce, including
    /// transport and decode failures.
    pub fn get_async<F>(
        &self,
        key: impl Into<String>,
        value: impl Into<Value>,
        on_result: F,
    ) -> Result<()>
    where
        F: FnOnce(Result<Option<Document>>) + Send + 'static,
    {
        let connection = Arc::clone(&self.connection);
        let codec = self.codec.clone();
        let (database, name) = (self.database.clone(), self.name.clone());
        let key = key.into();
        let value = value.into().to_json();

        self.worker.submit(move || {
            let result = connection
                .find_first(&database, &name, &key, &value)
                .and_then(|encoded| match encoded {
                    Some(encoded) => codec.decode(&encoded).map(Some),
                    None => Ok(None),
                });
            on_result(result);
        })
    }

    /// Perform two independent lookups in one logical call.
    ///
    /// Either half may be absent without failing; only transport errors
    /// fail the call. There is no transactional guarantee between halves.
    pub fn get_pair(
        &self,
        first_key: &str,
        first_value: impl Into<Value>,
        second_key: &str,
        second_value: impl Into<Value>,
    ) -> Result<Pair<Option<Document>, Option<Document>>> {
        let first = self.get(first_key, first_value)?;
        let second = self.get(second_key, second_value)?;
        Ok(Pair::new(first, second))
    }

    /// Materialize every document currently in the collection.
    ///
    /// The result is a finite snapshot, not a live cursor; re-invoke to see
    /// later changes.
    pub fn list_all(&self) -> Result<Vec<Document>> {
        let encoded = self.connection.find_all(&self.database, &self.name)?;
        encoded
            .iter()
            .map(|doc| self.codec.decode(doc))
            .collect()
    }

    /// Replace the first document whose `key` field equals `value` in full.
    ///
    /// No-op when nothing matches; no document is created (no upsert).
    pub fn update(&self, key: &str, value: impl Into<Value>, doc: &Document) -> Result<()> {
        let encoded = self.codec.encode(doc)?;
        let value = value.into().to_json();
        self.connection
            .replace_first(&self.database, &self.name, key, &value, encoded)
    }

    /// Set a single field on the first matching document without touching
    /// the other fields. No-op when nothing matches.
    pub fn update_field(
        &self,
        key: &str,
        value: impl Into<Value>,
        field: &str,
        field_value: impl Into<Value>,
    ) -> Result<()> {
        let value = value.into().to_json();
        let field_value = field_value.into().to_json();
        self.connection.set_field_first(
            &self.database,
            &self.name,
            key,
            &value,
            field,
            field_value,
        )
    }

    // -------------------------------------------------------------------------
    // Aggregation Engine
    // -------------------------------------------------------------------------

    /// Sum the named field across every document, cast to i32.
    ///
    /// Returns `None` when the collection is empty or the field is absent
    /// from every document, so "no data" is distinguishable from a
    /// legitimate negative sum. The narrowing cast wraps when the sum
    /// exceeds i32 range; use [`sum_long`](Self::sum_long) for wide totals.
    pub fn sum_int(&self, field: &str) -> Result<Option<i32>> {
        let total = self.connection.sum(&self.database, &self.name, field)?;
        Ok(total.map(|t| t as i32))
    }

    /// Sum the named field across every document, cast to i64.
    pub fn sum_long(&self, field: &str) -> Result<Option<i64>> {
        self.connection.sum(&self.database, &self.name, field)
    }

    /// Compute the 1-based rank of the document whose `id_field` equals
    /// `identifier`, when all documents are sorted descending by
    /// `order_field`. The highest value ranks 1; `None` when absent.
    ///
    /// Every call is a full collection scan, O(n log n) in collection size;
    /// no incremental index is maintained.
    pub fn rank(
        &self,
        order_field: &str,
        id_field: &str,
        identifier: impl Into<Value>,
    ) -> Result<Option<u64>> {
        let identifier = identifier.into().to_json();
        self.connection
            .rank(&self.database, &self.name, order_field, id_field, &identifier)
    }

    /// The top `limit` documents sorted descending by `field`.
    ///
    /// Order among equal field values is unstable (whatever order the store
    /// preserves). Full scan per call, same cost profile as `rank`.
    pub fn top_n(&self, field: &str, limit: usize) -> Result<Vec<Document>> {
        let encoded = self
            .connection
            .top(&self.database, &self.name, field, limit)?;
        encoded
            .iter()
            .map(|doc| self.codec.decode(doc))
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================
