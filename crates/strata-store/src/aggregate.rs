//! Strata Store Aggregation Pipelines
//!
//! Server-side pipeline evaluation for the simulated remote store. Exactly
//! four pipeline shapes exist at this boundary: sort-descending, group/sum,
//! limit, and a computed rank projection. Each evaluation scans the whole
//! collection; there is no incremental index, so sorting pipelines cost
//! O(n log n) per invocation.
//!
//! @version 0.1.0
//! @author Strata Development Team

use serde_json::Value as JsonValue;
use std::cmp::Ordering;

// =============================================================================
// Field Access
// =============================================================================

/// Parse an encoded document and extract a top-level field.
///
/// Documents that fail to parse are treated as having no fields; that is the
/// store's native behavior, not a facade decode error.
pub(crate) fn field_of(encoded: &str, field: &str) -> Option<JsonValue> {
    let parsed: JsonValue = serde_json::from_str(encoded).ok()?;
    parsed.get(field).cloned()
}

/// Compare two optional field values for sorting; absent fields order last
/// in a descending sort.
fn compare_fields(a: Option<&JsonValue>, b: Option<&JsonValue>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => compare_values(a, b),
    }
}

fn compare_values(a: &JsonValue, b: &JsonValue) -> Ordering {
    match (a, b) {
        (JsonValue::Number(a), JsonValue::Number(b)) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (JsonValue::String(a), JsonValue::String(b)) => a.cmp(b),
        (JsonValue::Bool(a), JsonValue::Bool(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}

// =============================================================================
// Pipeline: group / sum
// =============================================================================

/// Sum the named field across all documents, cast to i64.
///
/// Non-numeric values contribute zero and the accumulator wraps on i64
/// overflow (the store's cast semantics). Returns `None` when the collection
/// is empty or the field is absent from every document, so an aggregate of
/// zero is distinguishable from "no data".
pub(crate) fn sum_field(docs: &[String], field: &str) -> Option<i64> {
    if docs.is_empty() {
        return None;
    }

    let mut seen = false;
    let mut total: i64 = 0;

    for doc in docs {
        if let Some(value) = field_of(doc, field) {
            seen = true;
            total = total.wrapping_add(cast_to_i64(&value));
        }
    }

    seen.then_some(total)
}

fn cast_to_i64(value: &JsonValue) -> i64 {
    match value {
        JsonValue::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)).unwrap_or(0),
        _ => 0,
    }
}

// =============================================================================
// Pipeline: sort-descending / limit
// =============================================================================

/// Sort documents descending by the named field and truncate to `limit`.
///
/// The sort is stable: documents with equal field values keep the store's
/// insertion order, but that tie order is not part of the contract.
pub(crate) fn top_n(docs: &[String], field: &str, limit: usize) -> Vec<String> {
    let mut sorted = sort_descending(docs, field);
    sorted.truncate(limit);
    sorted
}

fn sort_descending(docs: &[String], field: &str) -> Vec<String> {
    let mut keyed: Vec<(Option<JsonValue>, &String)> = docs
        .iter()
        .map(|doc| (field_of(doc, field), doc))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| compare_fields(b.as_ref(), a.as_ref()));
    keyed.into_iter().map(|(_, doc)| doc.clone()).collect()
}

// =============================================================================
// Pipeline: sort-descending / computed rank projection
// =============================================================================

/// Compute the 1-based rank of the document whose `id_field` equals
/// `identifier` when all documents are sorted descending by `order_field`.
///
/// Returns `None` when no document carries the identifier.
pub(crate) fn rank_of(
    docs: &[String],
    order_field: &str,
    id_field: &str,
    identifier: &JsonValue,
) -> Option<u64> {
    let sorted = sort_descending(docs, order_field);

    sorted
        .iter()
        .position(|doc| field_of(doc, id_field).as_ref() == Some(identifier))
        .map(|pos| pos as u64 + 1)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(field: &str, value: i64, id: &str) -> String {
        serde_json::json!({ field: value, "uniqueId": id }).to_string()
    }

    #[test]
    fn test_sum_field() {
        let docs = vec![encoded("kills", 3, "a"), encoded("kills", 5, "b")];
        assert_eq!(sum_field(&docs, "kills"), Some(8));
    }

    #[test]
    fn test_sum_empty_collection() {
        assert_eq!(sum_field(&[], "kills"), None);
    }

    #[test]
    fn test_sum_field_absent_everywhere() {
        let docs = vec![encoded("kills", 3, "a")];
        assert_eq!(sum_field(&docs, "deaths"), None);
    }

    #[test]
    fn test_sum_wraps_on_overflow() {
        let docs = vec![encoded("kills", i64::MAX, "a"), encoded("kills", 1, "b")];
        assert_eq!(sum_field(&docs, "kills"), Some(i64::MIN));
    }

    #[test]
    fn test_sum_non_numeric_contributes_zero() {
        let docs = vec![
            serde_json::json!({ "kills": "many" }).to_string(),
            encoded("kills", 4, "b"),
        ];
        assert_eq!(sum_field(&docs, "kills"), Some(4));
    }

    #[test]
    fn test_top_n_sorted_descending() {
        let docs = vec![
            encoded("score", 10, "a"),
            encoded("score", 30, "b"),
            encoded("score", 20, "c"),
        ];

        let top = top_n(&docs, "score", 2);
        assert_eq!(top.len(), 2);
        assert_eq!(field_of(&top[0], "score"), Some(serde_json::json!(30)));
        assert_eq!(field_of(&top[1], "score"), Some(serde_json::json!(20)));
    }

    #[test]
    fn test_top_n_limit_exceeds_size() {
        let docs = vec![encoded("score", 1, "a")];
        assert_eq!(top_n(&docs, "score", 10).len(), 1);
    }

    #[test]
    fn test_rank_descending() {
        let docs = vec![
            encoded("score", 10, "low"),
            encoded("score", 30, "high"),
            encoded("score", 20, "mid"),
        ];

        let id = serde_json::json!("high");
        assert_eq!(rank_of(&docs, "score", "uniqueId", &id), Some(1));

        let id = serde_json::json!("low");
        assert_eq!(rank_of(&docs, "score", "uniqueId", &id), Some(3));
    }

    #[test]
    fn test_rank_missing_identifier() {
        let docs = vec![encoded("score", 10, "a")];
        let id = serde_json::json!("ghost");
        assert_eq!(rank_of(&docs, "score", "uniqueId", &id), None);
    }

    #[test]
    fn test_missing_field_sorts_last() {
        let docs = vec![
            serde_json::json!({ "uniqueId": "bare" }).to_string(),
            encoded("score", 5, "scored"),
        ];

        let sorted = top_n(&docs, "score", 2);
        assert_eq!(
            field_of(&sorted[0], "uniqueId"),
            Some(serde_json::json!("scored"))
        );
    }
}
