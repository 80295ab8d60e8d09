//! The output document and the fixed set of places clauses are merged into it.
//!
//! Merging only ever happens at three scopes (`query`, `query.bool` and
//! `query.bool.filter.bool`) and at one key inside each scope. Nothing here is a
//! general deep merge.

use serde_json::{Map, Value};

use crate::error::BuildError;

/// A query document: a JSON object ready for serialization.
pub type Document = Map<String, Value>;

/// Keys that mark an object as the body of a bool clause.
pub const BOOL_KEYS: &[&str] = &["must", "must_not", "filter", "should"];

/// Where a bucket's clauses are written in the output document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The bare `query` object. Used by composers nested in a filter clause.
    Query,
    /// `query.bool`.
    QueryBool,
    /// `query.bool.filter.bool`, or a fresh `{bool: {}}` appended when `filter` is an array.
    FilterBool,
}

/// Builds a single-key document.
pub fn single(key: impl Into<String>, value: Value) -> Document {
    let mut doc = Document::new();
    doc.insert(key.into(), value);
    doc
}

/// Returns true if any top-level key of `doc` is a bool-clause key.
pub fn has_bool_keys(doc: &Document) -> bool {
    doc.keys().any(|key| BOOL_KEYS.contains(&key.as_str()))
}

/// Returns the object at `key`, creating an empty one if the key is missing.
fn object_at<'a>(
    parent: &'a mut Document,
    key: &str,
    path: &str,
) -> Result<&'a mut Document, BuildError> {
    match parent
        .entry(key)
        .or_insert_with(|| Value::Object(Document::new()))
    {
        Value::Object(map) => Ok(map),
        _ => Err(BuildError::structural_conflict(path)),
    }
}

/// Resolves `scope` inside `doc`, creating intermediate objects as needed.
pub fn scope_mut(doc: &mut Document, scope: Scope) -> Result<&mut Document, BuildError> {
    let query = object_at(doc, "query", "query")?;
    if scope == Scope::Query {
        return Ok(query);
    }

    let bool_clause = object_at(query, "bool", "query.bool")?;
    if scope == Scope::QueryBool {
        return Ok(bool_clause);
    }

    match bool_clause
        .entry("filter")
        .or_insert_with(|| Value::Object(Document::new()))
    {
        // Arrays of filters are appended to, never merged key-wise.
        Value::Array(items) => {
            items.push(Value::Object(single("bool", Value::Object(Document::new()))));
            match items.last_mut() {
                Some(Value::Object(slot)) => object_at(slot, "bool", "query.bool.filter[]"),
                _ => Err(BuildError::structural_conflict("query.bool.filter[]")),
            }
        }
        Value::Object(filter) => object_at(filter, "bool", "query.bool.filter.bool"),
        _ => Err(BuildError::structural_conflict("query.bool.filter")),
    }
}

/// Merges built clauses into `scope[key]`.
///
/// A missing key takes `clauses` as is. An existing key is coerced to an array and
/// extended, so repeated merges accumulate in order.
pub fn merge_clauses(scope: &mut Document, key: &str, clauses: Value) {
    let Some(existing) = scope.get_mut(key) else {
        scope.insert(key.to_string(), clauses);
        return;
    };

    if !existing.is_array() {
        let first = existing.take();
        *existing = Value::Array(vec![first]);
    }
    if let Value::Array(items) = existing {
        match clauses {
            Value::Array(more) => items.extend(more),
            other => items.push(other),
        }
    }
}
