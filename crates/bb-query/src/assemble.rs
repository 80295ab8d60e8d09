//! Turns a composer's buckets into a query document.
//!
//! The rules, in order:
//!
//! 1. A root composer with a single AND query, no filters and no bool base query emits
//!    that clause directly as `query`.
//! 2. Otherwise every non-empty bucket is built, collapsed (one clause stays an object,
//!    more become an array) and merged into its scope under the mode's bool key.
//! 3. Raw options are written at the root.
//! 4. Nested composers return the contents of `query`; root composers add `sort`,
//!    `size` and `from`.

use std::mem;

use serde_json::Value;
use tracing::{debug, trace};

use crate::{
    bucket::{Family, Mode},
    clause::Clause,
    composer::{Composer, Context},
    document::{Document, Scope, merge_clauses, scope_mut},
    error::BuildError,
};

/// Builds the document for `composer`.
pub fn assemble(composer: &Composer) -> Result<Document, BuildError> {
    let context = composer.context();
    if context == Context::NestedFilter
        && let Some(clause) = first_query(composer)
    {
        return Err(BuildError::ContextViolation {
            kind: clause.kind().to_string(),
        });
    }

    let mut doc = composer.base().clone();
    let base_is_bool = base_query_is_bool(&doc)?;

    if let Some(clause) = lone_query(composer, base_is_bool) {
        debug!(kind = clause.kind(), "emitting single query without bool wrapper");
        doc.insert("query".into(), Value::Object(clause.build()?));
    } else {
        let simple_filter = is_simple_filter(composer);
        trace!(?context, simple_filter, "assembling bool clauses");
        for family in Family::ALL {
            let simple = simple_filter && family == Family::Filter;
            for (mode, clauses) in composer.buckets(family).iter() {
                if clauses.is_empty() {
                    continue;
                }
                merge_bucket(&mut doc, composer, family, mode, clauses, simple)?;
            }
        }
    }

    for (key, value) in composer.raw_options() {
        doc.insert(key.clone(), value.clone());
    }

    if context.is_nested() {
        return nested_result(doc);
    }

    let sort_fields = composer.sort_fields();
    if !sort_fields.is_empty() {
        doc.insert("sort".into(), sort_fields.to_value());
    }
    if let Some(size) = composer.size() {
        doc.insert("size".into(), size.into());
    }
    if let Some(offset) = composer.offset() {
        doc.insert("from".into(), offset.into());
    }

    Ok(doc)
}

/// The first query clause in bucket order, if any.
fn first_query(composer: &Composer) -> Option<&Clause> {
    composer
        .buckets(Family::Query)
        .iter()
        .find_map(|(_, clauses)| clauses.first())
}

/// Checks the base document's `query` key.
///
/// Returns whether it holds a bool clause. A `query` that holds anything else cannot be
/// extended and is a conflict.
fn base_query_is_bool(doc: &Document) -> Result<bool, BuildError> {
    match doc.get("query") {
        None => Ok(false),
        Some(Value::Object(query)) if query.contains_key("bool") => Ok(true),
        Some(_) => Err(BuildError::structural_conflict("query")),
    }
}

/// The clause to emit unwrapped, when the composer qualifies for the shortcut.
fn lone_query(composer: &Composer, base_is_bool: bool) -> Option<&Clause> {
    let queries = composer.buckets(Family::Query);
    if composer.context() != Context::Root
        || base_is_bool
        || composer.has_filters(None)
        || !queries.only_one_and()
    {
        return None;
    }
    queries.get(Mode::And).first()
}

/// Whether filters use the degenerate `filter`/`must_not` mapping.
fn is_simple_filter(composer: &Composer) -> bool {
    let filters = composer.buckets(Family::Filter);
    filters.only_one_and()
        || (!filters.any(Some(Mode::Or)) && !composer.has_queries(None) && !filters.any_nested())
}

/// Picks the scope a bucket is merged into.
fn scope_for(context: Context, family: Family, simple_filter: bool) -> Scope {
    if context == Context::NestedFilter {
        Scope::Query
    } else if simple_filter || family == Family::Query {
        Scope::QueryBool
    } else {
        Scope::FilterBool
    }
}

/// Builds every clause in a bucket; one stays an object, several become an array.
fn build_bucket(clauses: &[Clause]) -> Result<Value, BuildError> {
    let built = clauses
        .iter()
        .map(|clause| clause.build().map(Value::Object))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(match <[Value; 1]>::try_from(built) {
        Ok([one]) => one,
        Err(many) => Value::Array(many),
    })
}

/// Builds one bucket and merges it into `doc`.
fn merge_bucket(
    doc: &mut Document,
    composer: &Composer,
    family: Family,
    mode: Mode,
    clauses: &[Clause],
    simple_filter: bool,
) -> Result<(), BuildError> {
    let built = build_bucket(clauses)?;
    let scope_kind = scope_for(composer.context(), family, simple_filter);
    let key = mode.bool_key(simple_filter);
    trace!(%family, %mode, ?scope_kind, key, count = clauses.len(), "merging bucket");

    let scope = scope_mut(doc, scope_kind)?;
    merge_clauses(scope, key, built);

    // Thresholds apply to `should` arrays only.
    if key == "should"
        && scope.get("should").is_some_and(Value::is_array)
        && let Some(threshold) = composer.minimum_should_match(family)
    {
        scope.insert("minimum_should_match".into(), threshold.into());
    }
    Ok(())
}

/// Reduces a nested composer's document to the contents of its `query` key.
fn nested_result(mut doc: Document) -> Result<Document, BuildError> {
    match doc.get_mut("query") {
        Some(Value::Object(query)) => Ok(mem::take(query)),
        Some(_) => Err(BuildError::structural_conflict("query")),
        None => Ok(doc),
    }
}
