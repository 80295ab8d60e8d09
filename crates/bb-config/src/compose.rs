//! Conversion of parsed specs into composers.

use bb_query::{Clause, Composer};
use tracing::trace;

use crate::{
    ConfigError,
    parse::{RawClause, RawSpec},
};

/// Default sort direction when a sort entry omits one.
const DEFAULT_DIRECTION: &str = "asc";

/// Builds a root composer from a parsed spec.
pub fn compose(spec: &RawSpec) -> Result<Composer, ConfigError> {
    apply_spec(Composer::new(), spec)
}

/// Applies every setting of `spec` to `composer`, recursing into nested clauses.
fn apply_spec(mut composer: Composer, spec: &RawSpec) -> Result<Composer, ConfigError> {
    if let Some(base) = &spec.base {
        composer = composer.with_base(base.clone());
    }
    if let Some(size) = spec.size {
        composer = composer.with_size(size);
    }
    if let Some(from) = spec.from {
        composer = composer.with_offset(from);
    }
    if let Some(value) = spec.query_minimum_should_match {
        composer = composer.with_query_minimum_should_match(value);
    }
    if let Some(value) = spec.filter_minimum_should_match {
        composer = composer.with_filter_minimum_should_match(value);
    }

    for sort in &spec.sort {
        let direction = sort.direction.as_deref().unwrap_or(DEFAULT_DIRECTION);
        composer = composer.sort_field(&sort.field, direction)?;
    }

    for option in &spec.raw {
        composer = composer.raw_option(&option.key, option.value.clone());
    }

    for raw in &spec.clause {
        let clause = to_clause(raw)?;
        trace!(family = %raw.family, mode = %raw.mode, kind = %raw.kind, "adding clause");
        composer = match &raw.nested {
            Some(nested) => composer.try_add_nested(raw.family, raw.mode, clause, |child| {
                apply_spec(child, nested)
            })?,
            None => composer.add(raw.family, raw.mode, clause),
        };
    }

    Ok(composer)
}

/// Converts a clause declaration, rejecting ambiguous payloads.
fn to_clause(raw: &RawClause) -> Result<Clause, ConfigError> {
    let clause = Clause::new(&raw.kind);
    let clause = match (&raw.body, &raw.field, &raw.value) {
        (Some(_), Some(_), _) | (Some(_), _, Some(_)) => {
            return Err(ConfigError::ConflictingPayload {
                kind: raw.kind.clone(),
            });
        }
        (None, None, Some(_)) => {
            return Err(ConfigError::ValueWithoutField {
                kind: raw.kind.clone(),
            });
        }
        (Some(body), None, None) => clause.body(body.clone()),
        (None, Some(field), Some(value)) => clause.field_value(field, value.clone()),
        (None, Some(field), None) => clause.field(field),
        (None, None, None) => clause,
    };
    Ok(clause.with_options(raw.options.clone()))
}
