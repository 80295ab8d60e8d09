//! The fluent composer that collects clauses and options.

use serde_json::Value;

use crate::{
    assemble,
    bucket::{Buckets, Family, Mode},
    clause::Clause,
    document::Document,
    error::BuildError,
    sort::{SortDirection, SortFields},
};

/// Where a composer sits in the clause tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Context {
    /// A top-level composer producing the full document.
    #[default]
    Root,
    /// The child of a filter clause. Query clauses are rejected at build time.
    NestedFilter,
    /// The child of a query clause.
    NestedQuery,
}

impl Context {
    /// The context of a composer nested in a clause of `family`.
    pub fn nested_in(family: Family) -> Self {
        match family {
            Family::Filter => Self::NestedFilter,
            Family::Query => Self::NestedQuery,
        }
    }

    /// True for both nested variants.
    pub fn is_nested(self) -> bool {
        self != Self::Root
    }
}

/// Collects filter and query clauses and assembles them into a query document.
///
/// Adders and setters take and return `self` so calls chain. [`build`](Self::build) only
/// reads the composer and can be called any number of times.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composer {
    /// Starting document, cloned on every build.
    base: Document,
    /// Position in the clause tree.
    context: Context,
    /// Filter clauses by mode.
    filters: Buckets,
    /// Query clauses by mode.
    queries: Buckets,
    /// Root-level keys applied verbatim, in insertion order.
    raw_options: Vec<(String, Value)>,
    /// Root-level sort.
    sort_fields: SortFields,
    /// Page size (`size`).
    size: Option<u64>,
    /// Page offset (`from`).
    offset: Option<u64>,
    /// `minimum_should_match` for query `should` arrays.
    query_minimum_should_match: Option<i64>,
    /// `minimum_should_match` for filter `should` arrays.
    filter_minimum_should_match: Option<i64>,
}

impl Composer {
    /// Creates an empty root composer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty composer for the given tree position.
    pub fn nested(context: Context) -> Self {
        Self {
            context,
            ..Self::default()
        }
    }

    /// Replaces the base document.
    ///
    /// The base is never mutated: each build starts from a copy. An existing `query`
    /// key must hold a bool clause, or building fails.
    pub fn with_base(mut self, base: Document) -> Self {
        self.base = base;
        self
    }

    /// Adds a clause to the (`family`, `mode`) bucket.
    pub fn add(mut self, family: Family, mode: Mode, clause: impl Into<Clause>) -> Self {
        let clause = clause.into();
        match family {
            Family::Filter => self.filters.push(mode, clause),
            Family::Query => self.queries.push(mode, clause),
        }
        self
    }

    /// Adds a clause whose body is extended by a nested composer.
    ///
    /// `nest` runs immediately on a fresh child composer whose context reflects
    /// `family`; the clause keeps the result.
    pub fn add_nested<F>(
        self,
        family: Family,
        mode: Mode,
        clause: impl Into<Clause>,
        nest: F,
    ) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        let mut clause = clause.into();
        clause.set_nested(nest(Self::nested(Context::nested_in(family))));
        self.add(family, mode, clause)
    }

    /// Like [`add_nested`](Self::add_nested), for callbacks that can fail.
    pub fn try_add_nested<F, E>(
        self,
        family: Family,
        mode: Mode,
        clause: impl Into<Clause>,
        nest: F,
    ) -> Result<Self, E>
    where
        F: FnOnce(Self) -> Result<Self, E>,
    {
        let mut clause = clause.into();
        clause.set_nested(nest(Self::nested(Context::nested_in(family)))?);
        Ok(self.add(family, mode, clause))
    }

    /// Adds an AND filter clause.
    pub fn filter(self, clause: impl Into<Clause>) -> Self {
        self.add(Family::Filter, Mode::And, clause)
    }

    /// Alias for [`filter`](Self::filter).
    pub fn and_filter(self, clause: impl Into<Clause>) -> Self {
        self.filter(clause)
    }

    /// Adds an OR filter clause.
    pub fn or_filter(self, clause: impl Into<Clause>) -> Self {
        self.add(Family::Filter, Mode::Or, clause)
    }

    /// Adds a NOT filter clause.
    pub fn not_filter(self, clause: impl Into<Clause>) -> Self {
        self.add(Family::Filter, Mode::Not, clause)
    }

    /// Adds an AND query clause.
    pub fn query(self, clause: impl Into<Clause>) -> Self {
        self.add(Family::Query, Mode::And, clause)
    }

    /// Alias for [`query`](Self::query).
    pub fn and_query(self, clause: impl Into<Clause>) -> Self {
        self.query(clause)
    }

    /// Adds an OR query clause.
    pub fn or_query(self, clause: impl Into<Clause>) -> Self {
        self.add(Family::Query, Mode::Or, clause)
    }

    /// Adds a NOT query clause.
    pub fn not_query(self, clause: impl Into<Clause>) -> Self {
        self.add(Family::Query, Mode::Not, clause)
    }

    /// Adds an AND filter clause with a nested composer.
    pub fn filter_with<F>(self, clause: impl Into<Clause>, nest: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        self.add_nested(Family::Filter, Mode::And, clause, nest)
    }

    /// Adds an OR filter clause with a nested composer.
    pub fn or_filter_with<F>(self, clause: impl Into<Clause>, nest: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        self.add_nested(Family::Filter, Mode::Or, clause, nest)
    }

    /// Adds a NOT filter clause with a nested composer.
    pub fn not_filter_with<F>(self, clause: impl Into<Clause>, nest: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        self.add_nested(Family::Filter, Mode::Not, clause, nest)
    }

    /// Adds an AND query clause with a nested composer.
    pub fn query_with<F>(self, clause: impl Into<Clause>, nest: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        self.add_nested(Family::Query, Mode::And, clause, nest)
    }

    /// Adds an OR query clause with a nested composer.
    pub fn or_query_with<F>(self, clause: impl Into<Clause>, nest: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        self.add_nested(Family::Query, Mode::Or, clause, nest)
    }

    /// Adds a NOT query clause with a nested composer.
    pub fn not_query_with<F>(self, clause: impl Into<Clause>, nest: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        self.add_nested(Family::Query, Mode::Not, clause, nest)
    }

    /// Sets a root-level key, applied after clause assembly.
    ///
    /// Later options with the same key win.
    pub fn raw_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.raw_options.push((key.into(), value.into()));
        self
    }

    /// Sorts by `field` in the direction named by `direction` (`asc` or `desc`).
    pub fn sort_field(self, field: impl Into<String>, direction: &str) -> Result<Self, BuildError> {
        let direction = direction.parse::<SortDirection>()?;
        Ok(self.sort_by(field, direction))
    }

    /// Sorts by `field`. Setting a field again updates its direction in place.
    pub fn sort_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_fields.set(field, direction);
        self
    }

    /// Sets the page size (`size`).
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Sets the page offset (`from`).
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sets `minimum_should_match` for query `should` arrays.
    pub fn with_query_minimum_should_match(mut self, value: i64) -> Self {
        self.query_minimum_should_match = Some(value);
        self
    }

    /// Sets `minimum_should_match` for filter `should` arrays.
    pub fn with_filter_minimum_should_match(mut self, value: i64) -> Self {
        self.filter_minimum_should_match = Some(value);
        self
    }

    /// The base document.
    pub fn base(&self) -> &Document {
        &self.base
    }

    /// The tree position.
    pub fn context(&self) -> Context {
        self.context
    }

    /// All clauses of one family.
    pub fn buckets(&self, family: Family) -> &Buckets {
        match family {
            Family::Filter => &self.filters,
            Family::Query => &self.queries,
        }
    }

    /// The clauses of one (`family`, `mode`) bucket.
    pub fn clauses(&self, family: Family, mode: Mode) -> &[Clause] {
        self.buckets(family).get(mode)
    }

    /// Raw root options in insertion order.
    pub fn raw_options(&self) -> &[(String, Value)] {
        &self.raw_options
    }

    /// Sort fields in order.
    pub fn sort_fields(&self) -> &SortFields {
        &self.sort_fields
    }

    /// The page size.
    pub fn size(&self) -> Option<u64> {
        self.size
    }

    /// The page offset.
    pub fn offset(&self) -> Option<u64> {
        self.offset
    }

    /// The `minimum_should_match` threshold configured for `family`.
    pub fn minimum_should_match(&self, family: Family) -> Option<i64> {
        match family {
            Family::Filter => self.filter_minimum_should_match,
            Family::Query => self.query_minimum_should_match,
        }
    }

    /// True if any clause of `family` exists, optionally restricted to `mode`.
    pub fn has_clauses(&self, family: Family, mode: Option<Mode>) -> bool {
        self.buckets(family).any(mode)
    }

    /// True if any filter clause exists, optionally restricted to `mode`.
    pub fn has_filters(&self, mode: Option<Mode>) -> bool {
        self.has_clauses(Family::Filter, mode)
    }

    /// True if any query clause exists, optionally restricted to `mode`.
    pub fn has_queries(&self, mode: Option<Mode>) -> bool {
        self.has_clauses(Family::Query, mode)
    }

    /// Clears clauses, raw options, sort fields, pagination and thresholds.
    ///
    /// The base document and context are kept.
    pub fn reset(&mut self) {
        self.reset_queries();
        self.reset_filters();
        self.reset_raw_options();
        self.reset_sort_fields();
        self.size = None;
        self.offset = None;
        self.query_minimum_should_match = None;
        self.filter_minimum_should_match = None;
    }

    /// Removes every query clause.
    pub fn reset_queries(&mut self) {
        self.queries.clear();
    }

    /// Removes every filter clause.
    pub fn reset_filters(&mut self) {
        self.filters.clear();
    }

    /// Removes every raw option.
    pub fn reset_raw_options(&mut self) {
        self.raw_options.clear();
    }

    /// Removes every sort field.
    pub fn reset_sort_fields(&mut self) {
        self.sort_fields.clear();
    }

    /// Assembles the query document.
    ///
    /// Nested composers return only the contents of their `query` key and skip sort,
    /// `size` and `from`.
    pub fn build(&self) -> Result<Document, BuildError> {
        assemble::assemble(self)
    }
}
