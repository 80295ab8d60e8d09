//! Fluent assembly of search-engine query documents.
//!
//! A [`Composer`] collects clauses in six buckets (filter or query, crossed with AND, OR
//! or NOT) and assembles them into the nested bool structure a query DSL expects:
//!
//! - **Single query**: one AND query and nothing else is emitted without a bool wrapper
//! - **Simple filters**: a lone or pure-AND filter set lands on the bare `filter` key
//! - **Collapsing**: one clause stays an object, several become an array
//! - **Nesting**: a clause can carry a child composer whose bool body is merged into it
//! - **Root options**: sort, `size`, `from` and raw keys are applied to the top document
//!
//! # Example
//!
//! ```
//! use bb_query::Composer;
//! use serde_json::json;
//!
//! let doc = Composer::new()
//!     .query("match_all")
//!     .filter(("term", "user", "kimchy"))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(
//!     serde_json::Value::Object(doc),
//!     json!({"query": {"bool": {
//!         "filter": {"term": {"user": "kimchy"}},
//!         "must": {"match_all": {}}
//!     }}})
//! );
//! ```

#![warn(missing_docs)]

mod assemble;
mod bucket;
mod clause;
mod composer;
mod document;
mod error;
mod sort;

pub use bucket::{Buckets, Family, Mode};
pub use clause::{Clause, Payload};
pub use composer::{Composer, Context};
pub use document::{BOOL_KEYS, Document};
pub use error::BuildError;
pub use sort::{SortDirection, SortField, SortFields};
