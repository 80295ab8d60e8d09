//! Declarative query specs.
//!
//! A spec describes a [`Composer`] in a TOML or JSON file: clauses (with nested child
//! clauses), sort fields, pagination, `minimum_should_match` thresholds, raw root options
//! and a base document. Loading a spec parses it into a [`RawSpec`], converts that into a
//! [`Composer`], and optionally builds the final document:
//!
//! ```toml
//! size = 10
//!
//! [[clause]]
//! type = "match_all"
//!
//! [[clause]]
//! family = "filter"
//! type = "term"
//! field = "user"
//! value = "kimchy"
//! ```

#![warn(missing_docs)]

mod compose;
mod error;
mod parse;
mod templates;
#[cfg(test)]
mod test_support;

use std::path::Path;

use bb_query::{Composer, Document};
pub use compose::compose;
pub use error::ConfigError;
pub use parse::{
    RawClause, RawOption, RawSort, RawSpec, parse_spec_file, parse_spec_json, parse_spec_str,
};
pub use templates::spec_template;

/// Loads a spec file and converts it into a composer.
pub fn load_composer(path: &Path) -> Result<Composer, ConfigError> {
    let spec = parse_spec_file(path)?;
    compose(&spec)
}

/// Loads a spec file and builds its query document.
pub fn build_spec_file(path: &Path) -> Result<Document, ConfigError> {
    Ok(load_composer(path)?.build()?)
}
