//! Spec file parsing.
//!
//! Parses TOML or JSON into `RawSpec` structures that mirror the file schema and keep
//! every setting optional.

use std::{fs, path::Path};

use bb_query::{Document, Family, Mode};
use serde::Deserialize;
use serde_json::Value;
use serde_with::{OneOrMany, serde_as};
use tracing::debug;

use crate::ConfigError;

/// A query spec as parsed directly from a file.
///
/// Nested clauses carry their own `RawSpec`, so the schema is recursive.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawSpec {
    /// Base document the clauses are merged into.
    pub base: Option<Document>,
    /// Page size (`size`).
    pub size: Option<u64>,
    /// Page offset (`from`).
    pub from: Option<u64>,
    /// Threshold for query `should` arrays.
    pub query_minimum_should_match: Option<i64>,
    /// Threshold for filter `should` arrays.
    pub filter_minimum_should_match: Option<i64>,
    /// Sort fields, in order.
    #[serde_as(as = "OneOrMany<_>")]
    pub sort: Vec<RawSort>,
    /// Raw root options, in order.
    pub raw: Vec<RawOption>,
    /// Clauses, in order. Accepts a single table or an array of tables.
    #[serde_as(as = "OneOrMany<_>")]
    pub clause: Vec<RawClause>,
}

/// A sort entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawSort {
    /// Field to sort by.
    pub field: String,
    /// `asc` or `desc` (default: `asc`).
    pub direction: Option<String>,
}

/// A raw root option.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawOption {
    /// Root key.
    pub key: String,
    /// Value written verbatim.
    pub value: Value,
}

/// A clause declaration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawClause {
    /// `filter` or `query` (default: `query`).
    #[serde(default)]
    pub family: Family,
    /// `and`, `or` or `not` (default: `and`).
    #[serde(default)]
    pub mode: Mode,
    /// Clause type, e.g. `term`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Field name.
    pub field: Option<String>,
    /// Value keyed by `field`.
    pub value: Option<Value>,
    /// Structured body, used instead of `field`/`value`.
    pub body: Option<Document>,
    /// Extra keys merged over the body.
    #[serde(default)]
    pub options: Document,
    /// Child spec merged into this clause's body.
    pub nested: Option<Box<RawSpec>>,
}

/// Parses a spec file from disk.
///
/// Files ending in `.json` are parsed as JSON, everything else as TOML.
pub fn parse_spec_file(path: &Path) -> Result<RawSpec, ConfigError> {
    debug!(path = %path.display(), "loading query spec");
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    if path.extension().is_some_and(|ext| ext == "json") {
        parse_spec_json(&contents, path)
    } else {
        parse_spec_str(&contents, path)
    }
}

/// Parses a spec from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_spec_str(contents: &str, path: &Path) -> Result<RawSpec, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses a spec from a JSON string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_spec_json(contents: &str, path: &Path) -> Result<RawSpec, ConfigError> {
    serde_json::from_str(contents).map_err(|source| ConfigError::ParseJson {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn parse(toml: &str) -> RawSpec {
        parse_spec_str(toml, Path::new("test.toml")).unwrap()
    }

    #[test]
    fn test_parse_empty_spec() {
        let spec = parse("");
        assert_eq!(spec, RawSpec::default());
    }

    #[test]
    fn test_parse_root_settings() {
        let spec = parse(
            r#"
size = 10
from = 20
query_minimum_should_match = 2
filter_minimum_should_match = -1
"#,
        );
        assert_eq!(spec.size, Some(10));
        assert_eq!(spec.from, Some(20));
        assert_eq!(spec.query_minimum_should_match, Some(2));
        assert_eq!(spec.filter_minimum_should_match, Some(-1));
    }

    #[test]
    fn test_parse_clause_defaults() {
        let spec = parse(
            r#"
[[clause]]
type = "match_all"
"#,
        );
        let clause = &spec.clause[0];
        assert_eq!(clause.family, Family::Query);
        assert_eq!(clause.mode, Mode::And);
        assert_eq!(clause.kind, "match_all");
        assert!(clause.field.is_none());
        assert!(clause.options.is_empty());
        assert!(clause.nested.is_none());
    }

    #[test]
    fn test_parse_single_clause_table() {
        let spec = parse(
            r#"
[clause]
type = "exists"
field = "user"
"#,
        );
        assert_eq!(spec.clause.len(), 1);
        assert_eq!(spec.clause[0].field.as_deref(), Some("user"));
    }

    #[test]
    fn test_parse_clause_values() {
        let spec = parse(
            r#"
[[clause]]
family = "filter"
mode = "or"
type = "terms"
field = "tags"
value = ["Emerging", "Popular"]
options = { boost = 2 }

[[clause]]
type = "multi_match"
body = { query = "test", fuzziness = "AUTO" }
"#,
        );
        let terms = &spec.clause[0];
        assert_eq!(terms.family, Family::Filter);
        assert_eq!(terms.mode, Mode::Or);
        assert_eq!(terms.value, Some(json!(["Emerging", "Popular"])));
        assert_eq!(terms.options.get("boost"), Some(&json!(2)));

        let body = spec.clause[1].body.as_ref().unwrap();
        assert_eq!(body.get("fuzziness"), Some(&json!("AUTO")));
    }

    #[test]
    fn test_parse_nested_clauses() {
        let spec = parse(
            r#"
[[clause]]
type = "nested"
field = "path"
value = "obj1"

[clause.nested]
query_minimum_should_match = 1

[[clause.nested.clause]]
mode = "or"
type = "match"
field = "obj1.name"
value = "blue"

[[clause.nested.clause]]
mode = "or"
type = "match"
field = "obj1.name"
value = "green"
"#,
        );
        let nested = spec.clause[0].nested.as_ref().unwrap();
        assert_eq!(nested.query_minimum_should_match, Some(1));
        assert_eq!(nested.clause.len(), 2);
        assert_eq!(nested.clause[1].value, Some(json!("green")));
    }

    #[test]
    fn test_parse_sort_and_raw() {
        let spec = parse(
            r#"
[[sort]]
field = "id"
direction = "desc"

[[sort]]
field = "name"

[[raw]]
key = "track_total_hits"
value = true
"#,
        );
        assert_eq!(spec.sort.len(), 2);
        assert_eq!(spec.sort[0].direction.as_deref(), Some("desc"));
        assert!(spec.sort[1].direction.is_none());
        assert_eq!(spec.raw[0].key, "track_total_hits");
        assert_eq!(spec.raw[0].value, json!(true));
    }

    #[test]
    fn test_parse_base_document() {
        let spec = parse(
            r#"
[base.query.bool]
"#,
        );
        assert_eq!(
            Value::Object(spec.base.unwrap()),
            json!({"query": {"bool": {}}})
        );
    }

    #[test]
    fn test_parse_invalid_toml() {
        let result = parse_spec_str("this is not valid toml [[[", Path::new("test.toml"));
        assert!(matches!(result, Err(ConfigError::ParseToml { .. })));
    }

    #[test]
    fn test_parse_unknown_mode_error() {
        let toml = r#"
[[clause]]
mode = "xor"
type = "term"
"#;
        assert!(parse_spec_str(toml, Path::new("test.toml")).is_err());
    }

    #[test]
    fn test_parse_missing_type_error() {
        let toml = r#"
[[clause]]
field = "user"
"#;
        assert!(parse_spec_str(toml, Path::new("test.toml")).is_err());
    }

    #[test]
    fn test_parse_json() {
        let spec = parse_spec_json(
            r#"{"size": 5, "clause": [{"type": "term", "field": "user", "value": "kimchy"}]}"#,
            Path::new("spec.json"),
        )
        .unwrap();
        assert_eq!(spec.size, Some(5));
        assert_eq!(spec.clause[0].value, Some(json!("kimchy")));
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = parse_spec_json("{", Path::new("spec.json"));
        assert!(matches!(result, Err(ConfigError::ParseJson { .. })));
    }

    #[test]
    fn test_parse_spec_file_not_found() {
        let result = parse_spec_file(Path::new("/nonexistent/path/spec.toml"));
        assert!(matches!(result, Err(ConfigError::ReadFile { .. })));
    }
}
