//! Sort fields attached to the root document.

use std::{fmt, str};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    document::{Document, single},
    error::BuildError,
};

/// Sort order for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl SortDirection {
    /// The engine's spelling of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl str::FromStr for SortDirection {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(BuildError::invalid_argument(format!(
                "direction must be 'asc' or 'desc', got '{s}'"
            ))),
        }
    }
}

/// One entry of the `sort` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortField {
    /// Field name.
    pub field: String,
    /// Sort order.
    pub direction: SortDirection,
}

impl SortField {
    /// Renders as `{field: direction}`.
    pub fn to_document(&self) -> Document {
        single(
            self.field.clone(),
            Value::String(self.direction.as_str().to_string()),
        )
    }
}

/// Ordered sort fields, unique by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortFields(Vec<SortField>);

impl SortFields {
    /// Sets the direction for `field`.
    ///
    /// A field that is already present keeps its position and takes the new direction.
    pub fn set(&mut self, field: impl Into<String>, direction: SortDirection) {
        let field = field.into();
        match self.0.iter_mut().find(|sort| sort.field == field) {
            Some(existing) => existing.direction = direction,
            None => self.0.push(SortField { field, direction }),
        }
    }

    /// The fields in order.
    pub fn as_slice(&self) -> &[SortField] {
        &self.0
    }

    /// True when no sort field is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Removes every sort field.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Renders the `sort` array.
    pub fn to_value(&self) -> Value {
        Value::Array(
            self.0
                .iter()
                .map(|sort| Value::Object(sort.to_document()))
                .collect(),
        )
    }
}
