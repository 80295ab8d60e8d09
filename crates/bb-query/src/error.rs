//! Error types for clause composition and document assembly.

use thiserror::Error;

/// Errors raised while configuring a [`Composer`](crate::Composer) or building its document.
///
/// All of these are caller errors: the same input always fails the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A setter received malformed input, such as an unknown sort direction.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// What was wrong with the input.
        message: String,
    },

    /// The base document cannot host bool clauses at the given path.
    #[error("cannot merge clauses into `{path}`: existing value is not a bool clause object")]
    StructuralConflict {
        /// Dotted path of the offending node, e.g. `query` or `query.bool.filter`.
        path: String,
    },

    /// Query clauses were added to a composer nested inside a filter clause.
    #[error("queries are not valid inside a filter context (found `{kind}`)")]
    ContextViolation {
        /// Clause type of the first offending query clause.
        kind: String,
    },
}

impl BuildError {
    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates a structural conflict error for the given path.
    pub fn structural_conflict(path: impl Into<String>) -> Self {
        Self::StructuralConflict { path: path.into() }
    }

    /// Returns a suggestion for resolving the error, when one applies.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::InvalidArgument { message } if message.contains("direction") => {
                Some("Sort direction must be 'asc' or 'desc'")
            }
            Self::StructuralConflict { path } if path == "query" => {
                Some("Start the base document from `{\"query\": {\"bool\": {}}}` or leave `query` unset")
            }
            Self::ContextViolation { .. } => {
                Some("Use filter clauses inside a filter, or nest the query under a query clause")
            }
            _ => None,
        }
    }
}
