//! Error types for query spec loading.

use std::io;
use std::path::PathBuf;

use bb_query::BuildError;
use thiserror::Error;
use toml::de;

/// Errors that can occur when loading a spec or turning it into a document.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a spec file.
    #[error("failed to read spec file {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to parse a TOML spec.
    #[error("failed to parse spec file {path}: {source}")]
    ParseToml {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: de::Error,
    },

    /// Failed to parse a JSON spec.
    #[error("failed to parse spec file {path}: {source}")]
    ParseJson {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// Underlying JSON parse error.
        source: serde_json::Error,
    },

    /// A clause declares both a structured `body` and a `field`/`value`.
    #[error("clause '{kind}' declares both `body` and `field`/`value`")]
    ConflictingPayload {
        /// Clause type.
        kind: String,
    },

    /// A clause declares a `value` without the `field` that keys it.
    #[error("clause '{kind}' declares `value` without `field`")]
    ValueWithoutField {
        /// Clause type.
        kind: String,
    },

    /// The composer rejected the spec.
    #[error(transparent)]
    Build(#[from] BuildError),
}
