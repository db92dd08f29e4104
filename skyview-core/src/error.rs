//! Error types for the catalog, configuration and rendering layers.
//!
//! Money parsing, asset and mail errors live next to the code that
//! raises them.

use std::io;

use thiserror::Error;

/// Failures raised by the catalog store.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("billboard not found: {0}")]
    BillboardNotFound(i64),

    #[error("booking not found: {0}")]
    BookingNotFound(i64),

    /// A record breaks one of the model invariants.
    #[error("invalid {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl CatalogError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        CatalogError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Failures loading `Settings`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

/// Failures assembling a PDF. Missing or broken images never end up
/// here; they are replaced by placeholders.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to assemble PDF: {0}")]
    Pdf(#[from] io::Error),
}
