//! Error types for the measures library
//!
//! Library code returns [`Result`]; the binary layer wraps these in
//! `anyhow` with context.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the measures library
#[derive(Debug, Error)]
pub enum MeasuresError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize config")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("failed to parse measures from {origin}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    #[error("could not determine the configuration directory")]
    NoConfigDir,

    #[error(
        "organization uuid ({component}) of component does not match the one ({organization}) of the organization"
    )]
    OrganizationMismatch {
        component: String,
        organization: String,
    },

    #[error("component '{0}' not found")]
    ComponentNotFound(String),

    #[error("key scope '{0}' is already bound")]
    ScopeAlreadyBound(String),
}

/// Library result alias
pub type Result<T> = std::result::Result<T, MeasuresError>;
