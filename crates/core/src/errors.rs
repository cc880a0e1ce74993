//! Error types for the tabsync core library.
//!
//! Each subsystem has its own error type derived with `thiserror`, and a
//! top-level [`CoreError`] enum unifies them all for callers that want a
//! single error type.

use thiserror::Error;

use crate::models::ResourceType;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Unified error type for the entire core library.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Tableau(#[from] TableauError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Tableau REST API errors
// ---------------------------------------------------------------------------

/// Errors from Tableau REST API interactions.
#[derive(Debug, Error)]
pub enum TableauError {
    /// The sign-in exchange was rejected or returned something unusable.
    #[error("Tableau sign-in failed: {0}")]
    AuthenticationFailed(String),

    /// HTTP-level transport error (network, TLS, etc.).
    #[error("Tableau HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The API returned a status code of 300 or above.
    #[error("Tableau request failed with status code {status}: {url}")]
    ApiError { status: u16, url: String },

    /// The response body was not the JSON we expected.
    #[error("Tableau response parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    /// A pagination field was not a usable integer.
    #[error("invalid pagination field '{field}': {value:?}")]
    InvalidPagination { field: &'static str, value: String },
}

// ---------------------------------------------------------------------------
// Sync errors
// ---------------------------------------------------------------------------

/// Errors from the resource syncers and the sync engine.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A Tableau call failed; `action` says what we were doing.
    #[error("failed to {action}: {source}")]
    Api {
        action: &'static str,
        #[source]
        source: TableauError,
    },

    /// A grant or revoke named a principal that cannot hold the entitlement.
    #[error("principal must be a {expected} resource, got {actual}")]
    TypeMismatch {
        expected: ResourceType,
        actual: ResourceType,
    },

    /// A resource is missing the profile field needed to address it remotely.
    #[error("error fetching {field} from profile of resource {resource}")]
    ProfileLookup { field: &'static str, resource: String },
}

impl SyncError {
    /// Wrap a Tableau error with a short description of the failed action.
    pub fn api(action: &'static str) -> impl FnOnce(TableauError) -> Self {
        move |source| Self::Api { action, source }
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// TOML parse error.
    #[error("configuration parse error: {0}")]
    ParseError(String),

    /// A config value is invalid.
    #[error("invalid configuration value for '{field}': {detail}")]
    InvalidValue { field: String, detail: String },

    /// Generic I/O error reading the config file.
    #[error("configuration I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
