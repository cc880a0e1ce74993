//! TOML-based configuration for tabsync.
//!
//! The personal access token secret is never stored in the file: the
//! `access_token_secret_env` field names an environment variable that is
//! resolved at runtime via [`AppConfig::resolve_env_vars`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::ConfigError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level application configuration loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Tableau server and credential settings.
    pub tableau: TableauConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// Tableau
// ---------------------------------------------------------------------------

/// Tableau server connection and personal-access-token settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct TableauConfig {
    /// Base URL of Tableau Server or Tableau Cloud (e.g. `https://10ax.online.tableau.com`).
    pub server_path: String,

    /// REST API version (e.g. `3.19`).
    pub api_version: String,

    /// Site content URL. Empty selects the default site.
    #[serde(default)]
    pub content_url: String,

    /// Name of the personal access token.
    pub access_token_name: String,

    /// Environment variable holding the personal access token secret.
    pub access_token_secret_env: String,

    /// Resolved secret (populated by `resolve_env_vars`).
    #[serde(skip)]
    pub access_token_secret: Option<String>,
}

impl std::fmt::Debug for TableauConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableauConfig")
            .field("server_path", &self.server_path)
            .field("api_version", &self.api_version)
            .field("content_url", &self.content_url)
            .field("access_token_name", &self.access_token_name)
            .field("access_token_secret_env", &self.access_token_secret_env)
            .field(
                "access_token_secret",
                &self.access_token_secret.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl TableauConfig {
    /// REST API root with the version folded in: `{server_path}/api/{api_version}`.
    pub fn api_base_url(&self) -> String {
        format!(
            "{}/api/{}",
            self.server_path.trim_end_matches('/'),
            self.api_version.trim_matches('/')
        )
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum tracing level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading & resolving
// ---------------------------------------------------------------------------

impl AppConfig {
    /// Load an [`AppConfig`] from a TOML file at the given path.
    ///
    /// This does **not** resolve environment variables -- call
    /// [`resolve_env_vars`](Self::resolve_env_vars) afterwards.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading configuration");

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        debug!("configuration parsed successfully");
        Ok(config)
    }

    /// Resolve the `*_env` fields from environment variables.
    ///
    /// A missing variable only logs a warning here; [`validate`](Self::validate)
    /// is what rejects an absent secret.
    pub fn resolve_env_vars(&mut self) -> Result<(), ConfigError> {
        info!("resolving environment variable references in config");

        self.tableau.access_token_secret = resolve_optional_env(
            &self.tableau.access_token_secret_env,
            "tableau.access_token_secret_env",
        );

        debug!("environment variable resolution complete");
        Ok(())
    }

    /// Validate that all required fields are present and sane.
    ///
    /// `content_url` is not checked: an empty value selects the default site.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let secret_missing = self
            .tableau
            .access_token_secret
            .as_deref()
            .map_or(true, str::is_empty);
        if secret_missing {
            return Err(ConfigError::InvalidValue {
                field: "tableau.access_token_secret_env".into(),
                detail: "access token secret is missing".into(),
            });
        }
        if self.tableau.access_token_name.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "tableau.access_token_name".into(),
                detail: "access token name is missing".into(),
            });
        }
        if self.tableau.server_path.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "tableau.server_path".into(),
                detail: "server path is missing".into(),
            });
        }
        if self.tableau.api_version.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "tableau.api_version".into(),
                detail: "api version is missing".into(),
            });
        }

        Ok(())
    }

    /// Convenience: load, resolve, and validate in one call.
    pub fn load_and_resolve<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut config = Self::load_from_file(path)?;
        config.resolve_env_vars()?;
        config.validate()?;
        Ok(config)
    }
}

/// Try to read an environment variable by name. Returns `Some(value)` on
/// success; logs a warning and returns `None` if the variable is unset.
fn resolve_optional_env(env_name: &str, field: &str) -> Option<String> {
    match std::env::var(env_name) {
        Ok(val) if !val.is_empty() => {
            debug!(field, env_name, "resolved env var");
            Some(val)
        }
        Ok(_) => {
            warn!(field, env_name, "env var is set but empty");
            None
        }
        Err(_) => {
            warn!(field, env_name, "env var not set");
            None
        }
    }
}
