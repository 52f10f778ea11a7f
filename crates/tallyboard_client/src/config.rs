//! Client configuration loaded from TOML and the environment.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tallyboard_core::Endpoints;
use tallyboard_error::{ConfigError, TallyboardResult};
use tracing::{debug, info, instrument};

/// Environment variable overriding [`ClientConfig::base_url`].
pub const CONFIG_ENV_BASE_URL: &str = "TALLYBOARD_BASE_URL";

/// Where the remote API lives and how to talk to it.
///
/// Endpoint paths are joined onto `base_url`; a path that is already an
/// absolute URL is used as-is.
///
/// ```toml
/// base_url = "https://api.example"
/// builds_path = "/api/builds"
/// request_timeout_secs = 15
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into), default)]
#[serde(default)]
pub struct ClientConfig {
    /// Scheme and host of the API
    base_url: String,
    /// Accounts collection
    accounts_path: String,
    /// Artifacts collection
    artifacts_path: String,
    /// Leaderboards collection
    leaderboards_path: String,
    /// Builds collection
    builds_path: String,
    /// Total-row-count endpoint
    collection_size_path: String,
    /// Per-request timeout; the transport default applies when absent
    #[builder(setter(into, strip_option))]
    request_timeout_secs: Option<u64>,
    /// `User-Agent` header value
    user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5033".to_string(),
            accounts_path: "/api/accounts".to_string(),
            artifacts_path: "/api/artifacts".to_string(),
            leaderboards_path: "/api/leaderboards".to_string(),
            builds_path: "/api/builds".to_string(),
            collection_size_path: "/api/getCollectionSize".to_string(),
            request_timeout_secs: None,
            user_agent: format!("tallyboard/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Returns a builder starting from the defaults.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> TallyboardResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::at_path(path, format!("Failed to read config file: {}", e))
        })?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::at_path(path, format!("Failed to parse config: {}", e)))?;
        debug!(base_url = %config.base_url, "Loaded config file");
        Ok(config)
    }

    /// Default location: `$CONFIG_DIR/tallyboard/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tallyboard").join("config.toml"))
    }

    /// Load configuration the way the CLI does.
    ///
    /// An explicit path must exist. Otherwise the default location is used
    /// when present, falling back to built-in defaults. The
    /// `TALLYBOARD_BASE_URL` environment variable is applied last.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file is unreadable or malformed, or if the
    /// resulting base URL does not parse.
    #[instrument(skip(explicit))]
    pub fn load(explicit: Option<&Path>) -> TallyboardResult<Self> {
        let config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|path| path.is_file()) {
                Some(path) => Self::from_file(path)?,
                None => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        let config = config.with_env_overrides(std::env::var(CONFIG_ENV_BASE_URL).ok());
        config.validate()?;
        info!(base_url = %config.base_url, "Client configuration ready");
        Ok(config)
    }

    /// Apply an override for the base URL, as read from the environment.
    pub fn with_env_overrides(mut self, base_url: Option<String>) -> Self {
        if let Some(base_url) = base_url.filter(|value| !value.trim().is_empty()) {
            debug!(base_url = %base_url, "Base URL overridden from environment");
            self.base_url = base_url;
        }
        self
    }

    /// Check that the base URL is an absolute URL.
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the offending value.
    pub fn validate(&self) -> TallyboardResult<()> {
        url::Url::parse(&self.base_url)
            .map_err(|e| ConfigError::new(format!("Invalid base_url '{}': {}", self.base_url, e)))?;
        Ok(())
    }

    /// Resolve an endpoint path against the base URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use tallyboard_client::ClientConfig;
    ///
    /// let config = ClientConfig::builder()
    ///     .base_url("https://api.example/")
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(config.resolve("/api/builds"), "https://api.example/api/builds");
    /// assert_eq!(config.resolve("https://cdn.example/x"), "https://cdn.example/x");
    /// ```
    pub fn resolve(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Absolute endpoint URLs.
    pub fn endpoints(&self) -> Endpoints {
        Endpoints::new(
            self.resolve(&self.accounts_path),
            self.resolve(&self.artifacts_path),
            self.resolve(&self.leaderboards_path),
            self.resolve(&self.builds_path),
            self.resolve(&self.collection_size_path),
        )
    }
}
