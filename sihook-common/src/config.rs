//! Bootstrap configuration for the search index hook
//!
//! Configuration file resolution priority:
//! 1. Explicit path (command-line argument)
//! 2. `SIHOOK_CONFIG` environment variable
//! 3. `~/.config/sihook/config.toml`, then `/etc/sihook/config.toml`
//! 4. Built-in defaults (missing file is not an error)
//!
//! Individual search index and catalog values may be overridden by
//! environment variables after the file is read.
//!
//! Search index values are validated lazily: a missing or malformed value
//! only fails when an operation first needs it.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "SIHOOK_CONFIG";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    /// HTTP port of the hook service
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Search index endpoint and document settings
    #[serde(default)]
    pub search_index: SearchIndexConfig,

    /// Catalog action API used for license and package lookups
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            logging: LoggingConfig::default(),
            search_index: SearchIndexConfig::default(),
            catalog: CatalogConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Catalog action API configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Base URL of the catalog (e.g. `http://localhost:5000`)
    #[serde(default)]
    pub url: Option<String>,

    /// Optional API token sent as `Authorization` header
    #[serde(default)]
    pub api_token: Option<String>,
}

impl CatalogConfig {
    /// Catalog base URL without trailing slash
    pub fn base_url(&self) -> Result<String> {
        let url = configured(&self.url)
            .ok_or_else(|| Error::Config("Configured catalog URL is not a value".to_string()))?;
        Ok(url.trim_end_matches('/').to_string())
    }
}

/// Search index settings
///
/// All values except the timeout are required, but only checked on use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchIndexConfig {
    /// Index endpoint URL
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Basic auth credentials as `username:password`
    #[serde(default)]
    pub credentials: Option<String>,

    /// Comma-separated list of dataset types to index
    #[serde(default)]
    pub indexable_types: Option<String>,

    /// Base path the dataset name is appended to for the target link
    #[serde(default)]
    pub targetlink_base_path: Option<String>,

    /// Name of the index documents are written to
    #[serde(default)]
    pub index_name: Option<String>,

    /// Transport timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for SearchIndexConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            credentials: None,
            indexable_types: None,
            targetlink_base_path: None,
            index_name: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Basic auth credentials for the index endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl SearchIndexConfig {
    /// Index endpoint, completed with a trailing slash
    pub fn endpoint(&self) -> Result<String> {
        let endpoint = configured(&self.endpoint)
            .ok_or_else(|| Error::Config("Configured endpoint is not a value".to_string()))?;
        Ok(with_trailing_slash(endpoint))
    }

    /// Credentials split at the single colon
    pub fn credentials(&self) -> Result<Credentials> {
        let raw = configured(&self.credentials)
            .ok_or_else(|| Error::Config("Configured credentials are not a string".to_string()))?;

        let parts: Vec<&str> = raw.split(':').collect();
        match parts.as_slice() {
            [username, password] => Ok(Credentials {
                username: (*username).to_string(),
                password: (*password).to_string(),
            }),
            _ => Err(Error::Config(
                "Credentials not configured in format username:password".to_string(),
            )),
        }
    }

    /// Target link base path, completed with a trailing slash
    pub fn targetlink_base_path(&self) -> Result<String> {
        let path = configured(&self.targetlink_base_path).ok_or_else(|| {
            Error::Config("Configured URL base path is not a string".to_string())
        })?;
        Ok(with_trailing_slash(path))
    }

    /// Index name
    pub fn index_name(&self) -> Result<&str> {
        configured(&self.index_name)
            .ok_or_else(|| Error::Config("Configured index name is not a string".to_string()))
    }

    /// Indexable dataset types, each trimmed
    pub fn indexable_types(&self) -> Result<Vec<String>> {
        let raw = configured(&self.indexable_types).ok_or_else(|| {
            Error::Config("Configured indexable data types are not a string".to_string())
        })?;
        Ok(raw.split(',').map(|t| t.trim().to_string()).collect())
    }

    /// Whether a dataset type is in the allow-list (input is trimmed)
    pub fn should_be_indexed(&self, dataset_type: &str) -> Result<bool> {
        let dataset_type = dataset_type.trim();
        Ok(self.indexable_types()?.iter().any(|t| t == dataset_type))
    }

    /// Target link for a dataset: base path followed by the dataset name
    pub fn targetlink_for(&self, dataset_name: &str) -> Result<String> {
        Ok(format!("{}{}", self.targetlink_base_path()?, dataset_name))
    }

    /// Check every value needed to add a document to the index
    pub fn assert_configuration(&self) -> Result<()> {
        self.endpoint()?;
        self.credentials()?;
        self.targetlink_base_path()?;
        self.index_name()?;
        Ok(())
    }
}

impl TomlConfig {
    /// Load configuration, falling back to defaults when no file exists
    ///
    /// A file that exists but cannot be read or parsed is an error.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = match resolve_config_path(explicit_path) {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                Self::from_file(&path)?
            }
            None => {
                warn!("No configuration file found, using defaults and environment");
                Self::default()
            }
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
    }

    /// Apply `SIHOOK_*` environment variables on top of file values
    pub fn apply_env_overrides(&mut self) {
        let overrides: [(&str, &mut Option<String>); 7] = [
            ("SIHOOK_ENDPOINT", &mut self.search_index.endpoint),
            ("SIHOOK_CREDENTIALS", &mut self.search_index.credentials),
            ("SIHOOK_INDEXABLE_TYPES", &mut self.search_index.indexable_types),
            ("SIHOOK_TARGETLINK_BASE_PATH", &mut self.search_index.targetlink_base_path),
            ("SIHOOK_INDEX_NAME", &mut self.search_index.index_name),
            ("SIHOOK_CATALOG_URL", &mut self.catalog.url),
            ("SIHOOK_CATALOG_API_TOKEN", &mut self.catalog.api_token),
        ];

        for (name, slot) in overrides {
            if let Ok(value) = std::env::var(name) {
                *slot = Some(value);
            }
        }

        if let Ok(value) = std::env::var("SIHOOK_REQUEST_TIMEOUT_SECS") {
            match value.parse::<u64>() {
                Ok(secs) => self.search_index.request_timeout_secs = secs,
                Err(e) => warn!("Ignoring invalid SIHOOK_REQUEST_TIMEOUT_SECS '{}': {}", value, e),
            }
        }

        if let Ok(level) = std::env::var("SIHOOK_LOG_LEVEL") {
            self.logging.level = level;
        }
    }
}

/// Resolve which config file to read, if any
fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: explicit path is used even if missing, so the read error surfaces
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    // Priority 2: environment variable
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return Some(PathBuf::from(path));
    }

    // Priority 3: user then system config file
    let user_config = dirs::config_dir().map(|d| d.join("sihook").join("config.toml"));
    let system_config = PathBuf::from("/etc/sihook/config.toml");

    user_config
        .into_iter()
        .chain(std::iter::once(system_config))
        .find(|p| p.exists())
}

/// A configured value counts only if it holds something besides whitespace
fn configured(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn with_trailing_slash(value: &str) -> String {
    if value.ends_with('/') {
        value.to_string()
    } else {
        format!("{}/", value)
    }
}

fn default_port() -> u16 {
    5790
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}
