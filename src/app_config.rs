//! Module for application configuration settings.
//!
//! Browsing works out of the box against the public demo host. A TOML
//! config can point at another host, add an access token, tune request
//! deadlines, and extend the file classification table.

use secrecy::{ExposeSecret as _, SecretString};
use thiserror::Error;
use tracing::debug;

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use gitscope::classify::ClassifyTable;

/// Request deadline settings, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TimeoutConfig {
    /// Deadline for content, listing and metadata requests.
    pub request_secs: u64,

    /// Deadline for markdown rendering. Tighter, since rendering has a safe
    /// fallback and must not stall a page.
    pub markdown_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 10,
            markdown_secs: 5,
        }
    }
}

impl TimeoutConfig {
    pub fn request(self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    pub fn markdown(self) -> Duration {
        Duration::from_secs(self.markdown_secs)
    }
}

/// Additions to the built-in file classification table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClassifyConfig {
    /// Extra extensions displayed as images.
    #[serde(default)]
    pub image_extensions: Vec<String>,

    /// Extra extensions treated as opaque binaries.
    #[serde(default)]
    pub binary_extensions: Vec<String>,

    /// Extension-to-language overrides for syntax labels.
    #[serde(default)]
    pub languages: HashMap<String, String>,
}

fn default_host() -> String {
    gitea_api::DEFAULT_BASE_URL.to_owned()
}

fn serialize_token<S>(
    _token: &Option<SecretString>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str("****")
}

/// Application configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Base URL of the Gitea-compatible API, including the `/api/v1` part.
    #[serde(default = "default_host")]
    pub host: String,

    /// Access token for the host, sent as `Authorization: token …`.
    #[serde(default, serialize_with = "serialize_token")]
    pub token: Option<SecretString>,

    #[serde(default)]
    pub timeouts: TimeoutConfig,

    #[serde(default)]
    pub classify: ClassifyConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            token: None,
            timeouts: TimeoutConfig::default(),
            classify: ClassifyConfig::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation errors: {0:?}")]
    ValidationErrors(Vec<String>),

    #[error("Deserialization error: {0}")]
    DeserializationError(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl Config {
    /// Validate the correctness of the configuration.
    ///
    /// Returns:
    /// - `Ok(())` if the configuration is valid.
    /// - `Err(Vec<String>)` containing a list of validation error messages.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.host.is_empty() {
            errors.push("Host must not be empty.".to_owned());
        } else if !self.host.starts_with("http://") && !self.host.starts_with("https://") {
            errors.push(format!(
                "Host '{}' must start with http:// or https://.",
                self.host
            ));
        }

        if self.timeouts.request_secs == 0 {
            errors.push("Request timeout must be at least one second.".to_owned());
        }
        if self.timeouts.markdown_secs == 0 {
            errors.push("Markdown timeout must be at least one second.".to_owned());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Returns config file paths in descending priority order.
    /// On macOS, skips `dirs::config_dir()` (resolves to ~/Library/Application Support/).
    fn config_search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        #[cfg(not(target_os = "macos"))]
        if let Some(xdg) = dirs::config_dir() {
            paths.push(xdg.join("gitscope").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("gitscope").join("config.toml"));
        }

        paths.push(PathBuf::from("/etc/gitscope/config.toml"));

        paths
    }

    /// Finds the first existing config file from search paths.
    fn find_config_file() -> Option<PathBuf> {
        Self::config_search_paths().into_iter().find(|p| p.exists())
    }

    /// Loads config from a single TOML file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = ?path, "Loading configuration file.");
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Loads configuration from the first found config file, or the external path if given.
    pub fn load(external_config_path: Option<&Path>) -> Option<Result<Self, ConfigError>> {
        if let Some(path) = external_config_path {
            return Some(Self::load_from_file(path));
        }

        Self::find_config_file().map(|path| Self::load_from_file(&path))
    }

    /// Loads config, falling back to defaults when no file exists.
    /// Errors if a config file exists but is malformed or invalid.
    pub fn load_or_default(external_config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(res) = Self::load(external_config_path) {
            let config = res?;
            if let Err(validation_errors) = config.validate() {
                return Err(ConfigError::ValidationErrors(validation_errors));
            }
            debug!("Loaded configuration successfully.");
            return Ok(config);
        }

        debug!("No configuration file found, using defaults.");
        Ok(Self::default())
    }

    /// Build the API client this configuration describes.
    pub fn client(&self) -> gitea_api::Gitea {
        let mut builder = gitea_api::Gitea::builder()
            .base_url(self.host.trim_end_matches('/'))
            .timeouts(self.timeouts.request(), self.timeouts.markdown());

        if let Some(token) = &self.token {
            builder = builder.token(token.expose_secret());
        }

        builder.build()
    }

    /// The classification table with this configuration's additions applied.
    pub fn classify_table(&self) -> ClassifyTable {
        let mut table = ClassifyTable::default();
        table.add_image_extensions(self.classify.image_extensions.iter().cloned());
        table.add_binary_extensions(self.classify.binary_extensions.iter().cloned());
        table.add_languages(self.classify.languages.clone());
        table
    }
}
