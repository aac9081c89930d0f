//! Configuration management for the AutoStream chat client
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from a YAML file with CLI overrides. The config file is
//! optional; defaults apply when it is absent.

use crate::cli::Cli;
use crate::error::{ChatClientError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for the chat client
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Assistant service settings
    #[serde(default)]
    pub backend: BackendConfig,

    /// Session token storage settings
    #[serde(default)]
    pub session: SessionConfig,

    /// Chat presentation settings
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Assistant service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Chat endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    ///
    /// The turn lifecycle itself has no timeout; expiry here surfaces as an
    /// ordinary failed turn.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_endpoint() -> String {
    "https://autostream-backend.onrender.com/api/chat".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Session token storage configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SessionConfig {
    /// Path to the session database directory
    ///
    /// When unset, a per-user data directory is used.
    #[serde(default)]
    pub storage_path: Option<PathBuf>,
}

impl SessionConfig {
    /// The effective session database path
    pub fn resolved_storage_path(&self) -> PathBuf {
        self.storage_path
            .clone()
            .unwrap_or_else(crate::session::default_storage_path)
    }
}

/// Chat presentation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Seed the transcript with a welcome message on start
    #[serde(default = "default_show_welcome")]
    pub show_welcome: bool,

    /// Text of the welcome message
    #[serde(default = "default_welcome_message")]
    pub welcome_message: String,
}

fn default_show_welcome() -> bool {
    true
}

fn default_welcome_message() -> String {
    "Welcome! I'm AutoStream Assistant. I can help you with pricing, plans, \
     and answer your questions. What can I help you with today?"
        .to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            show_welcome: default_show_welcome(),
            welcome_message: default_welcome_message(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file, applying CLI overrides
    ///
    /// A missing file is not an error; defaults are used. A present but
    /// unparsable file is an error.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    /// * `cli` - Parsed CLI arguments whose global options override the file
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>, cli: &Cli) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            serde_yaml::from_str(&contents)?
        } else {
            tracing::debug!("No config file at {}; using defaults", path.display());
            Self::default()
        };

        if let Some(endpoint) = &cli.endpoint {
            tracing::debug!("Using endpoint override from CLI: {}", endpoint);
            config.backend.endpoint = endpoint.clone();
        }
        if let Some(session_db) = &cli.session_db {
            tracing::debug!(
                "Using session DB override from CLI: {}",
                session_db.display()
            );
            config.session.storage_path = Some(session_db.clone());
        }

        Ok(config)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `ChatClientError::Config` for an unusable endpoint or a zero
    /// timeout.
    pub fn validate(&self) -> Result<()> {
        if self.backend.endpoint.trim().is_empty() {
            return Err(ChatClientError::Config("Backend endpoint is empty".to_string()).into());
        }
        if !self.backend.endpoint.starts_with("http://")
            && !self.backend.endpoint.starts_with("https://")
        {
            return Err(ChatClientError::Config(format!(
                "Backend endpoint must be an HTTP(S) URL: {}",
                self.backend.endpoint
            ))
            .into());
        }
        if self.backend.timeout_seconds == 0 {
            return Err(
                ChatClientError::Config("Request timeout must be non-zero".to_string()).into(),
            );
        }
        Ok(())
    }
}
