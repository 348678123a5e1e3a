//! Layered configuration for Nightwing.
//!
//! Settings are read from `<data_dir>/nightwing.toml`, then overridden by
//! environment variables, then by CLI flags.
//!
//! # Configuration File Format
//!
//! ```toml
//! [remote]
//! base_url = "http://localhost:3000"
//! timeout_secs = 10
//!
//! [board]
//! fallback = "strict"   # or "optimistic" (offline mode)
//!
//! [server]
//! host = "127.0.0.1"
//! port = 3000
//! cors_origin = "http://localhost:5173"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::board::FallbackPolicy;

pub const CONFIG_FILE: &str = "nightwing.toml";

/// Where the project service lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout_secs() -> u64 {
    crate::board::sync::DEFAULT_TIMEOUT.as_secs()
}

impl Default for RemoteSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardSection {
    /// What to do when the project service cannot be reached.
    #[serde(default)]
    pub fallback: FallbackPolicy,
}

/// Settings for `nightwing serve`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_cors_origin() -> String {
    "http://localhost:5173".to_string()
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default)]
    pub remote: RemoteSection,
    #[serde(default)]
    pub board: BoardSection,
    #[serde(default)]
    pub server: ServerSection,
}

impl BoardConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse nightwing.toml")
    }

    pub fn load_or_default(data_dir: &Path) -> Result<Self> {
        let config_path = data_dir.join(CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Apply environment overrides. `lookup` is `std::env::var(..).ok()` in
    /// production; tests pass a closure over a map.
    ///
    /// | Env Var                  | Field                  |
    /// |--------------------------|------------------------|
    /// | `NIGHTWING_API_URL`      | `remote.base_url`      |
    /// | `NIGHTWING_TIMEOUT_SECS` | `remote.timeout_secs`  |
    /// | `NIGHTWING_FALLBACK`     | `board.fallback`       |
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("NIGHTWING_API_URL") {
            self.remote.base_url = url;
        }
        if let Some(secs) = lookup("NIGHTWING_TIMEOUT_SECS") {
            self.remote.timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("NIGHTWING_TIMEOUT_SECS must be an integer, got '{}'", secs))?;
        }
        if let Some(policy) = lookup("NIGHTWING_FALLBACK") {
            self.board.fallback = policy.parse()?;
        }
        Ok(self)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.remote.timeout_secs)
    }

    /// Validate the configuration and return any warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        let url = self.remote.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            warnings.push(format!(
                "remote.base_url '{}' should start with http:// or https://",
                self.remote.base_url
            ));
        }
        if self.remote.timeout_secs == 0 {
            warnings.push("remote.timeout_secs is 0; every remote call will time out".to_string());
        } else if self.remote.timeout_secs > 60 {
            warnings.push(format!(
                "remote.timeout_secs is {}; the board will appear frozen while the service is down",
                self.remote.timeout_secs
            ));
        }
        if self.server.port == 0 {
            warnings.push("server.port is 0; the OS will pick a random port".to_string());
        }

        warnings
    }
}

/// Platform data directory for board state, e.g. `~/.local/share/nightwing`.
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("nightwing")
}
