//! Layered configuration for review-desk.
//!
//! Values come from `review-desk.toml` (all keys optional), then environment
//! variables, then CLI flags applied by the caller.
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 5000
//! max_body_mb = 100
//! staging_dir = "temp_uploads"
//! dev_mode = false
//!
//! [gemini]
//! model = "gemini-3-flash-preview"
//! base_url = "https://generativelanguage.googleapis.com"
//! timeout_secs = 120
//!
//! [logging]
//! level = "info"
//! json = false
//! dir = "logs"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = "review-desk.toml";

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound on a request body, in MiB.
    #[serde(default = "default_max_body_mb")]
    pub max_body_mb: usize,
    /// Root directory for transient copies of uploaded files.
    #[serde(default = "default_staging_dir")]
    pub staging_dir: PathBuf,
    /// Permissive CORS, for serving the page from another origin.
    #[serde(default)]
    pub dev_mode: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_max_body_mb() -> usize {
    100
}

fn default_staging_dir() -> PathBuf {
    PathBuf::from("temp_uploads")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_mb: default_max_body_mb(),
            staging_dir: default_staging_dir(),
            dev_mode: false,
        }
    }
}

impl ServerConfig {
    pub fn max_body_bytes(&self) -> usize {
        self.max_body_mb.saturating_mul(1024 * 1024)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Provider settings. The API key is per request and never lives here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeminiConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// No local timeout when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
    /// Also write a daily rolling log file here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
            dir: None,
        }
    }
}

/// Contents of `review-desk.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeskConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DeskConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse review-desk.toml")
    }

    /// Load `review-desk.toml` from `dir`, or defaults when it is absent.
    pub fn load_or_default(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load from an explicit path if given, else from `dir`, then apply
    /// process environment overrides.
    pub fn resolve(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None => Self::load_or_default(dir)?,
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply environment-style overrides through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("REVIEW_DESK_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("REVIEW_DESK_PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("Invalid REVIEW_DESK_PORT '{}'", port))?;
        }
        if let Some(mb) = lookup("REVIEW_DESK_MAX_BODY_MB") {
            self.server.max_body_mb = mb
                .parse()
                .with_context(|| format!("Invalid REVIEW_DESK_MAX_BODY_MB '{}'", mb))?;
        }
        if let Some(dir) = lookup("REVIEW_DESK_STAGING_DIR") {
            self.server.staging_dir = PathBuf::from(dir);
        }
        if let Some(model) = lookup("GEMINI_MODEL") {
            self.gemini.model = model;
        }
        if let Some(url) = lookup("GEMINI_BASE_URL") {
            self.gemini.base_url = url;
        }
        if let Some(secs) = lookup("GEMINI_TIMEOUT_SECS") {
            self.gemini.timeout_secs = Some(
                secs.parse()
                    .with_context(|| format!("Invalid GEMINI_TIMEOUT_SECS '{}'", secs))?,
            );
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    /// Write the default configuration to `dir/review-desk.toml`.
    pub fn write_default(dir: &Path, force: bool) -> Result<PathBuf> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.exists() && !force {
            anyhow::bail!(
                "{} already exists. Use --force to overwrite.",
                path.display()
            );
        }
        std::fs::write(&path, Self::default().to_toml()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}
