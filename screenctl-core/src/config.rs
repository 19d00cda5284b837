use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::CoreError;

/// Default bind address for the HTTP server
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Token of the placeholder identity used in guest mode
pub const DEFAULT_GUEST_TOKEN: &str = "guest_001";

/// Centralized configuration for screenctl
///
/// Every section is optional in the TOML file; missing keys fall back to
/// defaults so a fresh machine can run `screenctl serve` without setup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenctlConfig {
    pub server: ServerSection,
    pub database: DatabaseSection,
    pub storage: StorageSection,
    pub access: AccessSection,
    pub session: SessionSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind: SocketAddr,
    pub cors_permissive: bool,
    pub request_timeout_secs: u64,
    pub max_upload_bytes: usize,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            cors_permissive: false,
            request_timeout_secs: 30,
            max_upload_bytes: 5 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: format!(
                "sqlite://{}",
                ScreenctlConfig::home_dir().join("screenctl.db").display()
            ),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    pub upload_dir: PathBuf,
    pub static_dir: PathBuf,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            upload_dir: ScreenctlConfig::home_dir().join("uploads"),
            static_dir: PathBuf::from("static"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessSection {
    pub mode: AccessMode,
    pub guest_token: String,
}

impl Default for AccessSection {
    fn default() -> Self {
        Self {
            mode: AccessMode::default(),
            guest_token: DEFAULT_GUEST_TOKEN.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    pub secure_cookies: bool,
    pub inactivity_days: i64,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            secure_cookies: false,
            inactivity_days: 7,
        }
    }
}

/// How an anonymous caller is resolved.
///
/// - `Authenticated`: API calls need a logged-in session, pages redirect to `/login`
/// - `Guest`: anonymous callers act as the shared guest identity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessMode {
    #[default]
    Authenticated,
    Guest,
}

impl AccessMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authenticated => "authenticated",
            Self::Guest => "guest",
        }
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessMode {
    type Err = CoreError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "authenticated" | "auth" => Ok(Self::Authenticated),
            "guest" => Ok(Self::Guest),
            other => Err(CoreError::invalid_setting("access.mode", other)),
        }
    }
}

impl ScreenctlConfig {
    /// Load config from ~/.screenctl/config.toml, then apply environment overrides.
    ///
    /// A missing file is not an error.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path())?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load config from an explicit path without environment overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        toml::from_str(&content)
            .map_err(|e| CoreError::config(path, e.to_string()))
            .context("Failed to parse config file (invalid TOML)")
    }

    /// Apply overrides from a key lookup (the process environment in production).
    ///
    /// `SCREENCTL_DATABASE_URL` wins over `DATABASE_URL`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("SCREENCTL_DATABASE_URL").or_else(|| lookup("DATABASE_URL")) {
            self.database.url = url;
        }

        if let Some(bind) = lookup("SCREENCTL_BIND") {
            self.server.bind = bind
                .parse()
                .map_err(|_| CoreError::invalid_setting("server.bind", bind.clone()))?;
        }

        if let Some(mode) = lookup("SCREENCTL_ACCESS_MODE") {
            self.access.mode = mode.parse()?;
        }

        if let Some(dir) = lookup("SCREENCTL_UPLOAD_DIR") {
            self.storage.upload_dir = PathBuf::from(dir);
        }

        Ok(())
    }

    /// Base directory: ~/.screenctl
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".screenctl")
    }

    /// Get config file path: ~/.screenctl/config.toml
    pub fn config_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Render as TOML (used by `screenctl config show` and `config init`)
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Write this config to `path`, refusing to overwrite unless `force` is set.
    pub fn write_to(&self, path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            anyhow::bail!(
                "Config already exists at {:?}\n\nUse --force to overwrite",
                path
            );
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        fs::write(path, self.to_toml()?)
            .with_context(|| format!("Failed to write config file: {:?}", path))
    }
}
