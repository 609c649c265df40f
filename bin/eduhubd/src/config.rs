//! Server configuration loaded from a TOML file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the embedded document store.
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Process-wide signing secret. Empty secret refuses to start.
    pub secret: String,
    /// Token lifetime in seconds (default and maximum: 24h).
    #[serde(default = "default_expire_secs")]
    pub expire_secs: u64,
}

fn default_expire_secs() -> u64 {
    86_400
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins for credentialed browser requests.
    #[serde(default)]
    pub origins: Vec<String>,
}

impl ServerConfig {
    /// Resolve a context name to `/etc/eduhub/<name>.toml`.
    /// If a path with `/` or `.` is given, it's used directly.
    pub fn resolve_path(name_or_path: &str) -> PathBuf {
        if name_or_path.contains('/') || name_or_path.contains('.') {
            PathBuf::from(name_or_path)
        } else {
            PathBuf::from(format!("/etc/eduhub/{}.toml", name_or_path))
        }
    }

    /// Load and parse a configuration file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config = toml::from_str(&raw)?;
        Ok(config)
    }
}
