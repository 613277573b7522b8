//! CLI configuration via `tessera.toml`
//!
//! Every field has a default and a missing file means defaults. The file is
//! looked up in the working directory unless `--config` names another one.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tessera_cache::DEFAULT_REDIS_URL;
use tessera_core::{Error, Result};
use tessera_docstore::DEFAULT_TOP_IPS;

/// Config file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "tessera.toml";

/// Key-value backend behind the cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Redis server at `url`
    #[default]
    Redis,
    /// In-process store, gone when the command exits
    Memory,
}

/// `[cache]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    pub url: String,
    pub count_calls: bool,
    pub call_history: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            url: DEFAULT_REDIS_URL.to_string(),
            count_calls: true,
            call_history: true,
        }
    }
}

/// `[logs]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogsConfig {
    pub path: PathBuf,
    pub top_ips: usize,
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("nginx.jsonl"),
            top_ips: DEFAULT_TOP_IPS,
        }
    }
}

/// Configuration loaded from `tessera.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TesseraConfig {
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
    pub cache: CacheConfig,
    pub logs: LogsConfig,
}

impl Default for TesseraConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            cache: CacheConfig::default(),
            logs: LogsConfig::default(),
        }
    }
}

impl TesseraConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Tessera configuration
#
# Tracing filter used when RUST_LOG is unset (default: "warn").
# Logs go to stderr; command output goes to stdout.
log_level = "warn"

[cache]
# Backend: "redis" (default) or "memory"
backend = "redis"
url = "redis://127.0.0.1:6379"
# Record a call counter and the call history of Cache.store
count_calls = true
call_history = true

[logs]
# JSON-lines dump of the access-log collection
path = "nginx.jsonl"
# Addresses listed in the IPs section
top_ips = 10
"#
    }

    /// Read and parse config from a file path.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content).map_err(|e| {
            Error::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Load `explicit` if given, else `tessera.toml` in the working directory
    /// if it exists, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = Path::new(CONFIG_FILE_NAME);
                if path.exists() {
                    Self::from_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns whether the file was created.
    pub fn write_default_if_missing(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        std::fs::write(path, Self::default_toml()).map_err(|e| {
            Error::Config(format!(
                "Failed to write default config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Ok(true)
    }
}
