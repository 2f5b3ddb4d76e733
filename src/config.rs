//! Configuration for gzsearch.
//!
//! Configuration sources (highest priority first):
//! 1. Command-line flags (applied by the CLI on top of this)
//! 2. Environment variables (GZSEARCH_DATA, PORT, GZSEARCH_HOST, ...)
//! 3. Config file (.gzsearch/config.yaml)
//! 4. Defaults
//!
//! Config file discovery:
//! - Searches current directory and parents for .gzsearch/config.yaml
//! - Paths in config file are relative to the directory containing .gzsearch/

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::LoaderOptions;

pub const ENV_DATA: &str = "GZSEARCH_DATA";
pub const ENV_HOST: &str = "GZSEARCH_HOST";
pub const ENV_PORT: &str = "PORT";
pub const ENV_STATIC_DIR: &str = "GZSEARCH_STATIC_DIR";
pub const ENV_AUTOCOMPLETE: &str = "GZSEARCH_AUTOCOMPLETE";
pub const ENV_MAX_LINE_BYTES: &str = "GZSEARCH_MAX_LINE_BYTES";

const DEFAULT_DATA: &str = "data.gz";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_STATIC_DIR: &str = "static";
const DEFAULT_AUTOCOMPLETE: &str = "data.json";

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Errors while resolving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub server: Option<ServerConfig>,
    #[serde(default)]
    pub loader: Option<LoaderConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Gzip-compressed JSONL dataset
    pub data: Option<String>,
    /// Directory served for unmatched paths
    pub static_dir: Option<String>,
    /// JSON file echoed by /autocomplete
    pub autocomplete: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoaderConfig {
    pub max_line_bytes: Option<usize>,
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedConfig {
    /// Dataset path
    pub data: PathBuf,
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Static file root
    pub static_dir: PathBuf,
    /// File served verbatim by /autocomplete
    pub autocomplete: PathBuf,
    /// Longest dataset line that will be parsed
    pub max_line_bytes: NonZeroUsize,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            data: PathBuf::from(DEFAULT_DATA),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            autocomplete: PathBuf::from(DEFAULT_AUTOCOMPLETE),
            max_line_bytes: LoaderOptions::default().max_line_bytes,
            config_file: None,
        }
    }
}

impl ResolvedConfig {
    /// Loader options derived from this configuration
    pub fn loader_options(&self) -> LoaderOptions {
        LoaderOptions {
            max_line_bytes: self.max_line_bytes,
        }
    }

    /// `host:port` string for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Find config file by searching `start` and its parents
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(".gzsearch").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolve a path that may be relative to the config file's project root
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

/// Parse a line bound, rejecting zero
pub fn parse_max_line_bytes(key: &str, value: &str) -> Result<NonZeroUsize, ConfigError> {
    value
        .trim()
        .parse::<NonZeroUsize>()
        .map_err(|e| ConfigError::Invalid {
            key: key.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })
}

fn parse_port(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
        key: key.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Merge a config file (if any) and environment lookups over the defaults
fn resolve<F>(
    config_file: Option<(PathBuf, ConfigFile)>,
    env: F,
) -> Result<ResolvedConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = ResolvedConfig::default();

    if let Some((config_path, file)) = config_file {
        // Base directory is the parent of .gzsearch/ (i.e., grandparent of config.yaml)
        let base_dir = config_path
            .parent()
            .and_then(|p| p.parent())
            .unwrap_or(Path::new("."))
            .to_path_buf();

        if let Some(ref data) = file.paths.data {
            config.data = resolve_path(&base_dir, data);
        }
        if let Some(ref static_dir) = file.paths.static_dir {
            config.static_dir = resolve_path(&base_dir, static_dir);
        }
        if let Some(ref autocomplete) = file.paths.autocomplete {
            config.autocomplete = resolve_path(&base_dir, autocomplete);
        }

        if let Some(server) = file.server {
            if let Some(host) = server.host {
                config.host = host;
            }
            if let Some(port) = server.port {
                config.port = port;
            }
        }

        if let Some(max) = file.loader.and_then(|l| l.max_line_bytes) {
            config.max_line_bytes = NonZeroUsize::new(max).ok_or_else(|| ConfigError::Invalid {
                key: "loader.max_line_bytes".to_string(),
                value: max.to_string(),
                reason: "must be greater than zero".to_string(),
            })?;
        }

        config.config_file = Some(config_path);
    }

    if let Some(data) = env(ENV_DATA) {
        config.data = PathBuf::from(data);
    }
    if let Some(host) = env(ENV_HOST) {
        config.host = host;
    }
    if let Some(port) = env(ENV_PORT).filter(|p| !p.trim().is_empty()) {
        config.port = parse_port(ENV_PORT, &port)?;
    }
    if let Some(static_dir) = env(ENV_STATIC_DIR) {
        config.static_dir = PathBuf::from(static_dir);
    }
    if let Some(autocomplete) = env(ENV_AUTOCOMPLETE) {
        config.autocomplete = PathBuf::from(autocomplete);
    }
    if let Some(max) = env(ENV_MAX_LINE_BYTES) {
        config.max_line_bytes = parse_max_line_bytes(ENV_MAX_LINE_BYTES, &max)?;
    }

    Ok(config)
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig, ConfigError> {
    let config_file = std::env::current_dir()
        .ok()
        .and_then(|cwd| find_config_file(&cwd))
        .map(|path| load_config_file(&path).map(|file| (path, file)))
        .transpose()?;

    resolve(config_file, |key| std::env::var(key).ok())
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> anyhow::Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}
