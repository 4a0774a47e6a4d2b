use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logs: LogsConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// Largest accepted request body, after decompression
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3000))
}

fn default_max_body_bytes() -> usize {
    100 * 1024 // 100 KB
}

/// Log collection configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogsConfig {
    /// JSON file holding the whole collection
    #[serde(default = "default_file_path")]
    pub file_path: PathBuf,
    /// Page size for `GET /logs` without a `limit` parameter
    #[serde(default = "default_limit")]
    pub default_limit: u64,
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            file_path: default_file_path(),
            default_limit: default_limit(),
        }
    }
}

fn default_file_path() -> PathBuf {
    PathBuf::from("data/logs.json")
}

fn default_limit() -> u64 {
    crate::logs::DEFAULT_LIMIT
}
