use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::fetch::Timeouts;
use crate::range::{ChunkPolicy, DEFAULT_CHUNK_SIZE};

/// Default endpoint: the local test server.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8080/";

/// Timeout parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// TCP connect timeout in seconds.
    pub connect_secs: u64,
    /// Abort a request when no bytes arrive for this many seconds.
    pub read_stall_secs: u64,
    /// Hard limit on one request in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 10,
            read_stall_secs: 30,
            request_secs: 300,
        }
    }
}

impl From<&TimeoutConfig> for Timeouts {
    fn from(t: &TimeoutConfig) -> Self {
        Timeouts {
            connect: Duration::from_secs(t.connect_secs),
            read_stall: Duration::from_secs(t.read_stall_secs),
            request: Duration::from_secs(t.request_secs),
        }
    }
}

/// Chunking policy as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkPolicyKind {
    /// Fixed-size chunks of `chunk_size` bytes.
    #[default]
    Chunked,
    /// One request for the whole remaining range.
    Whole,
}

/// Configuration loaded from `~/.config/rangefetch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeFetchConfig {
    /// HTTP endpoint that serves the byte ranges.
    pub endpoint: String,
    /// "chunked" (default) or "whole".
    pub chunk_policy: ChunkPolicyKind,
    /// Bytes per request when chunked.
    pub chunk_size: u64,
    /// Optional timeouts; if missing, built-in defaults are used.
    pub timeouts: Option<TimeoutConfig>,
}

impl Default for RangeFetchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            chunk_policy: ChunkPolicyKind::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            timeouts: None,
        }
    }
}

impl RangeFetchConfig {
    /// Policy for the fetch loop.
    pub fn chunk_policy(&self) -> ChunkPolicy {
        match self.chunk_policy {
            ChunkPolicyKind::Chunked => ChunkPolicy::Fixed(self.chunk_size),
            ChunkPolicyKind::Whole => ChunkPolicy::Whole,
        }
    }

    pub fn timeouts(&self) -> Timeouts {
        self.timeouts
            .as_ref()
            .map(Timeouts::from)
            .unwrap_or_default()
    }

    /// Reject values the fetch loop cannot work with.
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.endpoint)
            .with_context(|| format!("invalid endpoint {:?}", self.endpoint))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("endpoint must be http or https, got {:?}", url.scheme());
        }
        if self.chunk_size == 0 {
            anyhow::bail!("chunk_size must be greater than 0");
        }
        if let Some(t) = &self.timeouts {
            if t.connect_secs == 0 || t.read_stall_secs == 0 || t.request_secs == 0 {
                anyhow::bail!("timeouts must be greater than 0 seconds");
            }
        }
        Ok(())
    }
}

/// Default config location, if one exists under the XDG config dirs.
pub fn find_config_path() -> Result<Option<PathBuf>> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("rangefetch")?;
    Ok(xdg_dirs.find_config_file("config.toml"))
}

/// Load and validate configuration from `path`.
pub fn load_from(path: &Path) -> Result<RangeFetchConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: RangeFetchConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("config {}", path.display()))?;
    Ok(cfg)
}

/// Load configuration from `explicit` or the XDG config dir. Nothing is
/// written; a missing default file means built-in defaults.
pub fn load(explicit: Option<&Path>) -> Result<RangeFetchConfig> {
    if let Some(path) = explicit {
        return load_from(path);
    }
    match find_config_path()? {
        Some(path) => {
            tracing::info!("loading config from {}", path.display());
            load_from(&path)
        }
        None => Ok(RangeFetchConfig::default()),
    }
}
