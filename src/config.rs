//! Configuration for the teleop link
//!
//! The endpoint address is the only real configuration point; everything else
//! has sensible defaults. Config is loaded from an optional YAML file so a
//! bare invocation works against the reference rover address.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

/// Reference rover endpoint
const DEFAULT_ENDPOINT: &str = "ws://192.168.1.50:8000/ws";

/// Fixed delay between reconnection attempts
const DEFAULT_RECONNECT_DELAY_MS: u64 = 3000;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub link: LinkConfig,
}

/// Control link configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LinkConfig {
    /// WebSocket endpoint of the rover
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Constant retry interval after a lost connection (no backoff)
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            reconnect_delay_ms: default_reconnect_delay_ms(),
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_reconnect_delay_ms() -> u64 {
    DEFAULT_RECONNECT_DELAY_MS
}

impl AppConfig {
    /// Load configuration from a YAML file.
    ///
    /// A missing file is not an error: the defaults above apply.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !fs::try_exists(path).await.unwrap_or(false) {
            tracing::info!("no config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }
}
