//! Fidela configuration system.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FidelaConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
    #[serde(default)]
    pub sender: SenderConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub broadcast: BroadcastConfig,
}

fn default_db_path() -> String {
    "~/.fidela/fidela.db".into()
}

impl Default for FidelaConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            sender: SenderConfig::default(),
            schedule: ScheduleConfig::default(),
            broadcast: BroadcastConfig::default(),
        }
    }
}

impl FidelaConfig {
    /// Load config from the default path (~/.fidela/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::error::FidelaError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| crate::error::FidelaError::Config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Save config to the default path.
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::FidelaError::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the Fidela home directory.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".fidela")
    }
}

/// Outbound channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SenderConfig {
    /// Operating mode: "stub" (log intent, no delivery) or "live"
    /// (WhatsApp Business Cloud API).
    #[serde(default = "default_mode")]
    pub mode: String,
    /// Facebook Graph API access token (live mode).
    #[serde(default)]
    pub access_token: String,
    /// WhatsApp Phone Number ID (live mode).
    #[serde(default)]
    pub phone_number_id: String,
}

fn default_mode() -> String {
    "stub".into()
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            access_token: String::new(),
            phone_number_id: String::new(),
        }
    }
}

/// Daily scheduler trigger time (local wall clock).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_hour")]
    pub hour: u32,
    #[serde(default)]
    pub minute: u32,
}

fn default_hour() -> u32 {
    9
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self { hour: default_hour(), minute: 0 }
    }
}

/// Broadcast pacing — the randomized per-client delay that keeps bulk sends
/// under the channel's throttling radar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadcastConfig {
    #[serde(default = "default_min_delay")]
    pub min_delay_secs: u64,
    #[serde(default = "default_max_delay")]
    pub max_delay_secs: u64,
}

fn default_min_delay() -> u64 {
    10
}
fn default_max_delay() -> u64 {
    30
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            min_delay_secs: default_min_delay(),
            max_delay_secs: default_max_delay(),
        }
    }
}
