//! Client configuration loaded from `aegis.toml`.
//!
//! [`AegisConfig`] holds every configurable parameter. Fields missing from
//! the file fall back to the reference deployment's values. The
//! `AEGIS_API_BASE` environment variable takes precedence over the file for
//! the API location.

use std::path::Path;

use serde::Deserialize;

use crate::error::AegisError;
use crate::poller::PollConfig;

/// Environment variable overriding the configured API base URL.
pub const API_BASE_ENV: &str = "AEGIS_API_BASE";

/// Top-level configuration loaded from `aegis.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct AegisConfig {
    /// Base URL of the protection API deployment.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Delay between job status reads, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Maximum status reads before a poll session times out.
    /// `0` disables the ceiling and polls until a terminal status.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Interval between liveness probes, in seconds.
    #[serde(default = "default_health_interval_secs")]
    pub health_interval_secs: u64,
}

fn default_api_base() -> String {
    "http://127.0.0.1:8000".to_string()
}

// Interval used by every dashboard in the reference deployment.
fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_max_attempts() -> u32 {
    30
}

fn default_health_interval_secs() -> u64 {
    30
}

impl Default for AegisConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            poll_interval_ms: default_poll_interval_ms(),
            max_attempts: default_max_attempts(),
            health_interval_secs: default_health_interval_secs(),
        }
    }
}

impl AegisConfig {
    /// Load configuration from `aegis.toml` in the current directory, then
    /// apply the environment override. Uses defaults if the file is absent.
    pub fn load() -> Result<Self, AegisError> {
        let mut config = Self::load_from(Path::new("aegis.toml"))?;
        config.apply_base_override(std::env::var(API_BASE_ENV).ok());
        Ok(config)
    }

    /// Load configuration from a specific file, without the environment
    /// override.
    pub fn load_from(path: &Path) -> Result<Self, AegisError> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Ok(toml::from_str::<AegisConfig>(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Replace the API base when a non-empty override is present.
    pub fn apply_base_override(&mut self, base: Option<String>) {
        if let Some(base) = base
            && !base.is_empty()
        {
            self.api_base = base;
        }
    }

    /// Poll policy derived from this configuration; `max_attempts == 0`
    /// means unbounded.
    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            interval_ms: self.poll_interval_ms,
            max_attempts: (self.max_attempts > 0).then_some(self.max_attempts),
        }
    }
}
