use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

pub const CONFIG_FILE: &str = "fbi_profile";
pub const ENV_PREFIX: &str = "FBI_PROFILE";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Origin used to absolutize relative image paths.
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub base_backoff_ms: u64,
    pub aged_image: AgedImageSettings,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AgedImageSettings {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "https://www.fbi.gov".into(),
            user_agent: concat!("fbi_profile/", env!("CARGO_PKG_VERSION")).into(),
            timeout_secs: 30,
            max_retries: 3,
            base_backoff_ms: 2000,
            aged_image: AgedImageSettings::default(),
        }
    }
}

impl Settings {
    /// Defaults, then `fbi_profile.toml` if present, then `FBI_PROFILE__*` env vars.
    pub fn load() -> Result<Self> {
        Self::from_builder(
            Config::builder()
                .add_source(File::with_name(CONFIG_FILE).required(false))
                .add_source(Environment::with_prefix(ENV_PREFIX).separator("__")),
        )
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self> {
        builder
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
