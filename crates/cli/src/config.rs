//! Configuration loading and management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub rescue_groups: RescueGroupsSection,

    #[serde(default)]
    pub bluesky: BlueskySection,

    #[serde(default)]
    pub instagram: InstagramSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescueGroupsSection {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_rescue_groups_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_postal_code")]
    pub postal_code: String,

    #[serde(default = "default_radius_miles")]
    pub radius_miles: u32,

    #[serde(default = "default_species")]
    pub species: String,

    #[serde(default = "default_limit")]
    pub limit: u32,

    #[serde(default = "default_location_label")]
    pub location_label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlueskySection {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_bluesky_handle_env")]
    pub handle_env: String,

    #[serde(default = "default_bluesky_handle_fallback_env")]
    pub handle_fallback_env: String,

    #[serde(default = "default_bluesky_password_env")]
    pub password_env: String,

    #[serde(default = "default_bluesky_password_fallback_env")]
    pub password_fallback_env: String,

    #[serde(default = "default_bluesky_max_chars")]
    pub max_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstagramSection {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_instagram_handle_env")]
    pub handle_env: String,

    #[serde(default = "default_instagram_password_env")]
    pub password_env: String,
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_rescue_groups_api_key_env() -> String {
    "CUTEPETSBOSTON_RESCUEGROUPS_API_KEY".to_string()
}

fn default_postal_code() -> String {
    "02108".to_string()
}

fn default_radius_miles() -> u32 {
    50
}

fn default_species() -> String {
    "dog".to_string()
}

fn default_limit() -> u32 {
    25
}

fn default_location_label() -> String {
    "Boston, MA".to_string()
}

fn default_bluesky_handle_env() -> String {
    "BLUESKY_HANDLE".to_string()
}

fn default_bluesky_handle_fallback_env() -> String {
    "BLUESKY_TEST_HANDLE".to_string()
}

fn default_bluesky_password_env() -> String {
    "BLUESKY_PASSWORD".to_string()
}

fn default_bluesky_password_fallback_env() -> String {
    "BLUESKY_TEST_PASSWORD".to_string()
}

fn default_bluesky_max_chars() -> usize {
    300
}

fn default_instagram_handle_env() -> String {
    "INSTAGRAM_HANDLE".to_string()
}

fn default_instagram_password_env() -> String {
    "INSTAGRAM_PASSWORD".to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for RescueGroupsSection {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            api_key_env: default_rescue_groups_api_key_env(),
            postal_code: default_postal_code(),
            radius_miles: default_radius_miles(),
            species: default_species(),
            limit: default_limit(),
            location_label: default_location_label(),
        }
    }
}

impl Default for BlueskySection {
    fn default() -> Self {
        Self {
            enabled: false,
            handle_env: default_bluesky_handle_env(),
            handle_fallback_env: default_bluesky_handle_fallback_env(),
            password_env: default_bluesky_password_env(),
            password_fallback_env: default_bluesky_password_fallback_env(),
            max_chars: default_bluesky_max_chars(),
        }
    }
}

impl Default for InstagramSection {
    fn default() -> Self {
        Self {
            enabled: false,
            handle_env: default_instagram_handle_env(),
            password_env: default_instagram_password_env(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        // Try default config path if none specified
        let default_path = PathBuf::from("./config.toml");
        let path = config_path.unwrap_or(&default_path);

        if path.exists() {
            builder = builder.add_source(config::File::from(path));
        } else if config_path.is_some() {
            // User specified a path that doesn't exist
            anyhow::bail!("Config file not found: {}", path.display());
        }

        // Add environment variable overrides
        builder = builder.add_source(
            config::Environment::with_prefix("CUTEPETS")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Generate example configuration as TOML string
    pub fn example_toml() -> String {
        r#"# cutepets configuration

[general]
log_level = "info"

[rescue_groups]
enabled = true
api_key_env = "CUTEPETSBOSTON_RESCUEGROUPS_API_KEY"
postal_code = "02108"
radius_miles = 50
species = "dog"  # dog, cat
limit = 25
location_label = "Boston, MA"

[bluesky]
enabled = false
handle_env = "BLUESKY_HANDLE"
handle_fallback_env = "BLUESKY_TEST_HANDLE"
password_env = "BLUESKY_PASSWORD"
password_fallback_env = "BLUESKY_TEST_PASSWORD"
max_chars = 300

[instagram]
enabled = false
handle_env = "INSTAGRAM_HANDLE"
password_env = "INSTAGRAM_PASSWORD"
"#
        .to_string()
    }
}
