//! Configuration file support for Vinyasa.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/vinyasa/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub suggestion: SuggestionConfig,

    #[serde(default)]
    pub repair: RepairConfig,

    #[serde(default)]
    pub advisory: AdvisoryConfig,
}

/// Pose catalog source configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    /// Optional JSON file replacing the built-in catalog
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Scoring parameters for the next-pose suggestion engine
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SuggestionConfig {
    /// Score given to the unfinished side of a bilateral pair
    #[serde(default = "default_bilateral_priority")]
    pub bilateral_priority: u32,

    /// Bonus added to counterpose edges after an intense stretch of practice
    #[serde(default = "default_counterpose_bonus")]
    pub counterpose_bonus: u32,

    /// Combined intensity of the last two poses above which the bonus applies
    #[serde(default = "default_recent_intensity_threshold")]
    pub recent_intensity_threshold: u32,

    /// Score given to level-matched poses pulled in when candidates run short
    #[serde(default = "default_backfill_score")]
    pub backfill_score: u32,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            bilateral_priority: default_bilateral_priority(),
            counterpose_bonus: default_counterpose_bonus(),
            recent_intensity_threshold: default_recent_intensity_threshold(),
            backfill_score: default_backfill_score(),
        }
    }
}

/// Parameters for the safer-alternative repairer
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RepairConfig {
    /// Pose inserted between risky pairs when rewriting a sequence
    #[serde(default = "default_rest_pose_id")]
    pub rest_pose_id: String,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            rest_pose_id: default_rest_pose_id(),
        }
    }
}

/// Advisory note service configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AdvisoryConfig {
    /// How long to wait for the advisory service before falling back
    #[serde(default = "default_advisory_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_advisory_timeout_ms(),
        }
    }
}

impl AdvisoryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

// Default value functions
fn default_bilateral_priority() -> u32 {
    1000
}

fn default_counterpose_bonus() -> u32 {
    50
}

fn default_recent_intensity_threshold() -> u32 {
    8
}

fn default_backfill_score() -> u32 {
    1
}

fn default_rest_pose_id() -> String {
    "child".into()
}

fn default_advisory_timeout_ms() -> u64 {
    5000
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME")
                .expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("vinyasa").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
