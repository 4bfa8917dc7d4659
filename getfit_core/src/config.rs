//! Configuration file support for GetFit.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/getfit/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub rewards: RewardsConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl DataConfig {
    pub fn stats_dir(&self) -> PathBuf {
        self.data_dir.join("stats")
    }

    pub fn profiles_dir(&self) -> PathBuf {
        self.data_dir.join("profiles")
    }

    pub fn menus_dir(&self) -> PathBuf {
        self.data_dir.join("menus")
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join("exercises.csv")
    }
}

/// Default identity used when none is given on the command line
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct SessionConfig {
    #[serde(default)]
    pub user: Option<String>,
}

/// Points awarded for healthy behaviour
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RewardsConfig {
    #[serde(default = "default_check_in_points")]
    pub check_in_points: u32,

    #[serde(default = "default_calorie_goal_points")]
    pub calorie_goal_points: u32,
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            check_in_points: default_check_in_points(),
            calorie_goal_points: default_calorie_goal_points(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("getfit")
}

fn default_check_in_points() -> u32 {
    20
}

fn default_calorie_goal_points() -> u32 {
    30
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
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("getfit").join("config.toml")
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
