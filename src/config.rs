use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{Result, ScraperError};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub losca_city_planning: CityPlanningConfig,
    pub losca_health_commission: HealthCommissionConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: format!("city_scrapers/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CityPlanningConfig {
    /// Calendar year of meetings to request
    pub year: i32,
}

impl Default for CityPlanningConfig {
    fn default() -> Self {
        Self { year: 2024 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HealthCommissionConfig {
    pub year: i32,
    pub committee_id: u32,
}

impl Default for HealthCommissionConfig {
    fn default() -> Self {
        Self {
            year: 2024,
            committee_id: 6,
        }
    }
}

impl Config {
    /// Load `config.toml` from the working directory, falling back to defaults
    /// when the file does not exist.
    pub fn load() -> Result<Self> {
        let path = Path::new(DEFAULT_CONFIG_PATH);
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(path).map_err(|e| {
            ScraperError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    }
}
