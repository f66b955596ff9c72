//! Main application configuration
//!
//! This module defines the top-level configuration of the ratings engine,
//! including environment variable loading, TOML file loading and validation.

use crate::config::rating::RatingConfig;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub data: DataSettings,
    pub ratings: RatingConfig,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Where season data lives and which season to rate
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Directory holding cached payloads and weekly snapshots
    pub cache_dir: PathBuf,
    /// Season year
    pub year: i32,
    /// Season type (regular, postseason, both)
    pub season_type: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "cfb-ratings".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("data/cache"),
            year: 2025,
            season_type: "both".to_string(),
        }
    }
}

impl DataSettings {
    /// Directory holding weekly snapshot files
    pub fn snapshot_dir(&self) -> PathBuf {
        self.cache_dir.join("snapshots")
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Self = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // Data settings
        if let Ok(dir) = env::var("CFB_CACHE_DIR") {
            self.data.cache_dir = PathBuf::from(dir);
        }
        if let Ok(year) = env::var("CFB_YEAR") {
            self.data.year = year
                .parse()
                .map_err(|_| anyhow!("Invalid CFB_YEAR value: {}", year))?;
        }
        if let Ok(season_type) = env::var("CFB_SEASON_TYPE") {
            self.data.season_type = season_type;
        }

        // Rating settings
        if let Ok(hfa) = env::var("CFB_HFA") {
            let hfa: f64 = hfa
                .parse()
                .map_err(|_| anyhow!("Invalid CFB_HFA value: {}", hfa))?;
            self.ratings.massey.home_field_advantage = hfa;
            self.ratings.elo.home_field_advantage = hfa;
        }
        if let Ok(prior) = env::var("CFB_COLLEY_PRIOR") {
            self.ratings.colley.prior_strength = prior
                .parse()
                .map_err(|_| anyhow!("Invalid CFB_COLLEY_PRIOR value: {}", prior))?;
        }
        if let Ok(lambda) = env::var("CFB_MASSEY_LAMBDA") {
            self.ratings.massey.ridge_lambda = lambda
                .parse()
                .map_err(|_| anyhow!("Invalid CFB_MASSEY_LAMBDA value: {}", lambda))?;
        }
        if let Ok(cap) = env::var("CFB_MASSEY_MAX_MARGIN") {
            self.ratings.massey.max_margin = cap
                .parse()
                .map_err(|_| anyhow!("Invalid CFB_MASSEY_MAX_MARGIN value: {}", cap))?;
        }
        if let Ok(k) = env::var("CFB_ELO_K") {
            self.ratings.elo.k_factor = k
                .parse()
                .map_err(|_| anyhow!("Invalid CFB_ELO_K value: {}", k))?;
        }
        if let Ok(regress) = env::var("CFB_ELO_REGRESS") {
            self.ratings.elo.regress_to_mean = regress
                .parse()
                .map_err(|_| anyhow!("Invalid CFB_ELO_REGRESS value: {}", regress))?;
        }
        if let Ok(init) = env::var("CFB_ELO_INIT") {
            self.ratings.elo.initial_rating = init
                .parse()
                .map_err(|_| anyhow!("Invalid CFB_ELO_INIT value: {}", init))?;
        }

        Ok(())
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    // Validate data settings
    if config.data.cache_dir.as_os_str().is_empty() {
        return Err(anyhow!("Cache directory cannot be empty"));
    }
    match config.data.season_type.as_str() {
        "regular" | "postseason" | "both" => {}
        _ => return Err(anyhow!("Invalid season type: {}", config.data.season_type)),
    }

    config.ratings.validate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.data.year, 2025);
        assert_eq!(config.data.snapshot_dir(), PathBuf::from("data/cache/snapshots"));
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut config = AppConfig::default();
        config.service.log_level = "loud".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_invalid_season_type_rejected() {
        let mut config = AppConfig::default();
        config.data.season_type = "spring".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_from_file_reads_partial_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [data]
            year = 2023
            season_type = "regular"

            [ratings.elo]
            k_factor = 32.0
            "#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.data.season_type, "regular");
        assert_eq!(config.ratings.elo.initial_rating, 1500.0);
        assert_eq!(config.service.name, "cfb-ratings");
    }

    #[test]
    fn test_from_file_rejects_invalid_ratings() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[ratings.hybrid]\ncolley_weight = nan").unwrap();
        assert!(AppConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn test_from_file_missing_file() {
        assert!(AppConfig::from_file(Path::new("/nonexistent/cfb.toml")).is_err());
    }
}
