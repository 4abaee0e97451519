//! Main application configuration
//!
//! This module defines the configuration for the command line tool, including
//! environment variable and TOML file loading and validation.

use crate::config::rating::{parse_var, RankingConfig};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub ranking: RankingConfig,
}

/// How the leaderboard is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format: {}", other)),
        }
    }
}

/// Tool-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Name used in log output
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub output: OutputFormat,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "puzzle-leaderboard".to_string(),
            log_level: "info".to_string(),
            output: OutputFormat::Table,
        }
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
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }
        if let Ok(output) = env::var("OUTPUT_FORMAT") {
            self.service.output = parse_var("OUTPUT_FORMAT", &output)?;
        }

        self.ranking.apply_env()
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.service.name.is_empty() {
        return Err(anyhow!("Service name cannot be empty"));
    }

    config.ranking.validate()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StatsMethod;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.service.log_level, "info");
        assert_eq!(config.service.output, OutputFormat::Table);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = AppConfig::default();
        config.service.log_level = "chatty".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_invalid_ranking_section() {
        let mut config = AppConfig::default();
        config.ranking.elo_k = -4.0;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("K-factor"));
    }

    #[test]
    fn test_parse_nested_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [service]
            log_level = "debug"
            output = "json"

            [ranking]
            stats_method = "average"
            x_is_seven = true
            "#,
        )
        .unwrap();

        assert_eq!(config.service.log_level, "debug");
        assert_eq!(config.service.output, OutputFormat::Json);
        assert_eq!(config.service.name, "puzzle-leaderboard");
        assert_eq!(config.ranking.stats_method, StatsMethod::Average);
        assert_eq!(config.ranking.max_score(), 7);
    }
}
