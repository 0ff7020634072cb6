//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Secrets (bot tokens) are referenced by env-var name in the config and
//! resolved at runtime via `std::env::var`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub picks: PicksConfig,
    pub ingest: IngestConfig,
    pub alerts: AlertsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PathsConfig {
    /// Canonical per-game draw files live here.
    pub raw_dir: PathBuf,
    /// Generated daily pick files live here.
    pub generated_dir: PathBuf,
    /// Evaluation reports live here.
    pub reports_dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PicksConfig {
    pub lines_per_game: usize,
    /// Optional fixed RNG seed for reproducible runs. Unset → seeded from
    /// the target date so daily runs stay deterministic.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IngestConfig {
    pub powerball_url: String,
    pub megamillions_url: String,
    /// Max rows requested from the upstream feed per fetch.
    pub fetch_limit: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AlertsConfig {
    pub telegram_enabled: bool,
    pub telegram_bot_token_env: Option<String>,
    pub telegram_chat_id_env: Option<String>,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }

    /// Resolve an environment variable name to its value.
    /// Useful for loading secrets referenced in the config.
    pub fn resolve_env(env_name: &str) -> Result<String> {
        std::env::var(env_name)
            .with_context(|| format!("Environment variable not set: {env_name}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml_src = r#"
            [paths]
            raw_dir = "data/raw"
            generated_dir = "data/generated"
            reports_dir = "reports/daily"

            [picks]
            lines_per_game = 5

            [ingest]
            powerball_url = "https://data.ny.gov/resource/d6yy-54nr.json"
            megamillions_url = "https://data.ny.gov/resource/5xaw-6ayf.json"
            fetch_limit = 2000

            [alerts]
            telegram_enabled = false
        "#;
        let cfg: AppConfig = toml::from_str(toml_src).unwrap();
        assert_eq!(cfg.picks.lines_per_game, 5);
        assert_eq!(cfg.picks.seed, None);
        assert_eq!(cfg.ingest.fetch_limit, 2000);
        assert!(!cfg.alerts.telegram_enabled);
        assert_eq!(cfg.paths.reports_dir, PathBuf::from("reports/daily"));
    }

    #[test]
    fn test_load_config_file() {
        // This test requires config.toml to be in the working directory.
        let result = AppConfig::load("config.toml");
        if let Ok(cfg) = result {
            assert!(cfg.picks.lines_per_game > 0);
            assert!(cfg.ingest.powerball_url.starts_with("https://"));
        }
        // If config.toml isn't found, that's acceptable in some test environments
    }
}
