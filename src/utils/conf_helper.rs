use crate::models::info_model::InfoConfig;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::Level;

static CONFIG_CACHE: OnceLock<InfoConfig> = OnceLock::new();

const DEFAULT_CONFIG_FILE: &str = "trs-info.json";
const CONFIG_ENV: &str = "TRS_INFO_CONFIG";

fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Parses the config file. A missing default file means defaults; a missing file
/// named through the environment is an error.
pub fn load_config() -> Result<InfoConfig> {
    let file_path = config_path();
    if !file_path.exists() && std::env::var_os(CONFIG_ENV).is_none() {
        return Ok(InfoConfig::default());
    }

    let data = std::fs::read_to_string(&file_path)
        .with_context(|| format!("File read Error: {}", file_path.display()))?;
    parse_config(&data)
}

pub fn parse_config(data: &str) -> Result<InfoConfig> {
    let config: InfoConfig = serde_json::from_str(data).context("JSON Parse Error")?;
    if config.max_window_size == 0 {
        anyhow::bail!("max_window_size must be positive");
    }
    Ok(config)
}

pub fn init_config() -> Result<&'static InfoConfig> {
    if let Some(config) = CONFIG_CACHE.get() {
        return Ok(config);
    }
    let config = load_config()?;
    Ok(CONFIG_CACHE.get_or_init(|| config))
}

pub fn log_level(config: &InfoConfig) -> Level {
    Level::from_str(&config.log_level).unwrap_or(Level::INFO)
}
