// Configuration management

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::models::AppConfig;

pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
        .join("lexchat");

    fs::create_dir_all(&config_dir).context("Failed to create config directory")?;

    Ok(config_dir)
}

pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.toml"))
}

/// Load the config file, writing defaults on first run.
pub fn load_config() -> Result<AppConfig> {
    let config_path = get_config_path()?;

    if !config_path.exists() {
        let default_config = AppConfig::default();
        save_config(&default_config)?;
        return Ok(default_config);
    }

    let contents = fs::read_to_string(&config_path).context("Failed to read config file")?;

    let config: AppConfig = toml::from_str(&contents).context("Failed to parse config file")?;

    Ok(config)
}

pub fn save_config(config: &AppConfig) -> Result<()> {
    let config_path = get_config_path()?;

    let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;

    fs::write(&config_path, contents).context("Failed to write config file")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_roundtrip() {
        let config = AppConfig {
            api_base_url: "http://research.example:8000".to_string(),
            ..Default::default()
        };

        let serialized = toml::to_string(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&serialized).unwrap();

        assert_eq!(deserialized.api_base_url, "http://research.example:8000");
        assert_eq!(deserialized.request_timeout, 60);
    }

    #[test]
    fn test_missing_timeout_uses_default() {
        let toml_snippet = r#"
            api_base_url = "http://localhost:8000"

            [theme]
            user_message_color = "cyan"
            bot_message_color = "green"
            status_message_color = "darkgray"
            border_color = "cyan"
        "#;

        let config: AppConfig = toml::from_str(toml_snippet).unwrap();
        assert_eq!(config.request_timeout, 60);
    }
}
