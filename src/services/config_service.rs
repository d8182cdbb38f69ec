use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub server_url: Option<String>,
}

pub fn get_app_data_dir() -> Result<PathBuf, String> {
    let data_dir = dirs::data_dir()
        .ok_or("Could not find data directory")?
        .join("onlyjobless");

    if !data_dir.exists() {
        fs::create_dir_all(&data_dir).map_err(|e| e.to_string())?;
    }

    Ok(data_dir)
}

fn get_config_path() -> Result<PathBuf, String> {
    Ok(get_app_data_dir()?.join("config.json"))
}

fn load_config_from(config_path: &Path) -> Result<Config, String> {
    if !config_path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(config_path)
        .map_err(|e| format!("Failed to read config: {}", e))?;
    serde_json::from_str(&content).map_err(|e| format!("Failed to parse config: {}", e))
}

pub fn load_config() -> Result<Config, String> {
    load_config_from(&get_config_path()?)
}

fn save_config_to(config: &Config, config_path: &Path) -> Result<(), String> {
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;
    fs::write(config_path, content).map_err(|e| format!("Failed to write config: {}", e))?;
    Ok(())
}

pub fn save_config(config: &Config) -> Result<(), String> {
    save_config_to(config, &get_config_path()?)
}

/// The backend base URL, normalized without a trailing slash. Falls back to
/// the default when nothing is configured or the file is unreadable.
pub fn server_url() -> String {
    let configured = load_config().ok().and_then(|c| c.server_url);
    normalize_server_url(configured.as_deref())
}

fn normalize_server_url(configured: Option<&str>) -> String {
    configured
        .map(|url| url.trim_end_matches('/'))
        .filter(|url| !url.is_empty())
        .unwrap_or(DEFAULT_SERVER_URL)
        .to_string()
}

pub fn get_server_url() -> Result<Option<String>, String> {
    Ok(load_config()?.server_url)
}

pub fn set_server_url(url: &str) -> Result<(), String> {
    url::Url::parse(url).map_err(|e| format!("Invalid server URL: {}", e))?;

    let mut config = load_config().unwrap_or_default();
    config.server_url = Some(url.to_string());
    save_config(&config)
}

pub fn get_full_config() -> Result<Config, String> {
    load_config()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_yields_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn config_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = Config {
            server_url: Some("https://api.example.com".to_string()),
        };
        save_config_to(&config, &path).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), config);
    }

    #[test]
    fn server_url_defaults_and_normalizes() {
        assert_eq!(normalize_server_url(None), DEFAULT_SERVER_URL);
        assert_eq!(normalize_server_url(Some("")), DEFAULT_SERVER_URL);
        assert_eq!(
            normalize_server_url(Some("https://api.example.com/")),
            "https://api.example.com"
        );
        assert_eq!(
            normalize_server_url(Some("http://127.0.0.1:8000")),
            "http://127.0.0.1:8000"
        );
    }

    #[test]
    fn set_server_url_rejects_garbage() {
        assert!(url::Url::parse("not a url").is_err());
    }
}
