use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};

use crate::gemini::DEFAULT_MODEL;
use crate::i18n::Language;

/// Environment variables checked for an API key, in priority order
const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub language: Language,
    /// Ground chat and drafting answers with web search
    pub google_search: bool,
    pub base_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            language: Language::default(),
            google_search: true,
            base_url: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    /// The API key from the environment if set, otherwise from the file
    pub fn resolved_api_key(&self) -> Option<String> {
        self.lookup_api_key(|var| std::env::var(var).ok()).map(|(key, _)| key)
    }

    /// Where the key came from: "env", "config", or None
    pub fn key_source(&self) -> Option<&'static str> {
        self.lookup_api_key(|var| std::env::var(var).ok()).map(|(_, source)| source)
    }

    /// First non-blank key from `env`, in `API_KEY_VARS` order, then the file
    fn lookup_api_key(&self, env: impl Fn(&str) -> Option<String>) -> Option<(String, &'static str)> {
        let non_blank = |k: &String| !k.trim().is_empty();
        API_KEY_VARS
            .iter()
            .find_map(|var| env(var).filter(non_blank))
            .map(|key| (key, "env"))
            .or_else(|| self.api_key.clone().filter(non_blank).map(|key| (key, "config")))
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("ai-lawyer").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.model, DEFAULT_MODEL);
        assert!(config.google_search);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            api_key: Some("k".into()),
            language: Language::Ko,
            google_search: false,
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "language": "en" }"#).unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.language, Language::En);
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_blank_env_key_does_not_hide_later_one() {
        let config = Config {
            api_key: Some("stored".into()),
            ..Config::default()
        };
        let env = |var: &str| match var {
            "GEMINI_API_KEY" => Some(String::new()),
            "API_KEY" => Some("real-key".to_string()),
            _ => None,
        };
        assert_eq!(config.lookup_api_key(env), Some(("real-key".to_string(), "env")));
    }

    #[test]
    fn test_blank_env_keys_fall_back_to_file() {
        let config = Config {
            api_key: Some("stored".into()),
            ..Config::default()
        };
        let env = |_: &str| Some("  ".to_string());
        assert_eq!(config.lookup_api_key(env), Some(("stored".to_string(), "config")));

        let empty = Config::default();
        assert_eq!(empty.lookup_api_key(|_| None), None);
    }
}
