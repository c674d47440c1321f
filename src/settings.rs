use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{PennyError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub data_dir: String,
    #[serde(default = "default_model")]
    pub openai_model: String,
    #[serde(default = "default_base_url")]
    pub openai_base_url: String,
}

fn default_model() -> String {
    "gpt-4-turbo-preview".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir().to_string_lossy().to_string(),
            openai_model: default_model(),
            openai_base_url: default_base_url(),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("penny")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("penny")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| PennyError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

pub fn settings_file_exists() -> bool {
    settings_path().exists()
}

pub fn get_data_dir() -> PathBuf {
    PathBuf::from(&load_settings().data_dir)
}

/// Everything the OpenAI client needs. The key comes from the environment
/// only; model and base URL come from settings, with env overrides.
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Resolve the AI configuration, or report which pieces are missing.
/// Commands that talk to the AI call this before touching any input file.
pub fn require_ai_config() -> Result<AiConfig> {
    let settings = load_settings();
    let mut missing = Vec::new();

    let api_key = match env_nonempty("OPENAI_API_KEY") {
        Some(key) => key,
        None => {
            missing.push("OPENAI_API_KEY".to_string());
            String::new()
        }
    };

    if !missing.is_empty() {
        return Err(PennyError::ConfigMissing(missing));
    }

    Ok(AiConfig {
        api_key,
        model: env_nonempty("OPENAI_MODEL").unwrap_or(settings.openai_model),
        base_url: env_nonempty("OPENAI_BASE_URL").unwrap_or(settings.openai_base_url),
    })
}
