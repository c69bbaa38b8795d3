use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Environment variable holding the chat-completion API key.
pub const API_KEY_ENV: &str = "DAYPLAN_API_KEY";

/// A job category offered every morning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobTemplate {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    pub model: String,
    pub base_url: String,
    /// Low temperature keeps plan and summary generation focused.
    pub temperature_generate: f64,
    /// Higher temperature for open-ended chat.
    pub temperature_chat: f64,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            model: "deepseek-chat".to_string(),
            base_url: "https://api.deepseek.com".to_string(),
            temperature_generate: 0.0,
            temperature_chat: 0.7,
            max_tokens: 2000,
            timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub jobs: Vec<JobTemplate>,
    #[serde(default)]
    pub ai: AiSettings,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Reads the API key from the environment. The key never lives in the
    /// config file.
    pub fn api_key() -> Result<String> {
        match std::env::var(API_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => bail!("{API_KEY_ENV} is not set. Export your API key first."),
        }
    }
}

/// Starter config written by `dp init`.
pub fn starter_config() -> &'static str {
    r#"# Job categories offered each morning. Add, remove, or rename freely.
[[jobs]]
name = "Work"
description = "Professional tasks and deep work"

[[jobs]]
name = "Personal"
description = "Errands, chores, and personal projects"

[[jobs]]
name = "Health"
description = "Exercise, meals, and rest"

[ai]
model = "deepseek-chat"
base_url = "https://api.deepseek.com"
temperature_generate = 0.0
temperature_chat = 0.7
max_tokens = 2000
timeout_secs = 120
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn loads_jobs_and_ai_settings() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
[[jobs]]
name = "Work"
description = "Deep work"

[ai]
model = "test-model"
max_tokens = 512
"#,
        );

        let config = Config::load(&path).unwrap();
        assert_eq!(config.jobs.len(), 1);
        assert_eq!(config.jobs[0].name, "Work");
        assert_eq!(config.ai.model, "test-model");
        assert_eq!(config.ai.max_tokens, 512);
        // Unspecified settings fall back to defaults.
        assert_eq!(config.ai.temperature_chat, 0.7);
    }

    #[test]
    fn empty_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "");
        let config = Config::load(&path).unwrap();
        assert!(config.jobs.is_empty());
        assert_eq!(config.ai.model, "deepseek-chat");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load(&dir.path().join("absent.toml")).is_err());
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[[jobs]\nname = broken");
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn starter_config_parses() {
        let config: Config = toml::from_str(starter_config()).unwrap();
        assert_eq!(config.jobs.len(), 3);
        assert_eq!(config.ai.temperature_generate, 0.0);
    }
}
