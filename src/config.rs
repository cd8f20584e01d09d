use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constant;

#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct Configuration {
    #[serde(default)]
    pub authentication: Authentication,
    #[serde(default)]
    pub completion: Completion,
}
impl Configuration {
    const FILENAME: &str = "config.toml";

    /// Loads `config.toml` from the working directory, writing the defaults out
    /// first if it doesn't exist, then applies environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::load_from(Path::new(Self::FILENAME))?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn load_from(path: &Path) -> anyhow::Result<Self> {
        let config = if let Ok(file) = std::fs::read_to_string(path) {
            toml::from_str(&file).context("failed to load config")?
        } else {
            let config = Self::default();
            config.save(path)?;
            config
        };

        Ok(config)
    }

    fn save(&self, path: &Path) -> anyhow::Result<()> {
        Ok(std::fs::write(path, toml::to_string_pretty(self)?)?)
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(token) = var(constant::env::BOT_TOKEN).filter(|v| !v.is_empty()) {
            self.authentication.discord_token = Some(token);
        }
        if let Some(key) = var(constant::env::OPENAI_API_KEY).filter(|v| !v.is_empty()) {
            self.authentication.openai_api_key = Some(key);
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct Authentication {
    pub discord_token: Option<String>,
    pub openai_api_key: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Completion {
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub presence_penalty: f64,
    pub frequency_penalty: f64,
    /// Upper bound on a single completion request, including reading the body
    pub timeout_secs: u64,
}
impl Default for Completion {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-3.5-turbo-instruct".to_string(),
            max_tokens: 2500,
            temperature: 0.3,
            top_p: 0.3,
            presence_penalty: 0.0,
            frequency_penalty: 0.5,
            timeout_secs: 600,
        }
    }
}
