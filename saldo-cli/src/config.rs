use anyhow::{Context, Result};
use saldo_advisor::{LlmConfig, Provider, DEFAULT_TIME_PERIOD};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::state::{ensure_saldo_home, saldo_home};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub advisor: AdvisorSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorSection {
    pub provider: Provider,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    /// Sent as `timePeriod` with every advice request.
    pub time_period: String,
}

impl Default for AdvisorSection {
    fn default() -> Self {
        Self {
            provider: Provider::OpenAI,
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com".to_string(),
            temperature: 0.4,
            max_tokens: 800,
            timeout_secs: 30,
            api_key_env: "OPENAI_API_KEY".to_string(),
            time_period: DEFAULT_TIME_PERIOD.to_string(),
        }
    }
}

impl AdvisorSection {
    /// Resolve into a gateway config, reading the key from the environment.
    pub fn llm_config(&self) -> Result<LlmConfig> {
        let api_key = std::env::var(&self.api_key_env).with_context(|| {
            format!(
                "advice needs an API key in ${} (see `saldo config show`)",
                self.api_key_env
            )
        })?;
        Ok(LlmConfig {
            provider: self.provider,
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            api_key,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(saldo_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(cfg: &Config) -> Result<PathBuf> {
    let p = ensure_saldo_home()?.join("config.toml");
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(p)
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let written = save_config(&Config::default())?;
    println!("Wrote {}", written.display());
    Ok(())
}
