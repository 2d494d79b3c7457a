//! Configuration system (layered: defaults < config file < env).

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::TravelError;

pub const DEFAULT_MODEL: &str = "gpt-5";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TEMPERATURE: f64 = 0.2;
pub const DEFAULT_MAX_STEPS: usize = 8;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Resolved configuration for a planning run.
#[derive(Clone, PartialEq)]
pub struct TravelConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub max_steps: usize,
    pub request_timeout_secs: u64,
}

impl fmt::Debug for TravelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TravelConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| ".."))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("max_steps", &self.max_steps)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Default for TravelConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: Some(DEFAULT_TEMPERATURE),
            max_tokens: None,
            max_steps: DEFAULT_MAX_STEPS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// On-disk config file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    temperature: Option<f64>,
    max_tokens: Option<u32>,
    max_steps: Option<usize>,
    request_timeout_secs: Option<u64>,
}

impl TravelConfig {
    /// Load configuration.
    ///
    /// Resolution order (later wins):
    /// 1. Built-in defaults
    /// 2. The TOML file at `path`, or [`default_config_path`] when it exists
    /// 3. Environment variables (a `.env` file is honored)
    pub fn load(path: Option<&Path>) -> Result<Self, TravelError> {
        let _ = dotenvy::dotenv();
        let mut config = Self::default();

        match path {
            Some(p) => config.apply_file(p)?,
            None => {
                if let Some(p) = default_config_path().filter(|p| p.is_file()) {
                    config.apply_file(&p)?;
                }
            }
        }

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn apply_file(&mut self, path: &Path) -> Result<(), TravelError> {
        let raw = std::fs::read_to_string(path)?;
        let file: ConfigFile = toml::from_str(&raw).map_err(|e| {
            TravelError::Configuration(format!("{}: {e}", path.display()))
        })?;

        if file.api_key.is_some() {
            self.api_key = file.api_key;
        }
        if let Some(url) = file.base_url {
            self.base_url = url;
        }
        if let Some(model) = file.model {
            self.model = model;
        }
        if file.temperature.is_some() {
            self.temperature = file.temperature;
        }
        if file.max_tokens.is_some() {
            self.max_tokens = file.max_tokens;
        }
        if let Some(steps) = file.max_steps {
            self.max_steps = steps;
        }
        if let Some(secs) = file.request_timeout_secs {
            self.request_timeout_secs = secs;
        }
        self.validate()
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), TravelError> {
        if let Some(key) = var("OPENAI_API_KEY").filter(|k| !k.is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(url) = var("OPENAI_BASE_URL") {
            self.base_url = url;
        }
        if let Some(model) = var("TRIPWEAVER_MODEL") {
            self.model = model;
        }
        if let Some(raw) = var("TRIPWEAVER_TEMPERATURE") {
            self.temperature = Some(parse_env("TRIPWEAVER_TEMPERATURE", &raw)?);
        }
        if let Some(raw) = var("TRIPWEAVER_MAX_STEPS") {
            self.max_steps = parse_env("TRIPWEAVER_MAX_STEPS", &raw)?;
        }
        self.validate()
    }

    /// Reject settings the planner cannot run with.
    pub fn validate(&self) -> Result<(), TravelError> {
        if self.max_steps == 0 {
            return Err(TravelError::Configuration(
                "max_steps must be at least 1".into(),
            ));
        }
        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(TravelError::Configuration(format!(
                    "temperature must be within 0.0..=2.0, got {t}"
                )));
            }
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, TravelError> {
    raw.trim()
        .parse()
        .map_err(|_| TravelError::Configuration(format!("{key} has an invalid value: {raw}")))
}

/// Platform config location, e.g. `~/.config/tripweaver/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "tripweaver")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
