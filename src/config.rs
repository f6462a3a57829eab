use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "drafter.yaml";
pub const MIN_DPI: u32 = 72;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub id: String,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub model: String,
    pub endpoint: String,
    pub api_key_env: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputsConfig {
    #[serde(default = "default_output_dir")]
    pub dir: String,
    #[serde(default)]
    pub artifacts_dir: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub dpi: u32,
}

fn default_output_dir() -> String {
    "./output".to_string()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            model: "gemini-2.5-flash".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key_env: "API_KEY".to_string(),
        }
    }
}

impl Default for OutputsConfig {
    fn default() -> Self {
        OutputsConfig { dir: default_output_dir(), artifacts_dir: None }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        // 1.5 × 72
        RenderConfig { dpi: 108 }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            id: "penetapan-drafter".to_string(),
            generator: GeneratorConfig::default(),
            outputs: OutputsConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read drafter.yaml: {0}")]
    Read(String),
    #[error("Failed to parse drafter.yaml: {0}")]
    Parse(String),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Read and validate a config file.
pub fn validate_config(path: &Path) -> Result<Config, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read(e.to_string()))?;
    let cfg: Config = serde_yaml::from_str(&raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Like [`validate_config`], but a missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Ok(Config::default());
    }
    validate_config(path)
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.id.trim().is_empty() {
            return Err(ConfigError::Invalid("missing id".into()));
        }
        if self.generator.model.trim().is_empty() {
            return Err(ConfigError::Invalid("missing generator.model".into()));
        }
        if self.generator.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid("missing generator.endpoint".into()));
        }
        if self.render.dpi < MIN_DPI {
            return Err(ConfigError::Invalid(format!("render.dpi must be at least {MIN_DPI}")));
        }
        Ok(())
    }

    pub fn output_dir(&self) -> &str {
        &self.outputs.dir
    }

    pub fn artifacts_dir(&self) -> Option<&Path> {
        self.outputs.artifacts_dir.as_deref().map(Path::new)
    }

    /// API key from the configured environment variable; empty when unset.
    pub fn api_key(&self) -> String {
        std::env::var(&self.generator.api_key_env).unwrap_or_default()
    }
}
