//! Action Planner configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Project-local config file name
const LOCAL_CONFIG: &str = ".action-planner.yml";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Per-stage generation settings
    pub stages: StagesConfig,

    /// Outbound mail configuration
    pub smtp: SmtpConfig,
}

impl Config {
    /// Load configuration with fallback chain, then apply environment overrides
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let mut config = Self::load_files(config_path)?;
        config.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Read only the log level, before logging is set up
    ///
    /// Errors are swallowed: the full load later reports them properly.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        Self::candidate_paths(config_path)
            .into_iter()
            .find(|p| p.exists())
            .and_then(|p| fs::read_to_string(p).ok())
            .and_then(|content| serde_yaml::from_str::<Self>(&content).ok())
            .and_then(|c| c.log_level)
    }

    fn load_files(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, it must load
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        for candidate in Self::candidate_paths(None) {
            if candidate.exists() {
                match Self::load_from_file(&candidate) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", candidate.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Config files in lookup order
    fn candidate_paths(config_path: Option<&PathBuf>) -> Vec<PathBuf> {
        if let Some(path) = config_path {
            return vec![path.clone()];
        }
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("action-planner").join("action-planner.yml"));
        }
        paths
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Apply environment overrides (`GROQ_MODEL`, `SMTP_HOST`, `SMTP_PORT`, `SMTP_USER`)
    ///
    /// Takes a lookup function so callers and tests control the environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(model) = non_empty("GROQ_MODEL") {
            tracing::debug!(%model, "apply_env_overrides: model from GROQ_MODEL");
            self.llm.model = model;
        }
        if let Some(host) = non_empty("SMTP_HOST") {
            self.smtp.host = host;
        }
        if let Some(port) = non_empty("SMTP_PORT") {
            match port.trim().parse::<u16>() {
                Ok(p) => self.smtp.port = p,
                Err(_) => tracing::warn!(%port, "Ignoring invalid SMTP_PORT"),
            }
        }
        if let Some(user) = non_empty("SMTP_USER") {
            self.smtp.user = user;
        }
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name ("groq" or "openai")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL (without the `/v1/...` suffix)
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Upper bound on tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Transparent client-side retries for 5xx/network faults
    #[serde(rename = "max-retries")]
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "groq".to_string(),
            model: "llama-3.1-70b-versatile".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            base_url: "https://api.groq.com/openai".to_string(),
            max_tokens: 8192,
            timeout_ms: 120_000,
            max_retries: 0,
        }
    }
}

/// Generation settings for one stage
#[derive(Debug, Clone, Serialize)]
pub struct StageConfig {
    /// Sampling temperature
    pub temperature: f32,

    /// Max tokens for this stage's response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,
}

impl StageConfig {
    fn with_temperature(temperature: f32) -> Self {
        Self {
            temperature,
            max_tokens: 4096,
        }
    }
}

/// Per-stage generation settings
///
/// Each stage falls back to its own defaults field by field, so a partial
/// stage section never borrows another stage's temperature.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "StagesFile")]
pub struct StagesConfig {
    pub research: StageConfig,
    pub plan: StageConfig,
    pub assets: StageConfig,
}

impl Default for StagesConfig {
    fn default() -> Self {
        Self {
            research: StageConfig::with_temperature(0.2),
            plan: StageConfig::with_temperature(0.2),
            assets: StageConfig::with_temperature(0.3),
        }
    }
}

/// `stages` section as written in the config file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StagesFile {
    research: StageFile,
    plan: StageFile,
    assets: StageFile,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StageFile {
    temperature: Option<f32>,
    #[serde(rename = "max-tokens")]
    max_tokens: Option<u32>,
}

impl StageFile {
    fn over(self, base: StageConfig) -> StageConfig {
        StageConfig {
            temperature: self.temperature.unwrap_or(base.temperature),
            max_tokens: self.max_tokens.unwrap_or(base.max_tokens),
        }
    }
}

impl From<StagesFile> for StagesConfig {
    fn from(file: StagesFile) -> Self {
        let defaults = Self::default();
        Self {
            research: file.research.over(defaults.research),
            plan: file.plan.over(defaults.plan),
            assets: file.assets.over(defaults.assets),
        }
    }
}

/// Outbound mail configuration (implicit TLS relay)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    /// Relay host
    pub host: String,

    /// Relay port; 0 means unset
    pub port: u16,

    /// Login user, also the fallback sender
    pub user: String,

    /// Environment variable containing the password
    #[serde(rename = "password-env")]
    pub password_env: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 0,
            user: String::new(),
            password_env: "SMTP_PASS".to_string(),
        }
    }
}

impl SmtpConfig {
    /// Read the password from the configured environment variable
    pub fn password(&self) -> Option<String> {
        std::env::var(&self.password_env).ok().filter(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.llm.provider, "groq");
        assert_eq!(config.llm.model, "llama-3.1-70b-versatile");
        assert_eq!(config.llm.max_retries, 0);
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_stage_defaults() {
        let stages = StagesConfig::default();
        assert!((stages.research.temperature - 0.2).abs() < f32::EPSILON);
        assert!((stages.plan.temperature - 0.2).abs() < f32::EPSILON);
        assert!((stages.assets.temperature - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn test_partial_stage_keeps_its_own_temperature() {
        let yaml = r#"
stages:
  assets:
    max-tokens: 1000
  plan:
    temperature: 0.5
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.stages.assets.max_tokens, 1000);
        assert!((config.stages.assets.temperature - 0.3).abs() < f32::EPSILON);
        assert!((config.stages.plan.temperature - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.stages.plan.max_tokens, 4096);
        assert!((config.stages.research.temperature - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
log-level: debug
llm:
  provider: openai
  model: gpt-4o-mini
  api-key-env: MY_API_KEY
  base-url: https://api.example.com
  max-tokens: 2048
  timeout-ms: 60000
  max-retries: 2

stages:
  assets:
    temperature: 0.7

smtp:
  host: smtp.example.com
  port: 465
  user: me@example.com
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.api_key_env, "MY_API_KEY");
        assert_eq!(config.llm.max_tokens, 2048);
        assert_eq!(config.llm.max_retries, 2);
        assert!((config.stages.assets.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.stages.assets.max_tokens, 4096);
        assert_eq!(config.smtp.port, 465);
        assert_eq!(config.smtp.password_env, "SMTP_PASS");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
llm:
  model: llama-3.1-8b-instant
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.llm.model, "llama-3.1-8b-instant");
        assert_eq!(config.llm.provider, "groq");
        assert_eq!(config.llm.api_key_env, "GROQ_API_KEY");
        assert!((config.stages.research.temperature - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("GROQ_MODEL", "deepseek-r1-distill-llama-70b"),
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_PORT", "465"),
            ("SMTP_USER", "bot@example.com"),
        ]);

        let mut config = Config::default();
        config.apply_env_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.llm.model, "deepseek-r1-distill-llama-70b");
        assert_eq!(config.smtp.host, "smtp.example.com");
        assert_eq!(config.smtp.port, 465);
        assert_eq!(config.smtp.user, "bot@example.com");
    }

    #[test]
    fn test_env_overrides_ignore_blank_and_invalid() {
        let env: HashMap<&str, &str> = HashMap::from([("GROQ_MODEL", "  "), ("SMTP_PORT", "not-a-port")]);

        let mut config = Config::default();
        config.apply_env_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.llm.model, "llama-3.1-70b-versatile");
        assert_eq!(config.smtp.port, 0);
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("ap.yml");
        std::fs::write(&path, "log-level: warn\nllm:\n  model: custom\n").unwrap();

        let config = Config::load_files(Some(&path)).unwrap();
        assert_eq!(config.llm.model, "custom");
        assert_eq!(Config::load_log_level(Some(&path)).as_deref(), Some("warn"));
    }

    #[test]
    fn test_load_explicit_missing_file_errors() {
        let path = PathBuf::from("/nonexistent/action-planner.yml");
        assert!(Config::load_files(Some(&path)).is_err());
    }
}
