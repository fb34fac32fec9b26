//! Configuration management for the course assistant.
//!
//! Configuration can be set via environment variables:
//! - `ANTHROPIC_API_KEY` - Required. API key for the completion provider.
//! - `ANTHROPIC_MODEL` - Optional. Model identifier. Defaults to `claude-sonnet-4-20250514`.
//! - `ANTHROPIC_BASE_URL` - Optional. Provider base URL. Defaults to `https://api.anthropic.com`.
//! - `MAX_TOKENS` - Optional. Completion token limit per call. Defaults to `800`.
//! - `MAX_RESULTS` - Optional. Search matches returned per tool call. Defaults to `5`.
//! - `MAX_HISTORY` - Optional. Exchanges remembered per session. Defaults to `2`.
//! - `COURSE_CATALOG_PATH` - Optional. JSON catalog loaded at startup.
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `8000`.

use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Completion provider settings.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Provider API key
    pub api_key: String,

    /// Model identifier sent with every request
    pub model: String,

    /// Base URL, without the `/v1/messages` suffix
    pub base_url: String,

    /// Token limit per completion call
    pub max_tokens: u32,
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Completion provider settings
    pub provider: ProviderConfig,

    /// Maximum search matches per content search
    pub max_results: usize,

    /// Number of user/assistant exchanges kept per session
    pub max_history: usize,

    /// Optional catalog file to load on startup
    pub catalog_path: Option<PathBuf>,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `ANTHROPIC_API_KEY` is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("ANTHROPIC_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("ANTHROPIC_API_KEY".to_string()))?;

        let provider = ProviderConfig {
            api_key,
            model: lookup("ANTHROPIC_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: lookup("ANTHROPIC_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            max_tokens: parse_or(&lookup, "MAX_TOKENS", 800)?,
        };

        Ok(Self {
            provider,
            max_results: parse_or(&lookup, "MAX_RESULTS", 5)?,
            max_history: parse_or(&lookup, "MAX_HISTORY", 2)?,
            catalog_path: lookup("COURSE_CATALOG_PATH").map(PathBuf::from),
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&lookup, "PORT", 8000)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_api_key_is_set() {
        let config = Config::from_lookup(lookup_from(&[("ANTHROPIC_API_KEY", "test-key-123")]))
            .expect("config loads");

        assert_eq!(config.provider.api_key, "test-key-123");
        assert_eq!(config.provider.model, DEFAULT_MODEL);
        assert_eq!(config.provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.provider.max_tokens, 800);
        assert_eq!(config.max_results, 5);
        assert_eq!(config.max_history, 2);
        assert_eq!(config.port, 8000);
        assert!(config.catalog_path.is_none());
    }

    #[test]
    fn missing_or_blank_api_key_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "ANTHROPIC_API_KEY"));

        let err = Config::from_lookup(lookup_from(&[("ANTHROPIC_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(_)));
    }

    #[test]
    fn numeric_overrides_are_parsed_and_validated() {
        let config = Config::from_lookup(lookup_from(&[
            ("ANTHROPIC_API_KEY", "k"),
            ("MAX_RESULTS", "3"),
            ("PORT", "9001"),
            ("ANTHROPIC_BASE_URL", "http://localhost:4000/"),
        ]))
        .expect("config loads");
        assert_eq!(config.max_results, 3);
        assert_eq!(config.port, 9001);
        assert_eq!(config.provider.base_url, "http://localhost:4000");

        let err = Config::from_lookup(lookup_from(&[
            ("ANTHROPIC_API_KEY", "k"),
            ("PORT", "not-a-port"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref k, _) if k == "PORT"));
    }
}
