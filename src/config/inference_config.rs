//! Inference server configuration parsing from environment variables.
//!
//! This module handles the server location, the alias naming convention used by
//! the model registry, and the per-endpoint request timeouts.

use anyhow::{Context, Result};
use std::time::Duration;
use url::Url;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";
pub const DEFAULT_ALIAS_PREFIX: &str = "backtest_";
pub const DEFAULT_MODEL_ALIAS: &str = "backtest_20250531";

/// Timeouts applied to each remote call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InferenceTimeouts {
    pub standard: Duration,
    pub champion: Duration,
    pub connect: Duration,
}

impl Default for InferenceTimeouts {
    fn default() -> Self {
        Self {
            standard: Duration::from_secs(120),
            champion: Duration::from_secs(300),
            connect: Duration::from_secs(10),
        }
    }
}

/// Inference server environment configuration
#[derive(Debug, Clone)]
pub struct InferenceEnvConfig {
    pub base_url: Url,
    pub alias_prefix: String,
    pub default_alias: String,
    pub timeouts: InferenceTimeouts,
}

impl InferenceEnvConfig {
    /// Reads values through `lookup`; [`Config::from_env`](super::Config::from_env) passes the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url =
            lookup("INFERENCE_SERVER_URL").unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
        let base_url = Url::parse(raw_url.trim())
            .with_context(|| format!("Invalid INFERENCE_SERVER_URL: {}", raw_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("INFERENCE_SERVER_URL must be an http(s) base url: {}", raw_url);
        }

        let defaults = InferenceTimeouts::default();
        let timeouts = InferenceTimeouts {
            standard: parse_secs(&lookup, "INFERENCE_TIMEOUT_SECS", defaults.standard)?,
            champion: parse_secs(&lookup, "CHAMPION_TIMEOUT_SECS", defaults.champion)?,
            connect: parse_secs(&lookup, "CONNECT_TIMEOUT_SECS", defaults.connect)?,
        };

        Ok(Self {
            base_url,
            alias_prefix: lookup("MODEL_ALIAS_PREFIX")
                .unwrap_or_else(|| DEFAULT_ALIAS_PREFIX.to_string()),
            default_alias: lookup("DEFAULT_MODEL_ALIAS")
                .unwrap_or_else(|| DEFAULT_MODEL_ALIAS.to_string()),
            timeouts,
        })
    }
}

pub(crate) fn parse_secs<F>(lookup: &F, key: &str, default: Duration) -> Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .context(format!("Failed to parse {}", key)),
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
    fn test_inference_config_defaults() {
        let config = InferenceEnvConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:8000/");
        assert_eq!(config.alias_prefix, "backtest_");
        assert_eq!(config.default_alias, "backtest_20250531");
        assert_eq!(config.timeouts.standard, Duration::from_secs(120));
        assert_eq!(config.timeouts.champion, Duration::from_secs(300));
    }

    #[test]
    fn test_inference_config_overrides() {
        let config = InferenceEnvConfig::from_lookup(lookup_from(&[
            ("INFERENCE_SERVER_URL", "http://inference.internal:9000/api/"),
            ("MODEL_ALIAS_PREFIX", "bt-"),
            ("CHAMPION_TIMEOUT_SECS", "600"),
        ]))
        .unwrap();

        assert_eq!(config.base_url.host_str(), Some("inference.internal"));
        assert_eq!(config.alias_prefix, "bt-");
        assert_eq!(config.timeouts.champion, Duration::from_secs(600));
        assert_eq!(config.timeouts.standard, Duration::from_secs(120));
    }

    #[test]
    fn test_invalid_server_url_is_rejected() {
        let result =
            InferenceEnvConfig::from_lookup(lookup_from(&[("INFERENCE_SERVER_URL", "not a url")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        let result =
            InferenceEnvConfig::from_lookup(lookup_from(&[("INFERENCE_TIMEOUT_SECS", "soon")]));
        let err = result.unwrap_err();
        assert!(err.to_string().contains("INFERENCE_TIMEOUT_SECS"));
    }
}
