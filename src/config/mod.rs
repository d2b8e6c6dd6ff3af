//! Configuration module for the prediction dashboard.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: the inference server connection and the dashboard behaviour.

mod dashboard_config;
mod inference_config;

pub use dashboard_config::DashboardEnvConfig;
pub use inference_config::{
    DEFAULT_ALIAS_PREFIX, DEFAULT_MODEL_ALIAS, DEFAULT_SERVER_URL, InferenceEnvConfig,
    InferenceTimeouts,
};

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

/// Where predictions and history come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Talk to the inference server over HTTP.
    Live,
    /// Offline synthetic data, no server required.
    Mock,
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "live" | "http" => Ok(Mode::Live),
            "mock" => Ok(Mode::Mock),
            _ => anyhow::bail!("Invalid MODE: {}. Must be 'live' or 'mock'", s),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,
    pub inference: InferenceEnvConfig,
    pub dashboard: DashboardEnvConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mode = match lookup("MODE") {
            Some(raw) => Mode::from_str(&raw)?,
            None => Mode::Live,
        };

        let inference =
            InferenceEnvConfig::from_lookup(&lookup).context("Failed to load inference config")?;
        let dashboard =
            DashboardEnvConfig::from_lookup(&lookup).context("Failed to load dashboard config")?;

        Ok(Self {
            mode,
            inference,
            dashboard,
        })
    }
}
