//! Dashboard behaviour configuration parsing from environment variables.

use super::inference_config::parse_secs;
use anyhow::{Context, Result};
use std::time::Duration;

/// Dashboard environment configuration
#[derive(Debug, Clone)]
pub struct DashboardEnvConfig {
    /// Wait between a model reload and the prediction request.
    pub settle_delay: Duration,
    /// Drop champion predictions past the end of the loaded history.
    pub clip_champion_to_history: bool,
    pub preview_rows: usize,
}

impl Default for DashboardEnvConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_secs(5),
            clip_champion_to_history: true,
            preview_rows: 5,
        }
    }
}

impl DashboardEnvConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let preview_rows = match lookup("PREVIEW_ROWS") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .context("Failed to parse PREVIEW_ROWS")?,
            None => defaults.preview_rows,
        };

        Ok(Self {
            settle_delay: parse_secs(&lookup, "RELOAD_SETTLE_SECS", defaults.settle_delay)?,
            clip_champion_to_history: lookup("CLIP_CHAMPION_PREDICTIONS")
                .and_then(|raw| raw.trim().parse::<bool>().ok())
                .unwrap_or(defaults.clip_champion_to_history),
            preview_rows,
        })
    }
}
