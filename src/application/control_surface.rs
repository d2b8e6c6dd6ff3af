use crate::application::session::{Command, LoadedSession, Outcome};
use crate::config::DashboardEnvConfig;
use crate::domain::alias::{AliasCatalog, ModelAlias};
use crate::domain::errors::InferenceError;
use crate::domain::ports::InferenceService;
use crate::domain::prediction::PredictionSeries;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Runs session commands against the inference service.
pub struct ControlSurface {
    service: Arc<dyn InferenceService>,
    alias_prefix: String,
    settle_delay: Duration,
    clip_champion_to_history: bool,
}

impl ControlSurface {
    pub fn new(
        service: Arc<dyn InferenceService>,
        alias_prefix: impl Into<String>,
        dashboard: &DashboardEnvConfig,
    ) -> Self {
        Self {
            service,
            alias_prefix: alias_prefix.into(),
            settle_delay: dashboard.settle_delay,
            clip_champion_to_history: dashboard.clip_champion_to_history,
        }
    }

    /// Initial load: alias catalog (soft) and price history (hard).
    pub async fn load(&self) -> Result<LoadedSession> {
        let listing = self.service.list_aliases().await;
        if let Some(reason) = &listing.warning {
            warn!("Alias listing fell back to default: {}", reason);
        }
        let catalog = AliasCatalog::from_wire_names(listing.names, &self.alias_prefix)
            .with_warning(listing.warning);
        info!("Alias catalog ready with {} entries", catalog.aliases().len());

        let ohlcv = self
            .service
            .fetch_ohlcv()
            .await
            .context("Failed to load price history from the inference server")?;
        info!("Loaded {} bars of price history", ohlcv.len());

        Ok(LoadedSession { catalog, ohlcv })
    }

    pub async fn execute(&self, command: Command) -> Outcome {
        match command {
            Command::RefreshHistory => match self.service.fetch_ohlcv().await {
                Ok(ohlcv) => Outcome::HistoryRefreshed(ohlcv),
                Err(e) => Outcome::HistoryFailed(e.to_string()),
            },
            Command::PredictChampion { history_end } => {
                match self.predict_champion(history_end).await {
                    Ok(series) => Outcome::ChampionPredicted(series),
                    Err(e) => {
                        warn!("Champion prediction failed: {}", e);
                        Outcome::ChampionFailed(e.to_string())
                    }
                }
            }
            Command::PredictAlias { alias, history_end } => {
                match self.predict_alias(&alias, history_end).await {
                    Ok(series) => Outcome::AliasPredicted { alias, series },
                    Err(e) => {
                        warn!("Prediction for alias {} failed: {}", alias.wire(), e);
                        Outcome::AliasFailed {
                            alias,
                            reason: e.to_string(),
                        }
                    }
                }
            }
        }
    }

    async fn predict_champion(
        &self,
        history_end: Option<DateTime<Utc>>,
    ) -> Result<PredictionSeries, InferenceError> {
        let series = self.service.predict_champion().await?;
        Ok(match history_end {
            Some(cutoff) if self.clip_champion_to_history => series.truncated_at(cutoff),
            _ => series,
        })
    }

    /// Reload, settle, predict, clip. A failed predict does not undo the reload.
    async fn predict_alias(
        &self,
        alias: &ModelAlias,
        history_end: Option<DateTime<Utc>>,
    ) -> Result<PredictionSeries, InferenceError> {
        info!("Reloading model {}", alias.wire());
        self.service.reload_model(alias).await?;

        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }

        let series = self.service.predict(alias).await?;
        let received = series.len();
        let series = match history_end {
            Some(cutoff) => series.truncated_at(cutoff),
            None => series,
        };
        info!(
            "Model {} returned {} points, kept {}",
            alias.wire(),
            received,
            series.len()
        );
        Ok(series)
    }
}
