use crate::domain::alias::ModelAlias;
use crate::domain::errors::InferenceError;
use crate::domain::market::{OhlcvBar, OhlcvSeries};
use crate::domain::ports::{AliasListing, InferenceService};
use crate::domain::prediction::{PredictionPoint, PredictionSeries};
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, DurationRound, Utc};
use rand::Rng;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tracing::info;

/// A call received by [`MockInferenceService`], in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    ListAliases,
    FetchOhlcv,
    Reload(String),
    Predict(String),
    PredictChampion,
}

/// In-process stand-in for the inference server.
///
/// Scriptable for tests and, through [`synthetic`](Self::synthetic), able to
/// drive the dashboard offline.
pub struct MockInferenceService {
    aliases: Option<Vec<String>>,
    default_alias: String,
    ohlcv: Result<OhlcvSeries, InferenceError>,
    alias_predictions: HashMap<String, PredictionSeries>,
    champion: Result<PredictionSeries, InferenceError>,
    reload_error: Option<InferenceError>,
    latency: Duration,
    calls: Mutex<Vec<MockCall>>,
}

impl Default for MockInferenceService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockInferenceService {
    pub fn new() -> Self {
        Self {
            aliases: Some(Vec::new()),
            default_alias: crate::config::DEFAULT_MODEL_ALIAS.to_string(),
            ohlcv: Ok(OhlcvSeries::default()),
            alias_predictions: HashMap::new(),
            champion: Ok(PredictionSeries::default()),
            reload_error: None,
            latency: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_aliases<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Makes alias listing fail so the default alias is returned.
    pub fn failing_aliases(mut self) -> Self {
        self.aliases = None;
        self
    }

    pub fn with_default_alias(mut self, alias: impl Into<String>) -> Self {
        self.default_alias = alias.into();
        self
    }

    pub fn with_ohlcv(mut self, ohlcv: OhlcvSeries) -> Self {
        self.ohlcv = Ok(ohlcv);
        self
    }

    pub fn failing_ohlcv(mut self, error: InferenceError) -> Self {
        self.ohlcv = Err(error);
        self
    }

    /// Predictions returned for `wire_alias`. Unknown aliases get a payload
    /// without a `predictions` field.
    pub fn with_alias_prediction(
        mut self,
        wire_alias: impl Into<String>,
        series: PredictionSeries,
    ) -> Self {
        self.alias_predictions.insert(wire_alias.into(), series);
        self
    }

    pub fn with_champion(mut self, series: PredictionSeries) -> Self {
        self.champion = Ok(series);
        self
    }

    pub fn failing_champion(mut self, error: InferenceError) -> Self {
        self.champion = Err(error);
        self
    }

    pub fn failing_reload(mut self, error: InferenceError) -> Self {
        self.reload_error = Some(error);
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    async fn record(&self, call: MockCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    /// Random-walk history for the week up to `now`, three registry aliases and
    /// a champion model. Predictions run past the end of the history so the
    /// clipping is visible.
    pub fn synthetic(alias_prefix: &str, now: DateTime<Utc>) -> Self {
        const HOURS: i64 = 24 * 7;
        let mut rng = rand::rng();

        let end = now
            .duration_trunc(ChronoDuration::hours(1))
            .unwrap_or(now);
        let start = end - ChronoDuration::hours(HOURS - 1);

        let mut bars = Vec::with_capacity(HOURS as usize);
        let mut price = 65_000.0_f64;
        for hour in 0..HOURS {
            let open = price;
            let close = (open * (1.0 + rng.random_range(-0.012..0.012))).max(1.0);
            let high = open.max(close) * (1.0 + rng.random_range(0.0..0.006));
            let low = open.min(close) * (1.0 - rng.random_range(0.0..0.006));
            bars.push(OhlcvBar {
                datetime: start + ChronoDuration::hours(hour),
                open,
                high,
                low,
                close,
                volume: Some(rng.random_range(50.0..400.0)),
            });
            price = close;
        }

        let forecast = |rng: &mut rand::rngs::ThreadRng, from: usize, horizon: i64| {
            let anchor = &bars[from];
            let mut value = anchor.close;
            let points = (0..(bars.len() - from) as i64 + horizon)
                .map(|step| {
                    value *= 1.0 + rng.random_range(-0.008..0.008);
                    PredictionPoint {
                        datetime: anchor.datetime + ChronoDuration::hours(step),
                        prediction: value,
                    }
                })
                .collect();
            PredictionSeries::new(points)
        };

        let mut service = Self::new().with_latency(Duration::from_millis(600));
        let mut names = Vec::new();
        for days_back in [5_i64, 3, 1] {
            let trained = end - ChronoDuration::days(days_back);
            let name = format!("{}{}", alias_prefix, trained.format("%Y%m%d"));
            let from = bars.len() - (days_back * 24) as usize;
            service = service.with_alias_prediction(name.clone(), forecast(&mut rng, from, 12));
            names.push(name);
        }
        let champion = forecast(&mut rng, bars.len() - 48, 24);

        info!(
            "Synthetic inference service ready: {} bars, {} aliases",
            bars.len(),
            names.len()
        );

        service
            .with_aliases(names)
            .with_ohlcv(OhlcvSeries::new(bars))
            .with_champion(champion)
    }
}

fn missing_predictions(endpoint: &str) -> InferenceError {
    InferenceError::MalformedPayload {
        endpoint: endpoint.to_string(),
        reason: "missing field `predictions`".to_string(),
    }
}

#[async_trait]
impl InferenceService for MockInferenceService {
    async fn list_aliases(&self) -> AliasListing {
        self.record(MockCall::ListAliases).await;
        match &self.aliases {
            Some(names) => AliasListing {
                names: names.clone(),
                warning: None,
            },
            None => AliasListing {
                names: vec![self.default_alias.clone()],
                warning: Some("Failed to fetch model aliases: mock listing disabled".to_string()),
            },
        }
    }

    async fn fetch_ohlcv(&self) -> Result<OhlcvSeries, InferenceError> {
        self.record(MockCall::FetchOhlcv).await;
        self.ohlcv.clone()
    }

    async fn reload_model(&self, alias: &ModelAlias) -> Result<(), InferenceError> {
        self.record(MockCall::Reload(alias.wire().to_string())).await;
        match &self.reload_error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    async fn predict(&self, alias: &ModelAlias) -> Result<PredictionSeries, InferenceError> {
        self.record(MockCall::Predict(alias.wire().to_string()))
            .await;
        self.alias_predictions
            .get(alias.wire())
            .cloned()
            .ok_or_else(|| missing_predictions("/predict"))
    }

    async fn predict_champion(&self) -> Result<PredictionSeries, InferenceError> {
        self.record(MockCall::PredictChampion).await;
        self.champion.clone()
    }
}
