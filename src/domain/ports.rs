use crate::domain::alias::ModelAlias;
use crate::domain::errors::InferenceError;
use crate::domain::market::OhlcvSeries;
use crate::domain::prediction::PredictionSeries;
use async_trait::async_trait;

/// Result of listing aliases. Never an error: on failure `names` holds the
/// configured default alias and `warning` explains why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasListing {
    pub names: Vec<String>,
    pub warning: Option<String>,
}

/// Remote inference service holding the model registry and price history.
#[async_trait]
pub trait InferenceService: Send + Sync {
    async fn list_aliases(&self) -> AliasListing;
    async fn fetch_ohlcv(&self) -> Result<OhlcvSeries, InferenceError>;
    async fn reload_model(&self, alias: &ModelAlias) -> Result<(), InferenceError>;
    async fn predict(&self, alias: &ModelAlias) -> Result<PredictionSeries, InferenceError>;
    async fn predict_champion(&self) -> Result<PredictionSeries, InferenceError>;
}
