use crate::domain::alias::ModelAlias;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage key used for the production model's predictions.
pub const CHAMPION_KEY: &str = "champion_model";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionPoint {
    pub datetime: DateTime<Utc>,
    pub prediction: f64,
}

/// Ordered predicted prices produced by one model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionSeries {
    points: Vec<PredictionPoint>,
}

impl PredictionSeries {
    pub fn new(points: Vec<PredictionPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[PredictionPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.prediction)
    }

    /// Keeps only points at or before `cutoff`.
    pub fn truncated_at(mut self, cutoff: DateTime<Utc>) -> Self {
        self.points.retain(|p| p.datetime <= cutoff);
        self
    }
}

/// Identifies which model a stored series came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ModelKey {
    Champion,
    Alias(ModelAlias),
}

impl ModelKey {
    /// Name shown to the user and used as the store key.
    pub fn label(&self) -> &str {
        match self {
            ModelKey::Champion => CHAMPION_KEY,
            ModelKey::Alias(alias) => alias.display(),
        }
    }
}

impl fmt::Display for ModelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_truncation_keeps_points_up_to_cutoff() {
        let t = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let series = PredictionSeries::new(
            [-1, 0, 1, 2]
                .iter()
                .map(|h| PredictionPoint {
                    datetime: t + Duration::hours(*h),
                    prediction: 100.0 + *h as f64,
                })
                .collect(),
        );

        let kept = series.truncated_at(t);
        let datetimes: Vec<_> = kept.points().iter().map(|p| p.datetime).collect();
        assert_eq!(datetimes, vec![t - Duration::hours(1), t]);
    }

    #[test]
    fn test_model_key_labels() {
        let alias = ModelAlias::from_wire("backtest_20250601", "backtest_");
        assert_eq!(ModelKey::Champion.to_string(), "champion_model");
        assert_eq!(ModelKey::Alias(alias).label(), "20250601");
    }
}
