//! Wire shapes of the inference server responses.

use super::datetime;
use crate::domain::market::OhlcvBar;
use crate::domain::prediction::{PredictionPoint, PredictionSeries};
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AliasesResponse {
    pub aliases: Vec<String>,
}

/// One row of `/btc-info`. Extra columns are ignored.
#[derive(Debug, Deserialize)]
pub struct BtcInfoRow {
    #[serde(deserialize_with = "datetime::deserialize")]
    pub datetime: DateTime<Utc>,
    pub btc_open: f64,
    pub btc_high: f64,
    pub btc_low: f64,
    pub btc_close: f64,
    #[serde(default)]
    pub btc_volume: Option<f64>,
}

impl From<BtcInfoRow> for OhlcvBar {
    fn from(row: BtcInfoRow) -> Self {
        OhlcvBar {
            datetime: row.datetime,
            open: row.btc_open,
            high: row.btc_high,
            low: row.btc_low,
            close: row.btc_close,
            volume: row.btc_volume,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PredictionRow {
    #[serde(deserialize_with = "datetime::deserialize")]
    pub datetime: DateTime<Utc>,
    pub prediction: f64,
}

#[derive(Debug, Deserialize)]
pub struct PredictionsResponse {
    pub predictions: Vec<PredictionRow>,
}

impl From<PredictionsResponse> for PredictionSeries {
    fn from(response: PredictionsResponse) -> Self {
        PredictionSeries::new(
            response
                .predictions
                .into_iter()
                .map(|row| PredictionPoint {
                    datetime: row.datetime,
                    prediction: row.prediction,
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_btc_info_row_ignores_extra_columns() {
        let json = r#"[
            {"datetime": "2025-06-01 00:00:00", "btc_open": 1.0, "btc_high": 2.0,
             "btc_low": 0.5, "btc_close": 1.5, "btc_volume": 42.0, "eth_close": 9.0},
            {"datetime": "2025-06-01 01:00:00", "btc_open": 1.5, "btc_high": 2.5,
             "btc_low": 1.0, "btc_close": 2.0}
        ]"#;
        let rows: Vec<BtcInfoRow> = serde_json::from_str(json).unwrap();
        let bars: Vec<OhlcvBar> = rows.into_iter().map(Into::into).collect();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].volume, Some(42.0));
        assert_eq!(bars[1].volume, None);
        assert_eq!(bars[1].close, 2.0);
    }

    #[test]
    fn test_missing_predictions_field_is_an_error() {
        let err = serde_json::from_str::<PredictionsResponse>(r#"{"detail": "model not loaded"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("missing field `predictions`"));
    }
}
