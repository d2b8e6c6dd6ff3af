use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One candlestick bar of price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcvBar {
    pub datetime: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<f64>,
}

impl OhlcvBar {
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }
}

/// Price history ordered by datetime ascending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OhlcvSeries {
    bars: Vec<OhlcvBar>,
}

impl OhlcvSeries {
    pub fn new(mut bars: Vec<OhlcvBar>) -> Self {
        bars.sort_by_key(|bar| bar.datetime);
        Self { bars }
    }

    pub fn bars(&self) -> &[OhlcvBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Datetime of the most recent bar, used as the cutoff for predictions.
    pub fn latest_datetime(&self) -> Option<DateTime<Utc>> {
        self.bars.last().map(|bar| bar.datetime)
    }

    /// The last `n` bars, oldest first.
    pub fn tail(&self, n: usize) -> &[OhlcvBar] {
        let start = self.bars.len().saturating_sub(n);
        &self.bars[start..]
    }

    /// Every low and high, in bar order.
    pub fn price_extremes(&self) -> impl Iterator<Item = f64> + '_ {
        self.bars.iter().flat_map(|bar| [bar.low, bar.high])
    }
}
