//! Builds the render model for the price chart.
//!
//! The composer is a pure function of the loaded history and the current
//! prediction store. It knows nothing about the widget toolkit; the UI maps the
//! resulting [`ChartSpec`] onto plot primitives.

use crate::domain::market::{OhlcvBar, OhlcvSeries};
use crate::domain::prediction::{ModelKey, PredictionPoint};
use crate::domain::prediction_store::PredictionStore;

/// Fraction of the price span added above and below the data.
pub const PADDING_RATIO: f64 = 0.05;
pub const PREDICTION_LINE_WIDTH: f32 = 3.0;
pub const CHART_TITLE: &str = "BTC/USD Candlestick Chart & Model Prediction";
pub const HISTORY_TRACE_NAME: &str = "Actual price";

/// Colours cycled through for prediction lines, in assignment order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteColor {
    Orange,
    Purple,
    Green,
    Cyan,
    Magenta,
    Yellow,
}

impl PaletteColor {
    pub const CYCLE: [PaletteColor; 6] = [
        PaletteColor::Orange,
        PaletteColor::Purple,
        PaletteColor::Green,
        PaletteColor::Cyan,
        PaletteColor::Magenta,
        PaletteColor::Yellow,
    ];

    pub fn for_position(position: usize) -> Self {
        Self::CYCLE[position % Self::CYCLE.len()]
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            PaletteColor::Orange => (255, 165, 0),
            PaletteColor::Purple => (128, 0, 128),
            PaletteColor::Green => (0, 128, 0),
            PaletteColor::Cyan => (0, 255, 255),
            PaletteColor::Magenta => (255, 0, 255),
            PaletteColor::Yellow => (255, 255, 0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CandlestickTrace {
    pub name: String,
    pub bars: Vec<OhlcvBar>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineTrace {
    pub key: ModelKey,
    pub name: String,
    pub color: PaletteColor,
    pub width: f32,
    pub points: Vec<PredictionPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YRange {
    pub min: f64,
    pub max: f64,
}

impl YRange {
    /// Padded range covering every value, or `None` when there are no finite values.
    pub fn covering<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
                None => Some((v, v)),
            })?;

        let padding = (max - min) * PADDING_RATIO;
        Some(Self {
            min: min - padding,
            max: max + padding,
        })
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendOrientation {
    Horizontal,
    Vertical,
}

/// Legend placement relative to the plot area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendPlacement {
    pub orientation: LegendOrientation,
    /// Anchored to the right edge.
    pub anchor_right: bool,
    /// Drawn above the plot area rather than over it.
    pub above_plot: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub title: &'static str,
    pub x_axis_title: &'static str,
    pub y_axis_title: &'static str,
    pub legend: LegendPlacement,
    pub range_slider_visible: bool,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            title: CHART_TITLE,
            x_axis_title: "Date",
            y_axis_title: "Price (USD)",
            legend: LegendPlacement {
                orientation: LegendOrientation::Horizontal,
                anchor_right: true,
                above_plot: true,
            },
            range_slider_visible: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub candles: CandlestickTrace,
    pub predictions: Vec<LineTrace>,
    pub y_range: Option<YRange>,
    pub layout: ChartLayout,
}

impl ChartSpec {
    pub fn trace_count(&self) -> usize {
        1 + self.predictions.len()
    }
}

/// Combines the price history and every stored prediction into one chart.
pub fn compose(ohlcv: &OhlcvSeries, store: &PredictionStore) -> ChartSpec {
    let predictions: Vec<LineTrace> = store
        .all()
        .enumerate()
        .map(|(position, (key, series))| LineTrace {
            key: key.clone(),
            name: trace_name(key, store),
            color: PaletteColor::for_position(position),
            width: PREDICTION_LINE_WIDTH,
            points: series.points().to_vec(),
        })
        .collect();

    let prediction_values = store.all().flat_map(|(_, series)| series.values());
    let y_range = YRange::covering(ohlcv.price_extremes().chain(prediction_values));

    ChartSpec {
        candles: CandlestickTrace {
            name: HISTORY_TRACE_NAME.to_string(),
            bars: ohlcv.bars().to_vec(),
        },
        predictions,
        y_range,
        layout: ChartLayout::default(),
    }
}

/// Legend name for a stored series. Aliases whose label is shared with another
/// entry also show their wire name.
fn trace_name(key: &ModelKey, store: &PredictionStore) -> String {
    let shared = store
        .all()
        .filter(|(other, _)| other.label() == key.label())
        .count()
        > 1;

    match key {
        ModelKey::Alias(alias) if shared => {
            format!("{} prediction ({})", alias.display(), alias.wire())
        }
        _ => format!("{} prediction", key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::alias::ModelAlias;
    use crate::domain::prediction::PredictionSeries;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
    }

    fn bar(offset_hours: i64, open: f64, high: f64, low: f64, close: f64) -> OhlcvBar {
        OhlcvBar {
            datetime: t0() + Duration::hours(offset_hours),
            open,
            high,
            low,
            close,
            volume: Some(1.0),
        }
    }

    fn single_point(value: f64) -> PredictionSeries {
        PredictionSeries::new(vec![PredictionPoint {
            datetime: t0(),
            prediction: value,
        }])
    }

    fn alias_key(name: &str) -> ModelKey {
        ModelKey::Alias(ModelAlias::from_wire(name, "backtest_"))
    }

    #[test]
    fn test_history_only_chart() {
        let ohlcv = OhlcvSeries::new(vec![
            bar(0, 100.0, 110.0, 90.0, 105.0),
            bar(1, 105.0, 130.0, 95.0, 120.0),
        ]);
        let chart = compose(&ohlcv, &PredictionStore::new());

        assert_eq!(chart.trace_count(), 1);
        assert!(chart.predictions.is_empty());
        let range = chart.y_range.unwrap();
        // span 90..130 = 40, padding 2
        assert!((range.min - 88.0).abs() < 1e-9);
        assert!((range.max - 132.0).abs() < 1e-9);
    }

    #[test]
    fn test_prediction_extends_range() {
        let ohlcv = OhlcvSeries::new(vec![bar(0, 10.0, 20.0, 5.0, 15.0)]);
        let mut store = PredictionStore::new();
        store.put(alias_key("a"), single_point(25.0));

        let chart = compose(&ohlcv, &store);
        let range = chart.y_range.unwrap();
        assert!((range.min - 4.0).abs() < 1e-9);
        assert!((range.max - 26.0).abs() < 1e-9);
        assert_eq!(chart.trace_count(), 2);
        assert_eq!(chart.predictions[0].name, "a prediction");
        assert_eq!(chart.predictions[0].width, 3.0);
    }

    #[test]
    fn test_degenerate_range_has_zero_width() {
        let ohlcv = OhlcvSeries::new(vec![bar(0, 50.0, 50.0, 50.0, 50.0)]);
        let mut store = PredictionStore::new();
        store.put(ModelKey::Champion, single_point(50.0));

        let range = compose(&ohlcv, &store).y_range.unwrap();
        assert_eq!(range.min, 50.0);
        assert_eq!(range.max, 50.0);
        assert_eq!(range.span(), 0.0);
    }

    #[test]
    fn test_no_values_means_no_range() {
        let chart = compose(&OhlcvSeries::default(), &PredictionStore::new());
        assert!(chart.y_range.is_none());
        assert!(chart.candles.bars.is_empty());
    }

    #[test]
    fn test_non_finite_predictions_are_ignored_for_bounds() {
        let ohlcv = OhlcvSeries::new(vec![bar(0, 10.0, 20.0, 0.0, 15.0)]);
        let mut store = PredictionStore::new();
        store.put(ModelKey::Champion, single_point(f64::NAN));

        let range = compose(&ohlcv, &store).y_range.unwrap();
        assert!((range.min + 1.0).abs() < 1e-9);
        assert!((range.max - 21.0).abs() < 1e-9);
    }

    #[test]
    fn test_colors_cycle_after_six_series() {
        let ohlcv = OhlcvSeries::new(vec![bar(0, 10.0, 20.0, 5.0, 15.0)]);
        let mut store = PredictionStore::new();
        for i in 0..7 {
            store.put(alias_key(&format!("backtest_{}", i)), single_point(12.0));
        }

        let chart = compose(&ohlcv, &store);
        assert_eq!(chart.predictions.len(), 7);
        assert_eq!(chart.predictions[0].color, PaletteColor::Orange);
        assert_eq!(chart.predictions[5].color, PaletteColor::Yellow);
        assert_eq!(chart.predictions[6].color, chart.predictions[0].color);
    }

    #[test]
    fn test_cleared_store_matches_never_populated() {
        let ohlcv = OhlcvSeries::new(vec![bar(0, 10.0, 20.0, 5.0, 15.0)]);
        let pristine = compose(&ohlcv, &PredictionStore::new());

        let mut store = PredictionStore::new();
        store.put(ModelKey::Champion, single_point(99.0));
        store.clear();

        assert_eq!(compose(&ohlcv, &store), pristine);
    }

    #[test]
    fn test_fixed_layout() {
        let layout = ChartLayout::default();
        assert_eq!(layout.title, CHART_TITLE);
        assert_eq!(layout.y_axis_title, "Price (USD)");
        assert!(layout.legend.above_plot);
        assert_eq!(layout.legend.orientation, LegendOrientation::Horizontal);
        assert!(!layout.range_slider_visible);
    }

    #[test]
    fn test_colliding_labels_get_distinct_names() {
        let mut store = PredictionStore::new();
        store.put(ModelKey::Champion, single_point(10.0));
        store.put(
            ModelKey::Alias(ModelAlias::from_wire("champion_model", "backtest_")),
            single_point(11.0),
        );
        store.put(alias_key("backtest_x"), single_point(12.0));
        store.put(alias_key("x"), single_point(13.0));
        store.put(alias_key("backtest_20250531"), single_point(14.0));

        let chart = compose(&OhlcvSeries::default(), &store);
        let names: Vec<&str> = chart.predictions.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "champion_model prediction",
                "champion_model prediction (champion_model)",
                "x prediction (backtest_x)",
                "x prediction (x)",
                "20250531 prediction",
            ]
        );
    }
}
