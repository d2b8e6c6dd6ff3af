use crate::application::chart_composer::{ChartSpec, LegendPlacement, PaletteColor};
use crate::interfaces::design_system::DesignSystem;
use chrono::{DateTime, Utc};
use eframe::egui;

/// Fraction of the bar spacing filled by a candle body.
const CANDLE_FILL_RATIO: f64 = 0.7;
const DEFAULT_BAR_SPACING_SECS: f64 = 3600.0;

/// One candle in plot coordinates (x in epoch seconds).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandleGlyph {
    pub x: f64,
    pub low: f64,
    pub body_low: f64,
    pub mid: f64,
    pub body_high: f64,
    pub high: f64,
    pub color: egui::Color32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineGlyph {
    pub name: String,
    pub color: egui::Color32,
    pub width: f32,
    pub points: Vec<[f64; 2]>,
}

/// Plot-ready projection of a [`ChartSpec`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChartViewModel {
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub candle_name: String,
    pub candle_width: f64,
    pub candles: Vec<CandleGlyph>,
    pub lines: Vec<LineGlyph>,
    pub y_bounds: Option<(f64, f64)>,
    pub legend: LegendPlacement,
}

pub fn plot_x(datetime: DateTime<Utc>) -> f64 {
    datetime.timestamp() as f64
}

pub fn palette_color(color: PaletteColor) -> egui::Color32 {
    let (r, g, b) = color.rgb();
    egui::Color32::from_rgb(r, g, b)
}

impl ChartViewModel {
    pub fn from_spec(spec: &ChartSpec) -> Self {
        let candles: Vec<CandleGlyph> = spec
            .candles
            .bars
            .iter()
            .map(|bar| {
                let color = if bar.is_bullish() {
                    DesignSystem::CANDLE_UP
                } else {
                    DesignSystem::CANDLE_DOWN
                };
                CandleGlyph {
                    x: plot_x(bar.datetime),
                    low: bar.low,
                    body_low: bar.open.min(bar.close),
                    mid: (bar.open + bar.close) / 2.0,
                    body_high: bar.open.max(bar.close),
                    high: bar.high,
                    color,
                }
            })
            .collect();

        let lines = spec
            .predictions
            .iter()
            .map(|trace| LineGlyph {
                name: trace.name.clone(),
                color: palette_color(trace.color),
                width: trace.width,
                points: trace
                    .points
                    .iter()
                    .map(|p| [plot_x(p.datetime), p.prediction])
                    .collect(),
            })
            .collect();

        let xs: Vec<f64> = candles.iter().map(|c| c.x).collect();

        Self {
            title: spec.layout.title,
            x_label: spec.layout.x_axis_title,
            y_label: spec.layout.y_axis_title,
            candle_name: spec.candles.name.clone(),
            candle_width: candle_width(&xs),
            candles,
            lines,
            y_bounds: spec.y_range.map(|range| (range.min, range.max)),
            legend: spec.layout.legend,
        }
    }
}

/// Body width from the tightest spacing between consecutive bars.
fn candle_width(xs: &[f64]) -> f64 {
    let spacing = xs
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .filter(|gap| *gap > 0.0)
        .fold(f64::INFINITY, f64::min);

    let spacing = if spacing.is_finite() {
        spacing
    } else {
        DEFAULT_BAR_SPACING_SECS
    };
    spacing * CANDLE_FILL_RATIO
}
