use crate::application::chart_composer::{LegendOrientation, LegendPlacement};
use crate::interfaces::design_system::DesignSystem;
use crate::interfaces::view_models::ChartViewModel;
use chrono::DateTime;
use eframe::egui;
use egui_plot::{BoxElem, BoxPlot, BoxSpread, Corner, Legend, Line, Plot};

/// Renders the candlestick chart with every stored prediction overlaid
pub fn render_chart_panel(ui: &mut egui::Ui, view: &ChartViewModel) {
    ui.label(
        egui::RichText::new(view.title)
            .strong()
            .size(16.0)
            .color(DesignSystem::TEXT_PRIMARY),
    );
    ui.add_space(DesignSystem::SPACING_SMALL);

    if view.candles.is_empty() && view.lines.is_empty() {
        ui.label(
            egui::RichText::new("The inference server returned no price history.")
                .italics()
                .color(DesignSystem::TEXT_MUTED),
        );
        return;
    }

    if view.legend.above_plot {
        render_legend_row(ui, view);
        ui.add_space(4.0);
    }

    let height = (ui.available_height() - 20.0).max(320.0);
    let mut plot = Plot::new("prediction_chart")
        .height(height)
        .show_grid([true, true])
        .x_axis_label(view.x_label)
        .y_axis_label(view.y_label)
        .x_axis_formatter(|mark, _range| format_plot_time(mark.value));

    if !view.legend.above_plot {
        plot = plot.legend(Legend::default().position(legend_corner(view.legend)));
    }

    if let Some((min, max)) = view.y_bounds {
        plot = plot
            .include_y(min)
            .include_y(max)
            .set_margin_fraction(egui::vec2(0.02, 0.0));
    }

    plot.show(ui, |plot_ui| {
        let box_elems: Vec<BoxElem> = view
            .candles
            .iter()
            .map(|c| {
                BoxElem::new(
                    c.x,
                    BoxSpread::new(c.low, c.body_low, c.mid, c.body_high, c.high),
                )
                .fill(c.color)
                .stroke(egui::Stroke::new(1.0, c.color))
                .box_width(view.candle_width)
                .whisker_width(0.0)
            })
            .collect();
        plot_ui.box_plot(BoxPlot::new(view.candle_name.clone(), box_elems));

        for line in &view.lines {
            plot_ui.line(
                Line::new(line.name.clone(), line.points.clone())
                    .color(line.color)
                    .width(line.width),
            );
        }
    });
}

/// Legend entries drawn outside the plot, one swatch and name per trace.
fn render_legend_row(ui: &mut egui::Ui, view: &ChartViewModel) {
    let mut entries: Vec<(egui::Color32, &str)> = 
        vec![(DesignSystem::CANDLE_UP, view.candle_name.as_str())];
    entries.extend(view.lines.iter().map(|line| (line.color, line.name.as_str())));

    let layout = match (view.legend.orientation, view.legend.anchor_right) {
        (LegendOrientation::Horizontal, true) => egui::Layout::right_to_left(egui::Align::Center),
        (LegendOrientation::Horizontal, false) => egui::Layout::left_to_right(egui::Align::Center),
        (LegendOrientation::Vertical, true) => egui::Layout::top_down(egui::Align::Max),
        (LegendOrientation::Vertical, false) => egui::Layout::top_down(egui::Align::Min),
    };
    // right_to_left lays out in reverse
    if view.legend.orientation == LegendOrientation::Horizontal && view.legend.anchor_right {
        entries.reverse();
    }

    ui.allocate_ui_with_layout(egui::vec2(ui.available_width(), 0.0), layout, |ui| {
        for (color, name) in entries {
            ui.horizontal(|ui| {
                let (rect, _) = ui.allocate_exact_size(egui::vec2(14.0, 4.0), egui::Sense::hover());
                ui.painter().rect_filled(rect, 1.0, color);
                ui.label(
                    egui::RichText::new(name)
                        .small()
                        .color(DesignSystem::TEXT_SECONDARY),
                );
            });
            ui.add_space(DesignSystem::SPACING_SMALL);
        }
    });
}

fn legend_corner(placement: LegendPlacement) -> Corner {
    if placement.anchor_right {
        Corner::RightTop
    } else {
        Corner::LeftTop
    }
}

fn format_plot_time(seconds: f64) -> String {
    DateTime::from_timestamp(seconds as i64, 0)
        .map(|dt| dt.format("%m-%d %H:%M").to_string())
        .unwrap_or_default()
}
