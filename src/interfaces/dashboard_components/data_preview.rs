use crate::domain::market::OhlcvBar;
use crate::interfaces::design_system::DesignSystem;
use eframe::egui;

/// Raw data preview: the most recent bars as a table
pub fn render_data_preview(ui: &mut egui::Ui, bars: &[OhlcvBar]) {
    ui.label(
        egui::RichText::new("Raw Data Preview")
            .strong()
            .color(DesignSystem::TEXT_PRIMARY),
    );
    ui.add_space(4.0);

    DesignSystem::card_frame().show(ui, |ui| {
        egui::Grid::new("ohlcv_preview_grid")
            .striped(true)
            .min_col_width(90.0)
            .spacing([20.0, 6.0])
            .show(ui, |ui| {
                for header in ["DATETIME", "OPEN", "HIGH", "LOW", "CLOSE", "VOLUME"] {
                    ui.label(
                        egui::RichText::new(header)
                            .strong()
                            .small()
                            .color(DesignSystem::TEXT_SECONDARY),
                    );
                }
                ui.end_row();

                for bar in bars {
                    ui.label(bar.datetime.format("%Y-%m-%d %H:%M").to_string());
                    ui.label(format!("{:.2}", bar.open));
                    ui.label(format!("{:.2}", bar.high));
                    ui.label(format!("{:.2}", bar.low));
                    ui.label(format!("{:.2}", bar.close));
                    ui.label(
                        bar.volume
                            .map(|v| format!("{:.4}", v))
                            .unwrap_or_else(|| "-".to_string()),
                    );
                    ui.end_row();
                }
            });
    });
}
