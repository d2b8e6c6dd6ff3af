use crate::interfaces::design_system::DesignSystem;
use eframe::egui;
use std::collections::VecDeque;

/// Collapsible bottom panel showing the tracing output
pub fn render_logs_panel(ctx: &egui::Context, logs: &VecDeque<String>, collapsed: &mut bool) {
    egui::TopBottomPanel::bottom("logs_panel")
        .resizable(!*collapsed)
        .default_height(160.0)
        .min_height(28.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                let arrow = if *collapsed { "▸" } else { "▾" };
                if ui
                    .button(format!("{} Activity Log ({})", arrow, logs.len()))
                    .clicked()
                {
                    *collapsed = !*collapsed;
                }
            });

            if *collapsed {
                return;
            }

            egui::ScrollArea::vertical()
                .id_salt("logs_scroll")
                .auto_shrink([false, false])
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for line in logs {
                        let color = if line.contains("ERROR") {
                            DesignSystem::DANGER
                        } else if line.contains("WARN") {
                            DesignSystem::WARNING
                        } else {
                            DesignSystem::TEXT_SECONDARY
                        };
                        ui.label(
                            egui::RichText::new(line.trim_end())
                                .monospace()
                                .size(11.0)
                                .color(color),
                        );
                    }
                });
        });
}
