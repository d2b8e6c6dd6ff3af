use crate::application::session::{Notice, NoticeLevel};
use crate::interfaces::design_system::DesignSystem;
use eframe::egui;

/// Tinted banner for a session notice
pub fn render_notice(ui: &mut egui::Ui, notice: &Notice) {
    render_message(ui, notice.level, &notice.message);
}

pub fn render_message(ui: &mut egui::Ui, level: NoticeLevel, message: &str) {
    let color = DesignSystem::notice_color(level);
    let icon = match level {
        NoticeLevel::Success => "✅",
        NoticeLevel::Info => "ℹ",
        NoticeLevel::Warning => "⚠",
        NoticeLevel::Error => "⛔",
    };

    egui::Frame::NONE
        .fill(color.linear_multiply(0.12))
        .stroke(egui::Stroke::new(1.0, color.linear_multiply(0.6)))
        .corner_radius(6)
        .inner_margin(egui::Margin::symmetric(10, 8))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal_wrapped(|ui| {
                ui.label(egui::RichText::new(icon).color(color));
                ui.label(egui::RichText::new(message).color(DesignSystem::TEXT_PRIMARY));
            });
        });
}
