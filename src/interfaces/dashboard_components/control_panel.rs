use crate::application::session::{Action, NoticeLevel, Session};
use crate::interfaces::components::notice_banner::{render_message, render_notice};
use crate::interfaces::design_system::DesignSystem;
use eframe::egui;

const ALIAS_HELP: &str = "Predicts the period after the date this model was trained.";

/// Sidebar with the prediction controls. Returns the action the user triggered.
pub fn render_control_panel(ui: &mut egui::Ui, session: &mut Session) -> Option<Action> {
    let mut action = None;
    let idle = !session.is_busy();

    ui.heading("📈 Model Prediction Controls");
    ui.add_space(DesignSystem::SPACING_SMALL);

    if let Some(warning) = session.catalog().warning() {
        render_message(ui, NoticeLevel::Error, warning);
        ui.add_space(DesignSystem::SPACING_SMALL);
    }

    if ui
        .add_enabled(idle, egui::Button::new("Champion Model Prediction"))
        .clicked()
    {
        action = Some(Action::PredictChampion);
    }

    ui.add_space(DesignSystem::SPACING_MEDIUM);
    ui.label(
        egui::RichText::new("Choose the reference model (alias):")
            .color(DesignSystem::TEXT_SECONDARY),
    );

    let current = session
        .selected()
        .map(|alias| alias.display().to_string())
        .unwrap_or_default();
    let mut chosen = current.clone();
    ui.add_enabled_ui(idle, |ui| {
        egui::ComboBox::from_id_salt("alias_select")
            .width(ui.available_width())
            .selected_text(chosen.clone())
            .show_ui(ui, |ui| {
                for alias in session.catalog().aliases() {
                    ui.selectable_value(&mut chosen, alias.display().to_string(), alias.display());
                }
            })
            .response
            .on_hover_text(ALIAS_HELP);
    });
    if session.catalog().is_empty() {
        ui.label(
            egui::RichText::new("No model aliases available.")
                .italics()
                .color(DesignSystem::TEXT_MUTED),
        );
    }
    if chosen != current {
        session.select_by_display(&chosen);
    }

    if ui
        .add_enabled(
            session.can_predict_selected(),
            egui::Button::new("Predict with Selected Model"),
        )
        .clicked()
    {
        action = Some(Action::PredictSelected);
    }

    ui.add_space(DesignSystem::SPACING_SMALL);
    if ui.button("Clear All Predictions").clicked() {
        action = Some(Action::Clear);
    }

    ui.separator();
    if ui
        .add_enabled(idle, egui::Button::new("⟳ Refresh Price History"))
        .clicked()
    {
        action = Some(Action::RefreshHistory);
    }

    ui.add_space(DesignSystem::SPACING_MEDIUM);
    if let Some(pending) = session.pending() {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label(
                egui::RichText::new(pending.busy_message()).color(DesignSystem::TEXT_SECONDARY),
            );
        });
    } else if let Some(notice) = session.notice() {
        render_notice(ui, notice);
    }

    ui.add_space(DesignSystem::SPACING_MEDIUM);
    ui.label(
        egui::RichText::new(format!("{} stored prediction(s)", session.store().len()))
            .small()
            .color(DesignSystem::TEXT_MUTED),
    );

    action
}
