use crate::application::client::DashboardClient;
use crate::application::session::{Action, NoticeLevel, Session};
use crate::interfaces::components::notice_banner::render_message;
use crate::interfaces::dashboard_components::{
    activity_log::render_logs_panel, chart_panel::render_chart_panel,
    control_panel::render_control_panel, data_preview::render_data_preview,
};
use crate::interfaces::design_system::DesignSystem;
use crate::interfaces::view_models::ChartViewModel;
use chrono::Utc;
use eframe::egui;
use std::collections::VecDeque;
use std::time::Duration;

const MAX_LOG_LINES: usize = 500;

/// The dashboard window. Owns the session; remote work goes through the client.
pub struct DashboardApp {
    session: Session,
    client: DashboardClient,
    logs: VecDeque<String>,
    logs_collapsed: bool,
    preview_rows: usize,
}

impl DashboardApp {
    pub fn new(session: Session, client: DashboardClient, preview_rows: usize) -> Self {
        Self {
            session,
            client,
            logs: VecDeque::new(),
            logs_collapsed: true,
            preview_rows,
        }
    }

    /// Applies finished commands and collects new log lines.
    fn pump(&mut self) {
        while let Some(outcome) = self.client.poll_outcome() {
            self.session.apply(outcome);
        }

        self.logs.extend(self.client.drain_logs());
        while self.logs.len() > MAX_LOG_LINES {
            self.logs.pop_front();
        }
    }

    fn handle(&mut self, action: Action) {
        if let Some(command) = self.session.request(action) {
            self.client.submit(command);
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(DesignSystem::theme());

        // --- 1. Apply finished work ---
        self.pump();

        // --- 2. Top Status Bar ---
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Model Prediction Dashboard");
                ui.separator();
                ui.label(format!("Time (UTC): {}", Utc::now().format("%H:%M:%S")));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let (text, color) = if self.session.is_busy() {
                        ("● WORKING", DesignSystem::WARNING)
                    } else {
                        ("● READY", DesignSystem::SUCCESS)
                    };
                    ui.label(egui::RichText::new(text).color(color).small());
                });
            });
        });

        // --- 3. Left Sidebar: Controls ---
        let mut action = None;
        egui::SidePanel::left("control_panel")
            .default_width(300.0)
            .min_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                action = render_control_panel(ui, &mut self.session);
            });

        // --- 4. Bottom: Logs ---
        render_logs_panel(ctx, &self.logs, &mut self.logs_collapsed);

        // --- 5. Central Panel: Chart & Preview ---
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(error) = self.session.history_error() {
                render_message(
                    ui,
                    NoticeLevel::Error,
                    &format!("Price history could not be loaded: {}", error),
                );
                return;
            }

            let Some(chart) = self.session.chart() else {
                return;
            };
            let view = ChartViewModel::from_spec(&chart);

            let preview_height = 60.0 + 22.0 * self.preview_rows as f32;
            egui::TopBottomPanel::bottom("preview_panel")
                .resizable(false)
                .exact_height(preview_height)
                .show_inside(ui, |ui| {
                    render_data_preview(ui, self.session.ohlcv().tail(self.preview_rows));
                });

            render_chart_panel(ui, &view);
        });

        if let Some(action) = action {
            self.handle(action);
        }

        // Keep polling while a request is in flight; otherwise just refresh the clock and logs
        if self.session.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(100));
        } else {
            ctx.request_repaint_after(Duration::from_millis(500));
        }
    }
}
