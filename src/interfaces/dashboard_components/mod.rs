pub mod activity_log;
pub mod chart_panel;
pub mod control_panel;
pub mod data_preview;
