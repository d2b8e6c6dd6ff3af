pub mod chart_composer;
pub mod client;
pub mod control_surface;
pub mod session;
