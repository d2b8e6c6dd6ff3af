pub mod chart_view_model;

pub use chart_view_model::ChartViewModel;
