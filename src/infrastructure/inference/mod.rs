pub mod client;
pub mod datetime;
pub mod dto;

pub use client::HttpInferenceClient;
