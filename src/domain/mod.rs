pub mod alias;
pub mod errors;
pub mod market;
pub mod ports;
pub mod prediction;
pub mod prediction_store;
