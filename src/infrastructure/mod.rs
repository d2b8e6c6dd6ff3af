pub mod core;
pub mod factory;
pub mod inference;
pub mod mock;

pub use factory::ServiceFactory;
