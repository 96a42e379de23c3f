pub mod config;
pub mod edit;
pub mod plan_item;

pub use config::*;
pub use edit::*;
pub use plan_item::*;
