//! HTTP handlers for the replenishment API

pub mod forecast;
pub mod health;
pub mod purchasing;
pub mod replenishment;
pub mod stock;

pub use forecast::compute_forecast;
pub use health::health_check;
pub use purchasing::{place_order, resume_order};
pub use replenishment::{advise, replenish};
pub use stock::get_stock_positions;
