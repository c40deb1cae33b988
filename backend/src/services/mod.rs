//! Business logic services for the replenishment engine

pub mod forecast;
pub mod purchasing;
pub mod replenishment;
pub mod session;
pub mod stock;

pub use purchasing::PurchaseOrderService;
pub use replenishment::ReplenishmentService;
pub use session::SessionCache;
pub use stock::StockPositionReader;
