//! Stock position models

use serde::{Deserialize, Serialize};

/// Current stock position for a single product, as reported by the
/// external inventory platform.
///
/// A read-only snapshot: never cached beyond a single forecast invocation
/// so calculations always see current external state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockPosition {
    /// Units physically on hand
    pub on_hand: i64,
    /// Units reserved by open customer orders
    pub in_order_book: i64,
    /// Units incoming on existing purchase orders
    pub due: i64,
    /// Supplier metadata, present only when the read requested it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<SupplierInfo>,
}

impl StockPosition {
    /// Net inventory position: on hand minus order book plus due
    pub fn net_position(&self) -> i64 {
        self.on_hand - self.in_order_book + self.due
    }
}

/// Default supplier for a product, used when turning forecasts into orders
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupplierInfo {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}
