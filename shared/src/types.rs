//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Identifier for a product on the external inventory platform.
///
/// Callers may only know the merchandising SKU, so both lookup paths are
/// supported. SKUs are resolved to platform-internal ids before any stock
/// or ordering call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProductKey {
    Sku(String),
    PlatformId(String),
}

impl ProductKey {
    /// The raw identifier string, regardless of which kind it is
    pub fn key(&self) -> &str {
        match self {
            ProductKey::Sku(s) => s,
            ProductKey::PlatformId(s) => s,
        }
    }

    pub fn is_sku(&self) -> bool {
        matches!(self, ProductKey::Sku(_))
    }
}
