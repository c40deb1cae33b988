//! Demand forecast models
//!
//! Inputs and outputs of the reorder-point calculation. All figures are
//! per-product; demand rates are expressed in units per day.

use serde::{Deserialize, Serialize};

/// Historical demand statistics for a single product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandProfile {
    /// Average daily demand in units
    pub avg_daily: f64,
    /// Standard deviation of daily demand, when sales history supports a
    /// meaningful estimate. Absent or zero triggers the heuristic
    /// safety-stock fallback.
    #[serde(default)]
    pub daily_std_dev: Option<f64>,
    /// Supplier lead time in days
    pub lead_time_days: f64,
    /// Days between replenishment cycles
    pub review_days: f64,
    /// Extra coverage days on top of the supplier lead time
    #[serde(default)]
    pub buffer_days: f64,
    /// Service-level z-score, typically in [0, 3]
    pub service_level_z: f64,
    /// Planning horizon in days
    #[serde(default)]
    pub horizon_days: f64,
}

/// Full input set for one forecast calculation. Immutable per calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastInputs {
    #[serde(flatten)]
    pub demand: DemandProfile,
    /// Units currently on hand
    pub on_hand: i64,
    /// Open customer demand not yet fulfilled
    pub in_order_book: i64,
    /// Incoming supply on existing purchase orders
    pub due: i64,
    /// Supplier pack size; recommended quantities are rounded up to a
    /// multiple of this
    #[serde(default)]
    pub pack_size: Option<u32>,
    /// Supplier minimum order quantity, applied after pack rounding
    #[serde(default)]
    pub moq: Option<u32>,
}

/// Outcome of a forecast calculation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResult {
    /// Recommended order quantity. Zero means no replenishment needed.
    pub qty: i64,
    /// Reorder point
    pub rop: f64,
    /// Safety stock
    pub safety: f64,
    /// Desired coverage through the planning horizon
    pub target: f64,
    /// Net inventory position: on hand minus order book plus due
    pub net_position: f64,
}

/// Tunable policy constants for the forecast calculation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPolicy {
    /// Fraction of mean demand over the coverage window used as safety
    /// stock when demand variability is unknown
    pub fallback_safety_ratio: f64,
}

impl Default for ForecastPolicy {
    fn default() -> Self {
        Self {
            fallback_safety_ratio: 0.3,
        }
    }
}
