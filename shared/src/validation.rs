//! Validation helpers for replenishment inputs
//!
//! Forecast inputs come from upstream sales-history aggregation; a negative
//! rate or lead time there is a data bug worth surfacing, so these checks
//! reject rather than clamp.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{ForecastInputs, OrderDraft};

/// A single rejected input field
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct InputViolation {
    pub field: String,
    pub message: String,
}

impl InputViolation {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Check the forecast input contract
pub fn validate_forecast_inputs(inputs: &ForecastInputs) -> Result<(), InputViolation> {
    let d = &inputs.demand;
    if d.avg_daily < 0.0 {
        return Err(InputViolation::new(
            "avg_daily",
            "average daily demand cannot be negative",
        ));
    }
    if d.daily_std_dev.is_some_and(|sd| sd < 0.0) {
        return Err(InputViolation::new(
            "daily_std_dev",
            "demand variability cannot be negative",
        ));
    }
    if d.lead_time_days < 0.0 {
        return Err(InputViolation::new(
            "lead_time_days",
            "lead time cannot be negative",
        ));
    }
    if d.review_days < 0.0 {
        return Err(InputViolation::new(
            "review_days",
            "review cadence cannot be negative",
        ));
    }
    if d.buffer_days < 0.0 {
        return Err(InputViolation::new(
            "buffer_days",
            "buffer cannot be negative",
        ));
    }
    if d.horizon_days < 0.0 {
        return Err(InputViolation::new(
            "horizon_days",
            "planning horizon cannot be negative",
        ));
    }
    if inputs.on_hand < 0 {
        return Err(InputViolation::new(
            "on_hand",
            "on-hand quantity cannot be negative",
        ));
    }
    if inputs.in_order_book < 0 {
        return Err(InputViolation::new(
            "in_order_book",
            "order book quantity cannot be negative",
        ));
    }
    if inputs.due < 0 {
        return Err(InputViolation::new(
            "due",
            "due quantity cannot be negative",
        ));
    }
    if inputs.pack_size.is_some_and(|p| p == 0) {
        return Err(InputViolation::new(
            "pack_size",
            "pack size must be positive when given",
        ));
    }
    Ok(())
}

/// Check an order draft before any external call is made.
///
/// Zero-quantity lines are valid ("skip this line"); negative quantities
/// and costs are not.
pub fn validate_order_draft(draft: &OrderDraft) -> Result<(), InputViolation> {
    if draft.supplier_id.trim().is_empty() {
        return Err(InputViolation::new(
            "supplier_id",
            "supplier is required",
        ));
    }
    if draft.location_id.trim().is_empty() {
        return Err(InputViolation::new(
            "location_id",
            "destination location is required",
        ));
    }
    if draft.lines.is_empty() {
        return Err(InputViolation::new(
            "lines",
            "an order needs at least one line",
        ));
    }
    for (index, line) in draft.lines.iter().enumerate() {
        if line.qty < 0 {
            return Err(InputViolation::new(
                format!("lines[{}].qty", index),
                "quantity cannot be negative",
            ));
        }
        if line.unit_cost < Decimal::ZERO {
            return Err(InputViolation::new(
                format!("lines[{}].unit_cost", index),
                "unit cost cannot be negative",
            ));
        }
    }
    Ok(())
}
