//! Demand forecast calculator
//!
//! Pure reorder-point arithmetic: no I/O, no shared state, safe to invoke
//! concurrently without coordination.

use shared::models::{ForecastInputs, ForecastPolicy, ForecastResult};
use shared::validation::validate_forecast_inputs;

use crate::error::{AppError, AppResult};

/// Compute a recommended order quantity for one product.
///
/// Safety stock uses the z-score formula when a demand-variability
/// estimate exists; otherwise it falls back to a configured fraction of
/// mean demand over the coverage window, since slow-moving SKUs often
/// have no usable variance estimate. Pack-size rounding always rounds up,
/// and the minimum order quantity is applied after pack rounding so an
/// off-pack MOQ still wins. Zero, never negative, is the floor.
pub fn compute_forecast(
    inputs: &ForecastInputs,
    policy: &ForecastPolicy,
) -> AppResult<ForecastResult> {
    validate_forecast_inputs(inputs).map_err(|v| AppError::InvalidForecastInput {
        field: v.field,
        message: v.message,
    })?;

    let demand = &inputs.demand;
    // Coverage window: lead time, extra buffer, and one review cycle
    let coverage_days = demand.lead_time_days + demand.buffer_days + demand.review_days;

    let safety = match demand.daily_std_dev {
        Some(std_dev) if std_dev > 0.0 => {
            demand.service_level_z * std_dev * coverage_days.sqrt()
        }
        _ => policy.fallback_safety_ratio * demand.avg_daily * coverage_days,
    };

    let rop = demand.avg_daily * coverage_days + safety;
    let target = rop + demand.avg_daily * demand.horizon_days;
    let net_position = (inputs.on_hand - inputs.in_order_book + inputs.due) as f64;

    let mut qty = (target - net_position).ceil().max(0.0) as i64;

    if let Some(pack_size) = inputs.pack_size {
        let pack = i64::from(pack_size);
        let remainder = qty % pack;
        if remainder != 0 {
            qty += pack - remainder;
        }
    }
    if let Some(moq) = inputs.moq {
        qty = qty.max(i64::from(moq));
    }

    Ok(ForecastResult {
        qty,
        rop,
        safety,
        target,
        net_position,
    })
}
