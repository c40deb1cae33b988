//! HTTP handlers for demand forecasting

use axum::{extract::State, Json};
use shared::models::{ForecastInputs, ForecastResult};

use crate::error::AppResult;
use crate::services::forecast;
use crate::AppState;

/// Compute a recommended order quantity from demand statistics and the
/// current stock position
pub async fn compute_forecast(
    State(state): State<AppState>,
    Json(inputs): Json<ForecastInputs>,
) -> AppResult<Json<ForecastResult>> {
    let policy = state.config.replenishment.forecast_policy();
    let result = forecast::compute_forecast(&inputs, &policy)?;
    Ok(Json(result))
}
