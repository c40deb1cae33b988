//! HTTP handlers for the forecast-and-order pipeline

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::error::AppResult;
use crate::services::replenishment::{
    ProductPlan, ReplenishmentAdvice, ReplenishmentOutcome, ReplenishmentRequest,
    ReplenishmentService,
};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AdviseRequest {
    pub products: Vec<ProductPlan>,
}

/// Compute replenishment advice for a batch of products from live stock
/// positions
pub async fn advise(
    State(state): State<AppState>,
    Json(request): Json<AdviseRequest>,
) -> AppResult<Json<Vec<ReplenishmentAdvice>>> {
    let service = ReplenishmentService::new(
        state.platform.clone(),
        state.sessions.clone(),
        state.config.replenishment.forecast_policy(),
    );
    let advices = service.advise(&request.products).await?;
    Ok(Json(advices))
}

/// Run the full pipeline: advise, then place an order for everything that
/// needs replenishing
pub async fn replenish(
    State(state): State<AppState>,
    Json(request): Json<ReplenishmentRequest>,
) -> AppResult<Json<ReplenishmentOutcome>> {
    let service = ReplenishmentService::new(
        state.platform.clone(),
        state.sessions.clone(),
        state.config.replenishment.forecast_policy(),
    );
    let outcome = service.replenish(&request).await?;
    Ok(Json(outcome))
}
