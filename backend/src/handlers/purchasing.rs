//! HTTP handlers for purchase order placement

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use shared::models::{OrderDraft, OrderLine, OrderResult};

use crate::error::AppResult;
use crate::services::purchasing::PurchaseOrderService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ResumeOrderRequest {
    pub lines: Vec<OrderLine>,
}

/// Place a purchase order.
///
/// Always answers with the placement result, partial state included, so a
/// half-created order stays actionable for the operator.
pub async fn place_order(
    State(state): State<AppState>,
    Json(draft): Json<OrderDraft>,
) -> AppResult<Json<OrderResult>> {
    let service = PurchaseOrderService::new(state.platform.clone(), state.sessions.clone());
    let result = service.place_order(&draft).await?;
    Ok(Json(result))
}

/// Append the remaining lines of a partially placed order
pub async fn resume_order(
    State(state): State<AppState>,
    Path(purchase_id): Path<String>,
    Json(request): Json<ResumeOrderRequest>,
) -> AppResult<Json<OrderResult>> {
    let service = PurchaseOrderService::new(state.platform.clone(), state.sessions.clone());
    let result = service.resume_order(&purchase_id, &request.lines).await?;
    Ok(Json(result))
}
