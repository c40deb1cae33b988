//! HTTP handlers for stock position reads

use std::collections::HashMap;

use axum::{extract::State, Json};
use serde::Deserialize;
use shared::types::ProductKey;

use crate::error::AppResult;
use crate::services::stock::{StockPositionReader, StockRecord};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct StockPositionsRequest {
    pub products: Vec<ProductKey>,
    #[serde(default)]
    pub include_supplier: bool,
}

/// Fetch current stock positions for a batch of products
pub async fn get_stock_positions(
    State(state): State<AppState>,
    Json(request): Json<StockPositionsRequest>,
) -> AppResult<Json<HashMap<String, StockRecord>>> {
    let reader = StockPositionReader::new(state.platform.clone(), state.sessions.clone());
    let positions = reader
        .positions(&request.products, request.include_supplier)
        .await?;
    Ok(Json(positions))
}
