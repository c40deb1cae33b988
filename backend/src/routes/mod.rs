//! Route definitions for the Salon Supply CRM replenishment API

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Replenishment engine
        .nest("/replenishment", replenishment_routes())
}

/// Forecast-and-order pipeline routes
fn replenishment_routes() -> Router<AppState> {
    Router::new()
        .route("/forecast", post(handlers::compute_forecast))
        .route("/stock-positions", post(handlers::get_stock_positions))
        .route("/advise", post(handlers::advise))
        .route("/orders", post(handlers::place_order))
        .route("/orders/:purchase_id/resume", post(handlers::resume_order))
        .route("/replenish", post(handlers::replenish))
}
