//! Stock position reads against the external platform

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use shared::models::StockPosition;
use shared::types::ProductKey;

use crate::error::{AppError, AppResult};
use crate::external::platform::PlatformApi;
use crate::services::session::SessionCache;

/// Translates a batch of product identifiers into current stock positions.
///
/// Positions are snapshots, never cached here: every forecast must see
/// current external state.
pub struct StockPositionReader {
    platform: Arc<dyn PlatformApi>,
    sessions: Arc<SessionCache>,
}

/// A position keyed back to the identifier the caller asked with
#[derive(Debug, Clone, Serialize)]
pub struct StockRecord {
    /// Platform-internal id, usable directly in purchase order lines
    pub platform_id: String,
    #[serde(flatten)]
    pub position: StockPosition,
}

impl StockPositionReader {
    pub fn new(platform: Arc<dyn PlatformApi>, sessions: Arc<SessionCache>) -> Self {
        Self { platform, sessions }
    }

    /// Fetch current positions for a batch of products.
    ///
    /// SKUs are resolved to platform ids first; a SKU unknown to the
    /// platform is dropped from the result, not an error. Supplier
    /// metadata rides on the same bulk call when requested, avoiding a
    /// second round trip.
    pub async fn positions(
        &self,
        products: &[ProductKey],
        include_supplier: bool,
    ) -> AppResult<HashMap<String, StockRecord>> {
        if products.is_empty() {
            return Err(AppError::Validation {
                field: "products".to_string(),
                message: "at least one product identifier is required".to_string(),
            });
        }

        let skus: Vec<String> = products
            .iter()
            .filter(|key| key.is_sku())
            .map(|key| key.key().to_string())
            .collect();
        let resolved = if skus.is_empty() {
            HashMap::new()
        } else {
            self.resolve_skus(&skus).await?
        };

        // Caller key -> platform id; unresolved SKUs drop out here
        let mut requested: Vec<(String, String)> = Vec::with_capacity(products.len());
        for key in products {
            match key {
                ProductKey::PlatformId(id) => requested.push((id.clone(), id.clone())),
                ProductKey::Sku(sku) => match resolved.get(sku) {
                    Some(id) => requested.push((sku.clone(), id.clone())),
                    None => {
                        tracing::debug!(sku = %sku, "SKU not known to the platform, dropped");
                    }
                },
            }
        }

        if requested.is_empty() {
            return Ok(HashMap::new());
        }

        let ids: Vec<String> = requested.iter().map(|(_, id)| id.clone()).collect();
        let levels = self.stock_levels(&ids, include_supplier).await?;

        Ok(requested
            .into_iter()
            .filter_map(|(key, id)| {
                levels.get(&id).cloned().map(|position| {
                    (
                        key,
                        StockRecord {
                            platform_id: id,
                            position,
                        },
                    )
                })
            })
            .collect())
    }

    async fn resolve_skus(&self, skus: &[String]) -> AppResult<HashMap<String, String>> {
        let session = self.sessions.acquire().await?;
        match self.platform.resolve_skus(&session, skus).await {
            Ok(map) => Ok(map),
            Err(err) if err.is_stale_session() => {
                let session = self.sessions.force_refresh().await?;
                self.platform.resolve_skus(&session, skus).await
            }
            Err(AppError::UpstreamUnavailable { status, .. }) => {
                // the lookup is idempotent, retry the whole batch once
                tracing::warn!(status, "SKU lookup failed, retrying once");
                self.platform.resolve_skus(&session, skus).await
            }
            Err(other) => Err(other),
        }
    }

    async fn stock_levels(
        &self,
        ids: &[String],
        include_supplier: bool,
    ) -> AppResult<HashMap<String, StockPosition>> {
        let session = self.sessions.acquire().await?;
        match self
            .platform
            .stock_levels(&session, ids, include_supplier)
            .await
        {
            Ok(map) => Ok(map),
            Err(err) if err.is_stale_session() => {
                let session = self.sessions.force_refresh().await?;
                self.platform
                    .stock_levels(&session, ids, include_supplier)
                    .await
            }
            Err(AppError::UpstreamUnavailable { status, .. }) => {
                tracing::warn!(status, "stock level read failed, retrying once");
                self.platform
                    .stock_levels(&session, ids, include_supplier)
                    .await
            }
            Err(other) => Err(other),
        }
    }
}
