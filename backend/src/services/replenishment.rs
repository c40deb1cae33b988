//! Forecast-and-order pipeline
//!
//! Composes the stock position reader, the forecast calculator, and the
//! purchase orchestrator: read current positions for a batch of products,
//! compute a recommended quantity per product, and optionally turn the
//! recommendations into one purchase order.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::{
    DemandProfile, ForecastInputs, ForecastPolicy, ForecastResult, OrderDraft, OrderLine,
    OrderResult, StockPosition,
};
use shared::types::ProductKey;

use crate::error::{AppError, AppResult};
use crate::external::platform::PlatformApi;
use crate::services::forecast::compute_forecast;
use crate::services::purchasing::PurchaseOrderService;
use crate::services::session::SessionCache;
use crate::services::stock::StockPositionReader;

/// Demand statistics and ordering constraints for one product
#[derive(Debug, Clone, Deserialize)]
pub struct ProductPlan {
    pub product: ProductKey,
    pub demand: DemandProfile,
    #[serde(default)]
    pub pack_size: Option<u32>,
    #[serde(default)]
    pub moq: Option<u32>,
    pub unit_cost: Decimal,
}

/// Replenishment recommendation for one product
#[derive(Debug, Clone, Serialize)]
pub struct ReplenishmentAdvice {
    pub product: ProductKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<StockPosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast: Option<ForecastResult>,
    /// Set when no recommendation could be made (e.g. unknown SKU)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<String>,
}

/// A full pipeline request: who to order from, where to, and what demand
/// looks like per product
#[derive(Debug, Clone, Deserialize)]
pub struct ReplenishmentRequest {
    pub supplier_id: String,
    pub location_id: String,
    pub currency: String,
    pub delivery_date: NaiveDate,
    pub products: Vec<ProductPlan>,
}

/// Pipeline outcome: the per-product advice, plus the placement result
/// when an order was actually needed
#[derive(Debug, Clone, Serialize)]
pub struct ReplenishmentOutcome {
    pub advices: Vec<ReplenishmentAdvice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<OrderResult>,
}

pub struct ReplenishmentService {
    stock: StockPositionReader,
    purchasing: PurchaseOrderService,
    policy: ForecastPolicy,
}

impl ReplenishmentService {
    pub fn new(
        platform: Arc<dyn PlatformApi>,
        sessions: Arc<SessionCache>,
        policy: ForecastPolicy,
    ) -> Self {
        Self {
            stock: StockPositionReader::new(platform.clone(), sessions.clone()),
            purchasing: PurchaseOrderService::new(platform, sessions),
            policy,
        }
    }

    /// Compute a recommendation per product from live stock positions.
    ///
    /// Products whose SKU the platform does not recognize are reported as
    /// skipped, never as errors: the rest of the batch still gets advice.
    pub async fn advise(&self, plans: &[ProductPlan]) -> AppResult<Vec<ReplenishmentAdvice>> {
        if plans.is_empty() {
            return Err(AppError::Validation {
                field: "products".to_string(),
                message: "at least one product is required".to_string(),
            });
        }

        let keys: Vec<ProductKey> = plans.iter().map(|plan| plan.product.clone()).collect();
        let records = self.stock.positions(&keys, false).await?;

        let mut advices = Vec::with_capacity(plans.len());
        for plan in plans {
            let Some(record) = records.get(plan.product.key()) else {
                advices.push(ReplenishmentAdvice {
                    product: plan.product.clone(),
                    platform_id: None,
                    position: None,
                    forecast: None,
                    skipped: Some("not known to the inventory platform".to_string()),
                });
                continue;
            };

            let inputs = ForecastInputs {
                demand: plan.demand.clone(),
                on_hand: record.position.on_hand,
                in_order_book: record.position.in_order_book,
                due: record.position.due,
                pack_size: plan.pack_size,
                moq: plan.moq,
            };
            let forecast = compute_forecast(&inputs, &self.policy)?;
            advices.push(ReplenishmentAdvice {
                product: plan.product.clone(),
                platform_id: Some(record.platform_id.clone()),
                position: Some(record.position.clone()),
                forecast: Some(forecast),
                skipped: None,
            });
        }

        Ok(advices)
    }

    /// Run the whole pipeline: advise, then place one purchase order for
    /// every product that needs replenishing.
    ///
    /// When every recommended quantity is zero no order is placed and the
    /// outcome carries no placement result.
    pub async fn replenish(
        &self,
        request: &ReplenishmentRequest,
    ) -> AppResult<ReplenishmentOutcome> {
        let advices = self.advise(&request.products).await?;

        let lines: Vec<OrderLine> = advices
            .iter()
            .zip(&request.products)
            .filter_map(|(advice, plan)| {
                let platform_id = advice.platform_id.as_ref()?;
                let forecast = advice.forecast.as_ref()?;
                (forecast.qty > 0).then(|| OrderLine {
                    stock_item_id: platform_id.clone(),
                    qty: forecast.qty,
                    unit_cost: plan.unit_cost,
                })
            })
            .collect();

        if lines.is_empty() {
            tracing::info!("no product needs replenishing, skipping order placement");
            return Ok(ReplenishmentOutcome {
                advices,
                order: None,
            });
        }

        let draft = OrderDraft {
            supplier_id: request.supplier_id.clone(),
            location_id: request.location_id.clone(),
            currency: request.currency.clone(),
            delivery_date: request.delivery_date,
            lines,
        };
        let order = self.purchasing.place_order(&draft).await?;

        Ok(ReplenishmentOutcome {
            advices,
            order: Some(order),
        })
    }
}
