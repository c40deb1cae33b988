//! HTTP client for the external inventory/ordering platform

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use shared::models::{OrderDraft, OrderLine, StockPosition, SupplierInfo};

use crate::config::PlatformConfig;
use crate::error::{AppError, AppResult};
use crate::external::platform::{AuthGrant, PlatformApi, Session};

/// Reqwest-backed implementation of the platform operations
#[derive(Clone)]
pub struct HttpPlatformApi {
    client: Client,
    auth_url: String,
    api_id: String,
    api_key: String,
    install_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StockLevelsRequest<'a> {
    product_ids: &'a [String],
    include_supplier: bool,
}

#[derive(Deserialize)]
struct SkuLookupResponse {
    items: Vec<SkuMatch>,
}

#[derive(Deserialize)]
struct SkuMatch {
    id: String,
    sku: String,
}

#[derive(Deserialize)]
struct StockLevelsResponse {
    items: Vec<StockLevelItem>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StockLevelItem {
    product_id: String,
    on_hand: i64,
    reserved: i64,
    due: i64,
    supplier: Option<SupplierItem>,
}

#[derive(Deserialize)]
struct SupplierItem {
    id: String,
    name: String,
    currency: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PurchaseHeaderRequest<'a> {
    supplier_id: &'a str,
    location_id: &'a str,
    currency: &'a str,
    delivery_date: chrono::NaiveDate,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PurchaseHeaderResponse {
    purchase_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PurchaseLineRequest<'a> {
    stock_item_id: &'a str,
    quantity: i64,
    unit_cost: Decimal,
}

impl HttpPlatformApi {
    /// Build a client with the configured per-request timeout
    pub fn new(config: &PlatformConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            auth_url: config.auth_url.clone(),
            api_id: config.api_id.clone(),
            api_key: config.api_key.clone(),
            install_token: config.install_token.clone(),
        })
    }

    fn bearer(&self, session: &Session) -> String {
        format!("Bearer {}", session.token)
    }

    /// Drain a non-success response into an `UpstreamUnavailable`
    async fn upstream_error(response: reqwest::Response) -> AppError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        AppError::UpstreamUnavailable { status, body }
    }
}

#[async_trait]
impl PlatformApi for HttpPlatformApi {
    async fn authenticate(&self) -> AppResult<AuthGrant> {
        let response = self
            .client
            .post(&self.auth_url)
            .json(&json!({
                "appId": self.api_id,
                "appSecret": self.api_key,
                "installToken": self.install_token,
            }))
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalService(format!("platform authentication request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::AuthenticationFailed { status, body });
        }

        let grant: AuthGrant = response.json().await.map_err(|e| {
            AppError::AuthenticationFailed {
                status: 200,
                body: format!("malformed authentication response: {}", e),
            }
        })?;

        Ok(grant)
    }

    async fn resolve_skus(
        &self,
        session: &Session,
        skus: &[String],
    ) -> AppResult<HashMap<String, String>> {
        let url = format!("{}/products/lookup", session.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.bearer(session))
            .json(&json!({ "skus": skus }))
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("SKU lookup request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::upstream_error(response).await);
        }

        let data: SkuLookupResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("failed to parse SKU lookup response: {}", e))
        })?;

        Ok(data
            .items
            .into_iter()
            .map(|item| (item.sku, item.id))
            .collect())
    }

    async fn stock_levels(
        &self,
        session: &Session,
        product_ids: &[String],
        include_supplier: bool,
    ) -> AppResult<HashMap<String, StockPosition>> {
        let url = format!("{}/stock-levels", session.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.bearer(session))
            .json(&StockLevelsRequest {
                product_ids,
                include_supplier,
            })
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalService(format!("stock level request failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(Self::upstream_error(response).await);
        }

        let data: StockLevelsResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("failed to parse stock level response: {}", e))
        })?;

        Ok(data
            .items
            .into_iter()
            .map(|item| {
                (
                    item.product_id,
                    StockPosition {
                        on_hand: item.on_hand,
                        in_order_book: item.reserved,
                        due: item.due,
                        supplier: item.supplier.map(|s| SupplierInfo {
                            id: s.id,
                            name: s.name,
                            currency: s.currency,
                        }),
                    },
                )
            })
            .collect())
    }

    async fn create_purchase_header(
        &self,
        session: &Session,
        draft: &OrderDraft,
    ) -> AppResult<String> {
        let url = format!("{}/purchases", session.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.bearer(session))
            .json(&PurchaseHeaderRequest {
                supplier_id: &draft.supplier_id,
                location_id: &draft.location_id,
                currency: &draft.currency,
                delivery_date: draft.delivery_date,
            })
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalService(format!("purchase header request failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(Self::upstream_error(response).await);
        }

        let data: PurchaseHeaderResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("failed to parse purchase header response: {}", e))
        })?;

        Ok(data.purchase_id)
    }

    async fn append_purchase_line(
        &self,
        session: &Session,
        purchase_id: &str,
        line: &OrderLine,
    ) -> AppResult<()> {
        let url = format!("{}/purchases/{}/lines", session.base_url, purchase_id);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.bearer(session))
            .json(&PurchaseLineRequest {
                stock_item_id: &line.stock_item_id,
                quantity: line.qty,
                unit_cost: line.unit_cost,
            })
            .send()
            .await
            .map_err(|e| {
                // Once a line append is in flight its outcome must be
                // learned; a timeout leaves it unknown on the platform side.
                if e.is_timeout() {
                    AppError::AmbiguousOutcome {
                        message: format!(
                            "line append to purchase {} timed out in flight: {}",
                            purchase_id, e
                        ),
                    }
                } else {
                    AppError::ExternalService(format!("line append request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            return Err(Self::upstream_error(response).await);
        }

        Ok(())
    }
}
