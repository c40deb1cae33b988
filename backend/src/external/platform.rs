//! External inventory/ordering platform operations
//!
//! The platform is reachable only through these operations. Request and
//! response shapes live in the HTTP client; only the semantics here are
//! contractual.

use std::collections::HashMap;
use std::time::Instant;

use async_trait::async_trait;
use serde::Deserialize;
use shared::models::{OrderDraft, OrderLine, StockPosition};

use crate::error::AppResult;

/// A live authenticated session with the platform.
///
/// Process-lifetime only, never persisted. Owned by the session cache and
/// handed to callers as an immutable snapshot.
#[derive(Debug, Clone)]
pub struct Session {
    /// Bearer token for the authorization header
    pub token: String,
    /// Normalized API base: explicit scheme, no trailing slash
    pub base_url: String,
    /// When this session was obtained, for the freshness window
    pub fetched_at: Instant,
}

/// Result of the credential exchange
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthGrant {
    pub token: String,
    /// Host (or full URL) the platform wants subsequent calls sent to
    pub server_host: String,
}

/// The documented operations on the external platform.
///
/// Implemented over HTTP in production and by in-memory fakes in tests.
#[async_trait]
pub trait PlatformApi: Send + Sync {
    /// Exchange static credentials for a bearer token and serving host
    async fn authenticate(&self) -> AppResult<AuthGrant>;

    /// Resolve SKUs to platform-internal ids. Partial results are allowed:
    /// unmatched SKUs are simply absent from the map.
    async fn resolve_skus(
        &self,
        session: &Session,
        skus: &[String],
    ) -> AppResult<HashMap<String, String>>;

    /// Bulk stock lookup by platform-internal id, optionally with supplier
    /// metadata on the same round trip
    async fn stock_levels(
        &self,
        session: &Session,
        product_ids: &[String],
        include_supplier: bool,
    ) -> AppResult<HashMap<String, StockPosition>>;

    /// Create a purchase-order header; returns the platform-assigned
    /// purchase identifier. Not guaranteed idempotent.
    async fn create_purchase_header(
        &self,
        session: &Session,
        draft: &OrderDraft,
    ) -> AppResult<String>;

    /// Append one line to an existing purchase order. Not safe for
    /// concurrent writers on the same purchase.
    async fn append_purchase_line(
        &self,
        session: &Session,
        purchase_id: &str,
        line: &OrderLine,
    ) -> AppResult<()>;
}
