//! Purchase order placement against the external platform
//!
//! The platform offers no multi-step transaction: a placement is one
//! header create followed by one call per line, strictly sequential. A
//! failed line stops processing immediately and the result reports the
//! exact progress made, so an operator can resume or reconcile a
//! half-created order instead of losing track of it.

use std::sync::Arc;

use rust_decimal::Decimal;
use shared::models::{OrderDraft, OrderFailure, OrderLine, OrderResult, OrderState};
use shared::validation::validate_order_draft;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::external::platform::PlatformApi;
use crate::services::session::SessionCache;

pub struct PurchaseOrderService {
    platform: Arc<dyn PlatformApi>,
    sessions: Arc<SessionCache>,
}

impl PurchaseOrderService {
    pub fn new(platform: Arc<dyn PlatformApi>, sessions: Arc<SessionCache>) -> Self {
        Self { platform, sessions }
    }

    /// Place a purchase order: create the header, then append each line in
    /// caller-supplied order.
    ///
    /// Header failure terminates with no side effect and no purchase id.
    /// A line failure stops processing; the result carries the purchase id
    /// and the failing line's detail. No automatic retry of the header or
    /// of individual lines: the header create is not idempotent, and
    /// re-appending a line whose outcome was lost could double it.
    pub async fn place_order(&self, draft: &OrderDraft) -> AppResult<OrderResult> {
        validate_order_draft(draft)?;

        let placement_id = Uuid::new_v4();
        let total_lines = draft.lines.iter().filter(|line| line.qty > 0).count();
        if total_lines == 0 {
            // every line said "no replenishment needed"
            tracing::info!(%placement_id, "all lines are zero-quantity, no order placed");
            return Ok(OrderResult {
                placement_id,
                purchase_id: None,
                lines_appended: 0,
                total_lines: 0,
                state: OrderState::NotStarted,
                failure: None,
            });
        }

        tracing::info!(
            %placement_id,
            supplier = %draft.supplier_id,
            location = %draft.location_id,
            lines = total_lines,
            "placing purchase order"
        );

        let purchase_id = match self.create_header(draft).await {
            Ok(id) => id,
            Err(err) => {
                let failure = header_failure(err)?;
                tracing::warn!(%placement_id, ?failure, "purchase header creation failed");
                return Ok(OrderResult {
                    placement_id,
                    purchase_id: None,
                    lines_appended: 0,
                    total_lines,
                    state: OrderState::NotStarted,
                    failure: Some(failure),
                });
            }
        };
        tracing::info!(%placement_id, %purchase_id, "purchase header created");

        self.append_lines(placement_id, &purchase_id, &draft.lines, total_lines)
            .await
    }

    /// Append the remaining lines of a partially placed order to its
    /// existing header.
    ///
    /// This is the bounded retry path: after a line failure the caller
    /// resubmits only the lines from the reported failing index onward,
    /// never the whole order.
    pub async fn resume_order(
        &self,
        purchase_id: &str,
        lines: &[OrderLine],
    ) -> AppResult<OrderResult> {
        if purchase_id.trim().is_empty() {
            return Err(AppError::Validation {
                field: "purchase_id".to_string(),
                message: "purchase id is required".to_string(),
            });
        }
        for (index, line) in lines.iter().enumerate() {
            if line.qty < 0 {
                return Err(AppError::Validation {
                    field: format!("lines[{}].qty", index),
                    message: "quantity cannot be negative".to_string(),
                });
            }
            if line.unit_cost < Decimal::ZERO {
                return Err(AppError::Validation {
                    field: format!("lines[{}].unit_cost", index),
                    message: "unit cost cannot be negative".to_string(),
                });
            }
        }

        let placement_id = Uuid::new_v4();
        let total_lines = lines.iter().filter(|line| line.qty > 0).count();
        tracing::info!(%placement_id, %purchase_id, lines = total_lines, "resuming purchase order");

        self.append_lines(placement_id, purchase_id, lines, total_lines)
            .await
    }

    async fn append_lines(
        &self,
        placement_id: Uuid,
        purchase_id: &str,
        lines: &[OrderLine],
        total_lines: usize,
    ) -> AppResult<OrderResult> {
        let mut appended = 0;
        for (index, line) in lines.iter().enumerate() {
            if line.qty == 0 {
                tracing::debug!(%placement_id, index, "skipping zero-quantity line");
                continue;
            }
            match self.append_line(purchase_id, line).await {
                Ok(()) => {
                    appended += 1;
                    tracing::debug!(
                        %placement_id,
                        %purchase_id,
                        index,
                        item = %line.stock_item_id,
                        qty = line.qty,
                        "line appended"
                    );
                }
                Err(err) => {
                    // Fail fast: later lines are not attempted, so the
                    // appended count is an exact resume cursor.
                    let failure = line_failure(index, err)?;
                    tracing::warn!(
                        %placement_id,
                        %purchase_id,
                        index,
                        appended,
                        ?failure,
                        "stopping placement after line failure"
                    );
                    return Ok(OrderResult {
                        placement_id,
                        purchase_id: Some(purchase_id.to_string()),
                        lines_appended: appended,
                        total_lines,
                        state: OrderState::PartiallyFailed,
                        failure: Some(failure),
                    });
                }
            }
        }

        tracing::info!(%placement_id, %purchase_id, lines = appended, "purchase order complete");
        Ok(OrderResult {
            placement_id,
            purchase_id: Some(purchase_id.to_string()),
            lines_appended: appended,
            total_lines,
            state: OrderState::Complete,
            failure: None,
        })
    }

    async fn create_header(&self, draft: &OrderDraft) -> AppResult<String> {
        let session = self.sessions.acquire().await?;
        match self.platform.create_purchase_header(&session, draft).await {
            Err(err) if err.is_stale_session() => {
                let session = self.sessions.force_refresh().await?;
                self.platform.create_purchase_header(&session, draft).await
            }
            other => other,
        }
    }

    async fn append_line(&self, purchase_id: &str, line: &OrderLine) -> AppResult<()> {
        let session = self.sessions.acquire().await?;
        match self
            .platform
            .append_purchase_line(&session, purchase_id, line)
            .await
        {
            Err(err) if err.is_stale_session() => {
                // a rejected token means the platform never processed the
                // line; retry the single call once with a fresh session
                let session = self.sessions.force_refresh().await?;
                self.platform
                    .append_purchase_line(&session, purchase_id, line)
                    .await
            }
            other => other,
        }
    }
}

fn header_failure(err: AppError) -> AppResult<OrderFailure> {
    match err {
        AppError::UpstreamUnavailable { status, body } => Ok(OrderFailure::HeaderCreationFailed {
            status: Some(status),
            body,
        }),
        AppError::ExternalService(message) => Ok(OrderFailure::HeaderCreationFailed {
            status: None,
            body: message,
        }),
        other => Err(other),
    }
}

fn line_failure(index: usize, err: AppError) -> AppResult<OrderFailure> {
    match err {
        AppError::UpstreamUnavailable { status, body } => Ok(OrderFailure::LineAppendFailed {
            index,
            status: Some(status),
            body,
        }),
        AppError::ExternalService(message) => Ok(OrderFailure::LineAppendFailed {
            index,
            status: None,
            body: message,
        }),
        AppError::AmbiguousOutcome { message } => {
            Ok(OrderFailure::AmbiguousOutcome { index, message })
        }
        other => Err(other),
    }
}
