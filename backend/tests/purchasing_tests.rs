//! Purchase order orchestrator tests
//!
//! Covers the placement state machine: header failure, fail-fast line
//! appends, ambiguous outcomes, zero-quantity lines, resume, and the
//! single stale-session retry.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use salon_supply_backend::error::{AppError, AppResult};
use salon_supply_backend::external::platform::{AuthGrant, PlatformApi, Session};
use salon_supply_backend::services::purchasing::PurchaseOrderService;
use salon_supply_backend::services::session::SessionCache;
use shared::models::{OrderDraft, OrderFailure, OrderLine, OrderState, StockPosition};

/// Scripted behavior for one line append, consumed in order
#[derive(Clone)]
enum LineBehavior {
    Succeed,
    Reject(u16),
    Timeout,
}

/// Platform fake that scripts header and line-append outcomes
struct ScriptedPurchasePlatform {
    header_status: Option<u16>,
    line_script: Mutex<Vec<LineBehavior>>,
    appended: Mutex<Vec<(String, String, i64)>>,
    auth_calls: AtomicUsize,
    header_calls: AtomicUsize,
}

impl ScriptedPurchasePlatform {
    fn new(line_script: Vec<LineBehavior>) -> Self {
        Self {
            header_status: None,
            line_script: Mutex::new(line_script),
            appended: Mutex::new(Vec::new()),
            auth_calls: AtomicUsize::new(0),
            header_calls: AtomicUsize::new(0),
        }
    }

    fn with_failing_header(status: u16) -> Self {
        Self {
            header_status: Some(status),
            ..Self::new(Vec::new())
        }
    }

    fn appended_count(&self) -> usize {
        self.appended.lock().unwrap().len()
    }
}

#[async_trait]
impl PlatformApi for ScriptedPurchasePlatform {
    async fn authenticate(&self) -> AppResult<AuthGrant> {
        self.auth_calls.fetch_add(1, Ordering::SeqCst);
        Ok(AuthGrant {
            token: "token".to_string(),
            server_host: "api.platform.example".to_string(),
        })
    }

    async fn resolve_skus(
        &self,
        _session: &Session,
        _skus: &[String],
    ) -> AppResult<HashMap<String, String>> {
        unreachable!("purchasing tests never resolve SKUs")
    }

    async fn stock_levels(
        &self,
        _session: &Session,
        _product_ids: &[String],
        _include_supplier: bool,
    ) -> AppResult<HashMap<String, StockPosition>> {
        unreachable!("purchasing tests never read stock")
    }

    async fn create_purchase_header(
        &self,
        _session: &Session,
        _draft: &OrderDraft,
    ) -> AppResult<String> {
        self.header_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = self.header_status {
            return Err(AppError::UpstreamUnavailable {
                status,
                body: "header rejected".to_string(),
            });
        }
        Ok("PO-1".to_string())
    }

    async fn append_purchase_line(
        &self,
        _session: &Session,
        purchase_id: &str,
        line: &OrderLine,
    ) -> AppResult<()> {
        let behavior = {
            let mut script = self.line_script.lock().unwrap();
            if script.is_empty() {
                LineBehavior::Succeed
            } else {
                script.remove(0)
            }
        };
        match behavior {
            LineBehavior::Succeed => {
                self.appended.lock().unwrap().push((
                    purchase_id.to_string(),
                    line.stock_item_id.clone(),
                    line.qty,
                ));
                Ok(())
            }
            LineBehavior::Reject(status) => Err(AppError::UpstreamUnavailable {
                status,
                body: "line rejected".to_string(),
            }),
            LineBehavior::Timeout => Err(AppError::AmbiguousOutcome {
                message: "line append timed out in flight".to_string(),
            }),
        }
    }
}

fn service(platform: Arc<ScriptedPurchasePlatform>) -> PurchaseOrderService {
    let sessions = Arc::new(SessionCache::new(
        platform.clone(),
        Duration::from_secs(25 * 60),
    ));
    PurchaseOrderService::new(platform, sessions)
}

fn line(item: &str, qty: i64) -> OrderLine {
    OrderLine {
        stock_item_id: item.to_string(),
        qty,
        unit_cost: Decimal::new(895, 2),
    }
}

fn draft(lines: Vec<OrderLine>) -> OrderDraft {
    OrderDraft {
        supplier_id: "SUP-7".to_string(),
        location_id: "LOC-MAIN".to_string(),
        currency: "GBP".to_string(),
        delivery_date: NaiveDate::from_ymd_opt(2026, 9, 15).unwrap(),
        lines,
    }
}

#[tokio::test]
async fn complete_order_appends_every_line() {
    let platform = Arc::new(ScriptedPurchasePlatform::new(Vec::new()));
    let service = service(platform.clone());

    let result = service
        .place_order(&draft(vec![line("A", 10), line("B", 20), line("C", 30)]))
        .await
        .unwrap();

    assert_eq!(result.state, OrderState::Complete);
    assert_eq!(result.purchase_id.as_deref(), Some("PO-1"));
    assert_eq!(result.lines_appended, 3);
    assert_eq!(result.total_lines, 3);
    assert!(result.failure.is_none());
    assert_eq!(platform.appended_count(), 3);
}

#[tokio::test]
async fn line_failure_stops_processing_and_reports_cursor() {
    // line at index 1 is rejected with 422; index 2 must never be sent
    let platform = Arc::new(ScriptedPurchasePlatform::new(vec![
        LineBehavior::Succeed,
        LineBehavior::Reject(422),
    ]));
    let service = service(platform.clone());

    let result = service
        .place_order(&draft(vec![line("A", 10), line("B", 20), line("C", 30)]))
        .await
        .unwrap();

    assert_eq!(result.state, OrderState::PartiallyFailed);
    assert_eq!(result.purchase_id.as_deref(), Some("PO-1"));
    assert_eq!(result.lines_appended, 1);
    assert_eq!(result.next_line_index(), 1);
    match result.failure {
        Some(OrderFailure::LineAppendFailed {
            index,
            status,
            ref body,
        }) => {
            assert_eq!(index, 1);
            assert_eq!(status, Some(422));
            assert_eq!(body, "line rejected");
        }
        ref other => panic!("expected LineAppendFailed, got {:?}", other),
    }
    assert_eq!(platform.appended_count(), 1);
}

#[tokio::test]
async fn header_failure_reports_no_purchase_id() {
    let platform = Arc::new(ScriptedPurchasePlatform::with_failing_header(500));
    let service = service(platform.clone());

    let result = service
        .place_order(&draft(vec![line("A", 10)]))
        .await
        .unwrap();

    assert_eq!(result.state, OrderState::NotStarted);
    assert!(result.purchase_id.is_none());
    assert_eq!(result.lines_appended, 0);
    match result.failure {
        Some(OrderFailure::HeaderCreationFailed { status, .. }) => {
            assert_eq!(status, Some(500))
        }
        ref other => panic!("expected HeaderCreationFailed, got {:?}", other),
    }
    assert_eq!(platform.appended_count(), 0);
}

#[tokio::test]
async fn timeout_mid_append_surfaces_ambiguous_outcome() {
    let platform = Arc::new(ScriptedPurchasePlatform::new(vec![
        LineBehavior::Succeed,
        LineBehavior::Timeout,
    ]));
    let service = service(platform.clone());

    let result = service
        .place_order(&draft(vec![line("A", 10), line("B", 20), line("C", 30)]))
        .await
        .unwrap();

    assert_eq!(result.state, OrderState::PartiallyFailed);
    assert_eq!(result.lines_appended, 1);
    match result.failure {
        Some(OrderFailure::AmbiguousOutcome { index, .. }) => assert_eq!(index, 1),
        ref other => panic!("expected AmbiguousOutcome, got {:?}", other),
    }
    // the ambiguous line is not counted as appended, and nothing after it
    // was attempted
    assert_eq!(platform.appended_count(), 1);
}

#[tokio::test]
async fn zero_quantity_lines_are_skipped_silently() {
    let platform = Arc::new(ScriptedPurchasePlatform::new(Vec::new()));
    let service = service(platform.clone());

    let result = service
        .place_order(&draft(vec![line("A", 10), line("B", 0), line("C", 30)]))
        .await
        .unwrap();

    assert_eq!(result.state, OrderState::Complete);
    assert_eq!(result.lines_appended, 2);
    assert_eq!(result.total_lines, 2);
    assert_eq!(platform.appended_count(), 2);
}

#[tokio::test]
async fn all_zero_quantities_place_no_order() {
    let platform = Arc::new(ScriptedPurchasePlatform::new(Vec::new()));
    let service = service(platform.clone());

    let result = service
        .place_order(&draft(vec![line("A", 0), line("B", 0)]))
        .await
        .unwrap();

    assert_eq!(result.state, OrderState::NotStarted);
    assert!(result.purchase_id.is_none());
    assert!(result.failure.is_none());
    // no header was created for an empty order
    assert_eq!(platform.header_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn negative_quantity_is_a_contract_violation() {
    let platform = Arc::new(ScriptedPurchasePlatform::new(Vec::new()));
    let service = service(platform.clone());

    let err = service
        .place_order(&draft(vec![line("A", -5)]))
        .await
        .unwrap_err();

    match err {
        AppError::Validation { field, .. } => assert_eq!(field, "lines[0].qty"),
        other => panic!("expected Validation, got {:?}", other),
    }
    assert_eq!(platform.header_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn resume_appends_only_remaining_lines() {
    let platform = Arc::new(ScriptedPurchasePlatform::new(Vec::new()));
    let service = service(platform.clone());

    let result = service
        .resume_order("PO-9", &[line("B", 20), line("C", 30)])
        .await
        .unwrap();

    assert_eq!(result.state, OrderState::Complete);
    assert_eq!(result.purchase_id.as_deref(), Some("PO-9"));
    assert_eq!(result.lines_appended, 2);
    // resume never recreates the header
    assert_eq!(platform.header_calls.load(Ordering::SeqCst), 0);

    let appended = platform.appended.lock().unwrap();
    assert!(appended.iter().all(|(purchase, _, _)| purchase == "PO-9"));
}

#[tokio::test]
async fn resume_requires_a_purchase_id() {
    let platform = Arc::new(ScriptedPurchasePlatform::new(Vec::new()));
    let service = service(platform.clone());

    let err = service.resume_order("  ", &[line("B", 20)]).await.unwrap_err();
    match err {
        AppError::Validation { field, .. } => assert_eq!(field, "purchase_id"),
        other => panic!("expected Validation, got {:?}", other),
    }
}

#[tokio::test]
async fn rejected_token_on_append_is_retried_once_with_fresh_session() {
    let platform = Arc::new(ScriptedPurchasePlatform::new(vec![
        LineBehavior::Reject(401),
        LineBehavior::Succeed,
    ]));
    let service = service(platform.clone());

    let result = service
        .place_order(&draft(vec![line("A", 10)]))
        .await
        .unwrap();

    assert_eq!(result.state, OrderState::Complete);
    assert_eq!(result.lines_appended, 1);
    // initial acquire plus the forced refresh after the 401
    assert_eq!(platform.auth_calls.load(Ordering::SeqCst), 2);
}
