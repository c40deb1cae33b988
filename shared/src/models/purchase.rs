//! Purchase order models
//!
//! A purchase order is created on the external platform in steps: one
//! header, then one call per line. The platform offers no multi-step
//! transaction, so results carry the exact progress made (including a
//! resumable cursor) instead of collapsing partial success into an error.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A purchase order to be submitted to the external platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDraft {
    pub supplier_id: String,
    pub location_id: String,
    pub currency: String,
    pub delivery_date: NaiveDate,
    /// Lines are appended in this order
    pub lines: Vec<OrderLine>,
}

/// One line of a purchase order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub stock_item_id: String,
    /// Zero is valid and means "skip this line"
    pub qty: i64,
    pub unit_cost: Decimal,
}

/// Placement state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderState {
    NotStarted,
    HeaderCreated,
    Complete,
    PartiallyFailed,
}

/// What went wrong during a placement, with enough detail for an operator
/// to inspect or resume the half-created order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OrderFailure {
    /// The header create was rejected; no side effect occurred. Status is
    /// absent when the request never reached the platform.
    HeaderCreationFailed {
        status: Option<u16>,
        body: String,
    },
    /// A specific line was rejected after the header and prior lines
    /// succeeded. Index is zero-based over the submitted lines.
    LineAppendFailed {
        index: usize,
        status: Option<u16>,
        body: String,
    },
    /// A line append timed out in flight: the outcome is unknown and must
    /// be reconciled against the platform before resuming.
    AmbiguousOutcome {
        index: usize,
        message: String,
    },
}

/// Outcome of a placement attempt, complete or not
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResult {
    /// Correlation id for this placement attempt, stamped in every log line
    pub placement_id: Uuid,
    /// Platform-assigned purchase identifier. None only when header
    /// creation failed.
    pub purchase_id: Option<String>,
    /// Lines successfully appended by this attempt
    pub lines_appended: usize,
    /// Lines this attempt set out to append (zero-quantity lines excluded)
    pub total_lines: usize,
    pub state: OrderState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<OrderFailure>,
}

impl OrderResult {
    pub fn is_complete(&self) -> bool {
        self.state == OrderState::Complete
    }

    /// Cursor for resuming a partially failed placement: the index of the
    /// first line not known to have been appended.
    pub fn next_line_index(&self) -> usize {
        self.lines_appended
    }
}
