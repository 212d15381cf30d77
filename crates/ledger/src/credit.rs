//! Credit memo record - an adjustment issued against an invoice

use chrono::{DateTime, Utc};
use custodia_core::Amount;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use uuid::Uuid;

/// Business reason for a credit memo
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CreditReason {
    Overcharge,
    Return,
    Damage,
    Goodwill,
    Correction,
}

/// A credit memo against an invoice.
///
/// Credits reduce what the client owes but never flip invoice status.
/// The ceiling check (amount vs. what is still creditable) lives in
/// [`crate::reconcile::check_credit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditMemo {
    /// Opaque stable identifier
    pub id: String,

    /// Human-facing document number, e.g. `CM-2025-00008`
    pub number: String,

    pub invoice_id: String,

    pub amount: Amount,

    pub reason: CreditReason,

    pub notes: Option<String>,

    pub issued_at: DateTime<Utc>,
}

impl CreditMemo {
    /// Issue a credit memo now, with a fresh id
    pub fn new(
        number: impl Into<String>,
        invoice_id: impl Into<String>,
        amount: Amount,
        reason: CreditReason,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            number: number.into(),
            invoice_id: invoice_id.into(),
            amount,
            reason,
            notes: None,
            issued_at: Utc::now(),
        }
    }
}
