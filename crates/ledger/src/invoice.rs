//! Invoice record and its status graph
//!
//! ```text
//! draft ---> sent ---> paid
//!   |          |  \
//!   |          |   +-> overdue ---> paid
//!   |          |           |
//!   +----------+-----------+------> cancelled
//! ```
//!
//! `paid` and `cancelled` are terminal for caller-initiated changes. The
//! single backward edge `paid -> sent` is engine-derived: it exists only
//! through payment removal ([`crate::reconcile::apply_payment_removal`])
//! and is deliberately absent from this table.

use crate::error::LedgerError;
use chrono::{DateTime, NaiveDate, Utc};
use custodia_core::{Amount, Currency, Metadata};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use uuid::Uuid;

/// Billing status of an invoice
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InvoiceStatus {
    /// Being drafted; not yet presented to the client
    Draft,
    /// Presented to the client and awaiting settlement
    Sent,
    /// Settled in full by accepted payments
    Paid,
    /// Past due date without full settlement
    Overdue,
    /// Withdrawn; accepts no further money movement
    Cancelled,
}

impl InvoiceStatus {
    /// Statuses a caller may move this one to in a single step
    pub fn allowed_transitions(&self) -> &'static [InvoiceStatus] {
        match self {
            InvoiceStatus::Draft => &[InvoiceStatus::Sent, InvoiceStatus::Cancelled],
            InvoiceStatus::Sent => &[
                InvoiceStatus::Paid,
                InvoiceStatus::Overdue,
                InvoiceStatus::Cancelled,
            ],
            InvoiceStatus::Overdue => &[InvoiceStatus::Paid, InvoiceStatus::Cancelled],
            InvoiceStatus::Paid => &[],
            InvoiceStatus::Cancelled => &[],
        }
    }

    /// Check whether a caller-initiated transition to `to` is legal
    pub fn can_transition(&self, to: InvoiceStatus) -> bool {
        self.allowed_transitions().contains(&to)
    }

    /// Terminal statuses admit no caller-initiated transitions
    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }

    /// Only presented invoices accept payments
    pub fn accepts_payments(&self) -> bool {
        matches!(self, InvoiceStatus::Sent | InvoiceStatus::Overdue)
    }
}

/// An invoice billed to a client, optionally referencing the custody
/// receipt it bills for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Opaque stable identifier
    pub id: String,

    /// Human-facing document number, e.g. `INV-2025-00017`
    pub number: String,

    pub client_id: String,

    /// Custody receipt number this invoice bills for, if any
    pub receipt_ref: Option<String>,

    /// Billed amount; fixed for the lifetime of the invoice
    pub amount: Amount,

    pub currency: Currency,

    pub status: InvoiceStatus,

    pub due_date: Option<NaiveDate>,

    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    pub metadata: Metadata,
}

impl Invoice {
    /// Create a new invoice in `draft` status with a fresh id.
    ///
    /// The billed amount must be strictly positive.
    pub fn new(
        number: impl Into<String>,
        client_id: impl Into<String>,
        amount: Amount,
        currency: Currency,
    ) -> Result<Self, LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::ZeroAmount);
        }
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            number: number.into(),
            client_id: client_id.into(),
            receipt_ref: None,
            amount,
            currency,
            status: InvoiceStatus::Draft,
            due_date: None,
            notes: None,
            created_at: now,
            updated_at: now,
            metadata: Metadata::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn eur(value: rust_decimal::Decimal) -> Amount {
        Amount::new(value).unwrap()
    }

    #[test]
    fn test_new_invoice_is_draft() {
        let invoice =
            Invoice::new("INV-2025-00001", "client-1", eur(dec!(2500)), Currency::Eur).unwrap();
        assert_eq!(invoice.status, InvoiceStatus::Draft);
        assert!(invoice.receipt_ref.is_none());
        assert!(invoice.due_date.is_none());
    }

    #[test]
    fn test_zero_amount_rejected() {
        let result = Invoice::new("INV-2025-00001", "client-1", Amount::ZERO, Currency::Eur);
        assert!(matches!(result, Err(LedgerError::ZeroAmount)));
    }

    #[test]
    fn test_caller_graph() {
        assert!(InvoiceStatus::Draft.can_transition(InvoiceStatus::Sent));
        assert!(InvoiceStatus::Draft.can_transition(InvoiceStatus::Cancelled));
        assert!(InvoiceStatus::Sent.can_transition(InvoiceStatus::Paid));
        assert!(InvoiceStatus::Sent.can_transition(InvoiceStatus::Overdue));
        assert!(InvoiceStatus::Sent.can_transition(InvoiceStatus::Cancelled));
        assert!(InvoiceStatus::Overdue.can_transition(InvoiceStatus::Paid));
        assert!(InvoiceStatus::Overdue.can_transition(InvoiceStatus::Cancelled));
    }

    #[test]
    fn test_illegal_edges() {
        // No skipping the presentation step
        assert!(!InvoiceStatus::Draft.can_transition(InvoiceStatus::Paid));
        assert!(!InvoiceStatus::Draft.can_transition(InvoiceStatus::Overdue));
        // paid -> sent is engine-derived only, never caller-initiated
        assert!(!InvoiceStatus::Paid.can_transition(InvoiceStatus::Sent));
        // No resurrection
        assert!(!InvoiceStatus::Cancelled.can_transition(InvoiceStatus::Draft));
        assert!(!InvoiceStatus::Cancelled.can_transition(InvoiceStatus::Sent));
        // No un-paying by hand
        assert!(!InvoiceStatus::Paid.can_transition(InvoiceStatus::Overdue));
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(InvoiceStatus::Paid.is_terminal());
        assert!(InvoiceStatus::Cancelled.is_terminal());
        assert!(!InvoiceStatus::Sent.is_terminal());
        assert!(!InvoiceStatus::Overdue.is_terminal());
    }

    #[test]
    fn test_accepts_payments() {
        assert!(InvoiceStatus::Sent.accepts_payments());
        assert!(InvoiceStatus::Overdue.accepts_payments());
        assert!(!InvoiceStatus::Draft.accepts_payments());
        assert!(!InvoiceStatus::Paid.accepts_payments());
        assert!(!InvoiceStatus::Cancelled.accepts_payments());
    }

    #[test]
    fn test_status_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&InvoiceStatus::Overdue).unwrap(),
            "\"overdue\""
        );
        let parsed: InvoiceStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(parsed, InvoiceStatus::Cancelled);
    }
}
