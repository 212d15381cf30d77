//! Payment record - money received against an invoice

use chrono::{DateTime, Utc};
use custodia_core::Amount;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use uuid::Uuid;

/// How a payment arrived
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaymentMethod {
    BankTransfer,
    Card,
    Cash,
    Cheque,
    Other,
}

/// A payment received against an invoice.
///
/// Payments settle in the invoice's currency and carry no currency of
/// their own. Whether a payment is acceptable at all (ceiling, invoice
/// status) is decided by [`crate::reconcile::check_payment`] before the
/// record is ever persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Opaque stable identifier
    pub id: String,

    /// Human-facing document number, e.g. `PAY-2025-00103`
    pub number: String,

    pub invoice_id: String,

    pub amount: Amount,

    pub method: PaymentMethod,

    /// External reference (bank statement line, card auth code)
    pub reference: Option<String>,

    pub received_at: DateTime<Utc>,
}

impl Payment {
    /// Record a payment received now, with a fresh id
    pub fn new(
        number: impl Into<String>,
        invoice_id: impl Into<String>,
        amount: Amount,
        method: PaymentMethod,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            number: number.into(),
            invoice_id: invoice_id.into(),
            amount,
            method,
            reference: None,
            received_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_payment() {
        let payment = Payment::new(
            "PAY-2025-00001",
            "invoice-1",
            Amount::new(dec!(500)).unwrap(),
            PaymentMethod::BankTransfer,
        );
        assert!(!payment.id.is_empty());
        assert!(payment.reference.is_none());
    }

    #[test]
    fn test_method_parse_and_display() {
        let method: PaymentMethod = "bank_transfer".parse().unwrap();
        assert_eq!(method, PaymentMethod::BankTransfer);
        assert_eq!(PaymentMethod::Cheque.to_string(), "cheque");
    }

    #[test]
    fn test_payment_serde_roundtrip() {
        let mut payment = Payment::new(
            "PAY-2025-00002",
            "invoice-1",
            Amount::new(dec!(120.50)).unwrap(),
            PaymentMethod::Card,
        );
        payment.reference = Some("AUTH-77213".to_string());

        let json = serde_json::to_string(&payment).unwrap();
        let parsed: Payment = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, payment);
    }
}
