//! Ledger reconciliation errors
//!
//! Ceiling violations carry the exact remaining allowance so callers can
//! resubmit a corrected amount without another read.

use crate::invoice::InvoiceStatus;
use custodia_core::Amount;
use thiserror::Error;

/// Errors from the ledger reconciliation engine
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid invoice transition: {from} -> {to}")]
    InvalidStatusTransition {
        from: InvoiceStatus,
        to: InvoiceStatus,
    },

    #[error("Invoice is {status}; it accepts no further payments")]
    InvoiceClosedForPayment { status: InvoiceStatus },

    #[error("Invoice is still {status}; it must be sent before payments are recorded")]
    InvoiceNotPayable { status: InvoiceStatus },

    #[error("Payment of {attempted} exceeds remaining balance of {remaining}")]
    OverPayment { attempted: Amount, remaining: Amount },

    #[error("Credit of {attempted} exceeds remaining creditable amount of {remaining}")]
    CreditExceedsRemainder { attempted: Amount, remaining: Amount },

    #[error("Cannot issue a credit memo against a cancelled invoice")]
    InvoiceClosedForCredit,

    #[error("Amount must be strictly positive")]
    ZeroAmount,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_ceiling_errors_carry_exact_figures() {
        let err = LedgerError::OverPayment {
            attempted: Amount::new(dec!(50)).unwrap(),
            remaining: Amount::new(dec!(40)).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "Payment of 50 exceeds remaining balance of 40"
        );

        let err = LedgerError::CreditExceedsRemainder {
            attempted: Amount::new(dec!(65)).unwrap(),
            remaining: Amount::new(dec!(60)).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "Credit of 65 exceeds remaining creditable amount of 60"
        );
    }

    #[test]
    fn test_transition_error_names_statuses() {
        let err = LedgerError::InvalidStatusTransition {
            from: InvoiceStatus::Paid,
            to: InvoiceStatus::Sent,
        };
        assert_eq!(err.to_string(), "Invalid invoice transition: paid -> sent");
    }
}
