//! Receipt lifecycle errors

use crate::status::ReceiptStatus;
use thiserror::Error;

/// Errors from the receipt lifecycle engine
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReceiptError {
    #[error("Invalid receipt transition: {from} -> {to}")]
    InvalidTransition {
        from: ReceiptStatus,
        to: ReceiptStatus,
    },

    #[error("Receipt can only be deleted in draft status, not {status}")]
    DeleteForbidden { status: ReceiptStatus },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_both_statuses() {
        let err = ReceiptError::InvalidTransition {
            from: ReceiptStatus::Draft,
            to: ReceiptStatus::Closed,
        };
        assert_eq!(err.to_string(), "Invalid receipt transition: draft -> closed");

        let err = ReceiptError::DeleteForbidden {
            status: ReceiptStatus::Issued,
        };
        assert_eq!(
            err.to_string(),
            "Receipt can only be deleted in draft status, not issued"
        );
    }
}
