//! Receipt lifecycle engine
//!
//! Pure state transitions over [`CustodyReceipt`]. Persistence and audit
//! happen in the calling layer; everything here is deterministic apart
//! from the issuance timestamp.

use crate::error::ReceiptError;
use crate::receipt::CustodyReceipt;
use crate::seal::compute_seal;
use crate::status::ReceiptStatus;
use chrono::Utc;

/// Advance a receipt to `to`, validating the transition table.
///
/// Entering `issued` stamps the receipt: `issue_date` is set to now,
/// `issued_by` to `actor`, and `integrity_hash` to the seal over the
/// stamped fields. The stamp is guarded on the hash being unset, so a
/// replayed transition can never overwrite an existing seal.
pub fn advance(
    receipt: &mut CustodyReceipt,
    to: ReceiptStatus,
    actor: &str,
) -> Result<(), ReceiptError> {
    let from = receipt.status;
    if !from.can_transition(to) {
        return Err(ReceiptError::InvalidTransition { from, to });
    }

    if to == ReceiptStatus::Issued && !receipt.is_sealed() {
        let issued_at = Utc::now();
        receipt.issue_date = Some(issued_at);
        receipt.issued_by = Some(actor.to_string());
        receipt.integrity_hash = Some(compute_seal(
            &receipt.number,
            &receipt.client_id,
            &receipt.asset_id,
            issued_at,
        ));
    }

    receipt.status = to;
    receipt.updated_at = Utc::now();
    Ok(())
}

/// Check that a receipt may be deleted (draft only)
pub fn ensure_deletable(receipt: &CustodyReceipt) -> Result<(), ReceiptError> {
    if receipt.status.allows_delete() {
        Ok(())
    } else {
        Err(ReceiptError::DeleteForbidden {
            status: receipt.status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seal::verify_seal;

    fn draft() -> CustodyReceipt {
        CustodyReceipt::new("CR-2025-00001", "client-1", "asset-1")
    }

    #[test]
    fn test_advance_full_lifecycle() {
        let mut receipt = draft();

        advance(&mut receipt, ReceiptStatus::Approved, "ops.lena").unwrap();
        advance(&mut receipt, ReceiptStatus::Issued, "ops.lena").unwrap();
        advance(&mut receipt, ReceiptStatus::InTransit, "ops.lena").unwrap();
        advance(&mut receipt, ReceiptStatus::Delivered, "ops.marco").unwrap();
        advance(&mut receipt, ReceiptStatus::Closed, "ops.marco").unwrap();

        assert_eq!(receipt.status, ReceiptStatus::Closed);
        assert_eq!(verify_seal(&receipt, None), Some(true));
    }

    #[test]
    fn test_advance_rejects_illegal_edge() {
        let mut receipt = draft();
        let err = advance(&mut receipt, ReceiptStatus::Issued, "ops.lena").unwrap_err();
        assert_eq!(
            err,
            ReceiptError::InvalidTransition {
                from: ReceiptStatus::Draft,
                to: ReceiptStatus::Issued,
            }
        );
        // Failed transitions leave the receipt untouched
        assert_eq!(receipt.status, ReceiptStatus::Draft);
        assert!(!receipt.is_sealed());
    }

    #[test]
    fn test_issuance_stamps_exactly_once() {
        let mut receipt = draft();
        advance(&mut receipt, ReceiptStatus::Approved, "ops.lena").unwrap();
        advance(&mut receipt, ReceiptStatus::Issued, "ops.lena").unwrap();

        let issue_date = receipt.issue_date.unwrap();
        let hash = receipt.integrity_hash.clone().unwrap();
        assert_eq!(receipt.issued_by.as_deref(), Some("ops.lena"));

        // Later transitions must not touch the stamp
        advance(&mut receipt, ReceiptStatus::InTransit, "ops.marco").unwrap();
        advance(&mut receipt, ReceiptStatus::Delivered, "ops.marco").unwrap();

        assert_eq!(receipt.issue_date, Some(issue_date));
        assert_eq!(receipt.integrity_hash, Some(hash));
        assert_eq!(receipt.issued_by.as_deref(), Some("ops.lena"));
    }

    #[test]
    fn test_correction_roundtrip_keeps_receipt_unsealed() {
        let mut receipt = draft();
        advance(&mut receipt, ReceiptStatus::Approved, "ops.lena").unwrap();
        advance(&mut receipt, ReceiptStatus::Draft, "ops.lena").unwrap();

        assert_eq!(receipt.status, ReceiptStatus::Draft);
        assert!(!receipt.is_sealed());

        // The corrected receipt can go through approval and issuance again
        advance(&mut receipt, ReceiptStatus::Approved, "ops.lena").unwrap();
        advance(&mut receipt, ReceiptStatus::Issued, "ops.lena").unwrap();
        assert!(receipt.is_sealed());
    }

    #[test]
    fn test_closed_admits_nothing() {
        let mut receipt = draft();
        for to in [
            ReceiptStatus::Approved,
            ReceiptStatus::Issued,
            ReceiptStatus::InTransit,
            ReceiptStatus::Delivered,
            ReceiptStatus::Closed,
        ] {
            advance(&mut receipt, to, "ops.lena").unwrap();
        }

        let err = advance(&mut receipt, ReceiptStatus::Draft, "ops.lena").unwrap_err();
        assert!(matches!(err, ReceiptError::InvalidTransition { .. }));
    }

    #[test]
    fn test_ensure_deletable() {
        let mut receipt = draft();
        assert!(ensure_deletable(&receipt).is_ok());

        advance(&mut receipt, ReceiptStatus::Approved, "ops.lena").unwrap();
        let err = ensure_deletable(&receipt).unwrap_err();
        assert_eq!(
            err,
            ReceiptError::DeleteForbidden {
                status: ReceiptStatus::Approved,
            }
        );
    }

    #[test]
    fn test_corrected_receipt_is_deletable_again() {
        let mut receipt = draft();
        advance(&mut receipt, ReceiptStatus::Approved, "ops.lena").unwrap();
        advance(&mut receipt, ReceiptStatus::Draft, "ops.lena").unwrap();
        assert!(ensure_deletable(&receipt).is_ok());
    }
}
