//! Custody receipt record

use crate::status::ReceiptStatus;
use chrono::{DateTime, Utc};
use custodia_core::Metadata;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A custody receipt for a single client/asset pair.
///
/// The three issuance fields (`issue_date`, `issued_by`, `integrity_hash`)
/// are `None` until the receipt enters `issued` and are never rewritten
/// afterwards. The fields the integrity seal covers (`number`, `client_id`,
/// `asset_id`, `issue_date`) must stay frozen once the seal exists, or
/// verification reports the receipt as tampered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustodyReceipt {
    /// Opaque stable identifier
    pub id: String,

    /// Human-facing document number, e.g. `CR-2025-00042`
    pub number: String,

    /// Client whose asset is taken into custody
    pub client_id: String,

    /// The custodied asset
    pub asset_id: String,

    pub status: ReceiptStatus,

    /// Stamped on entry into `issued`
    pub issue_date: Option<DateTime<Utc>>,

    /// Actor who performed the issuance
    pub issued_by: Option<String>,

    /// SHA-256 hex digest over the sealed fields
    pub integrity_hash: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Free-form attachment, stored verbatim
    pub metadata: Metadata,
}

impl CustodyReceipt {
    /// Create a new receipt in `draft` status with a fresh id
    pub fn new(
        number: impl Into<String>,
        client_id: impl Into<String>,
        asset_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            number: number.into(),
            client_id: client_id.into(),
            asset_id: asset_id.into(),
            status: ReceiptStatus::Draft,
            issue_date: None,
            issued_by: None,
            integrity_hash: None,
            created_at: now,
            updated_at: now,
            metadata: Metadata::new(),
        }
    }

    /// True once the issuance stamp has been applied
    pub fn is_sealed(&self) -> bool {
        self.integrity_hash.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_receipt_is_unsealed_draft() {
        let receipt = CustodyReceipt::new("CR-2025-00001", "client-1", "asset-1");

        assert!(!receipt.id.is_empty());
        assert_eq!(receipt.status, ReceiptStatus::Draft);
        assert!(receipt.issue_date.is_none());
        assert!(receipt.issued_by.is_none());
        assert!(receipt.integrity_hash.is_none());
        assert!(!receipt.is_sealed());
    }

    #[test]
    fn test_receipt_serde_roundtrip() {
        let receipt = CustodyReceipt::new("CR-2025-00002", "client-1", "asset-2");
        let json = serde_json::to_string(&receipt).unwrap();
        let parsed: CustodyReceipt = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, receipt);
    }
}
