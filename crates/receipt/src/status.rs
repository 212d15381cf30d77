//! Receipt status and the legal transition table
//!
//! The lifecycle is strictly linear apart from one correction edge:
//!
//! ```text
//! draft -> approved -> issued -> in_transit -> delivered -> closed
//!            |
//!            +-> draft   (correction before issuance)
//! ```
//!
//! `closed` is terminal. Every status change in the system goes through
//! [`ReceiptStatus::can_transition`]; there is no other path.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Lifecycle status of a custody receipt
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReceiptStatus {
    /// Being drafted; freely editable and deletable
    Draft,
    /// Reviewed and approved; may still be sent back for correction
    Approved,
    /// Formally issued; the integrity seal is stamped on entry
    Issued,
    /// Asset is moving between locations
    InTransit,
    /// Asset arrived at its custody location
    Delivered,
    /// Custody engagement finished
    Closed,
}

impl ReceiptStatus {
    /// Statuses reachable from this one in a single step
    pub fn allowed_transitions(&self) -> &'static [ReceiptStatus] {
        match self {
            ReceiptStatus::Draft => &[ReceiptStatus::Approved],
            ReceiptStatus::Approved => &[ReceiptStatus::Issued, ReceiptStatus::Draft],
            ReceiptStatus::Issued => &[ReceiptStatus::InTransit],
            ReceiptStatus::InTransit => &[ReceiptStatus::Delivered],
            ReceiptStatus::Delivered => &[ReceiptStatus::Closed],
            ReceiptStatus::Closed => &[],
        }
    }

    /// Check whether a single-step transition to `to` is legal
    pub fn can_transition(&self, to: ReceiptStatus) -> bool {
        self.allowed_transitions().contains(&to)
    }

    /// Terminal statuses admit no further transitions
    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }

    /// True from `issued` onwards; only these statuses expose data
    /// through the public verification surface
    pub fn is_verifiable(&self) -> bool {
        matches!(
            self,
            ReceiptStatus::Issued
                | ReceiptStatus::InTransit
                | ReceiptStatus::Delivered
                | ReceiptStatus::Closed
        )
    }

    /// Receipts may only be deleted while still in draft
    pub fn allows_delete(&self) -> bool {
        matches!(self, ReceiptStatus::Draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_path_is_legal() {
        assert!(ReceiptStatus::Draft.can_transition(ReceiptStatus::Approved));
        assert!(ReceiptStatus::Approved.can_transition(ReceiptStatus::Issued));
        assert!(ReceiptStatus::Issued.can_transition(ReceiptStatus::InTransit));
        assert!(ReceiptStatus::InTransit.can_transition(ReceiptStatus::Delivered));
        assert!(ReceiptStatus::Delivered.can_transition(ReceiptStatus::Closed));
    }

    #[test]
    fn test_correction_edge() {
        assert!(ReceiptStatus::Approved.can_transition(ReceiptStatus::Draft));
        // Correction is only available before issuance
        assert!(!ReceiptStatus::Issued.can_transition(ReceiptStatus::Draft));
        assert!(!ReceiptStatus::Delivered.can_transition(ReceiptStatus::Draft));
    }

    #[test]
    fn test_no_skipping() {
        assert!(!ReceiptStatus::Draft.can_transition(ReceiptStatus::Issued));
        assert!(!ReceiptStatus::Draft.can_transition(ReceiptStatus::Closed));
        assert!(!ReceiptStatus::Approved.can_transition(ReceiptStatus::InTransit));
        assert!(!ReceiptStatus::Issued.can_transition(ReceiptStatus::Delivered));
    }

    #[test]
    fn test_closed_is_terminal() {
        assert!(ReceiptStatus::Closed.is_terminal());
        for to in [
            ReceiptStatus::Draft,
            ReceiptStatus::Approved,
            ReceiptStatus::Issued,
            ReceiptStatus::InTransit,
            ReceiptStatus::Delivered,
            ReceiptStatus::Closed,
        ] {
            assert!(!ReceiptStatus::Closed.can_transition(to));
        }
    }

    #[test]
    fn test_self_transition_is_illegal() {
        for status in [
            ReceiptStatus::Draft,
            ReceiptStatus::Approved,
            ReceiptStatus::Issued,
            ReceiptStatus::InTransit,
            ReceiptStatus::Delivered,
            ReceiptStatus::Closed,
        ] {
            assert!(!status.can_transition(status));
        }
    }

    #[test]
    fn test_verifiable_statuses() {
        assert!(!ReceiptStatus::Draft.is_verifiable());
        assert!(!ReceiptStatus::Approved.is_verifiable());
        assert!(ReceiptStatus::Issued.is_verifiable());
        assert!(ReceiptStatus::InTransit.is_verifiable());
        assert!(ReceiptStatus::Delivered.is_verifiable());
        assert!(ReceiptStatus::Closed.is_verifiable());
    }

    #[test]
    fn test_delete_only_in_draft() {
        assert!(ReceiptStatus::Draft.allows_delete());
        assert!(!ReceiptStatus::Approved.allows_delete());
        assert!(!ReceiptStatus::Issued.allows_delete());
        assert!(!ReceiptStatus::Closed.allows_delete());
    }

    #[test]
    fn test_parse_and_display() {
        let status: ReceiptStatus = "in_transit".parse().unwrap();
        assert_eq!(status, ReceiptStatus::InTransit);
        assert_eq!(ReceiptStatus::InTransit.to_string(), "in_transit");
        assert_eq!(ReceiptStatus::Draft.to_string(), "draft");
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&ReceiptStatus::InTransit).unwrap();
        assert_eq!(json, "\"in_transit\"");
        let parsed: ReceiptStatus = serde_json::from_str("\"approved\"").unwrap();
        assert_eq!(parsed, ReceiptStatus::Approved);
    }
}
