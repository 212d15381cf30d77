//! Integrity seal - SHA-256 over the sealed receipt fields
//!
//! The seal is stamped exactly once, when a receipt enters `issued`, and
//! covers the fields a printed receipt carries: document number, client id,
//! asset id and issue date. Any later mutation of those fields makes
//! verification fail, which is the tamper-evidence guarantee.
//!
//! This is an integrity digest, not an authentication code: there is no
//! key, and anyone holding the receipt data can recompute it. That is
//! intentional so the public verification surface can run the same check.

use crate::receipt::CustodyReceipt;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// Canonical byte layout the seal is computed over.
///
/// Fields joined with `|` in fixed order, timestamp in RFC 3339. Document
/// numbers and ids never contain `|`, so the layout is unambiguous.
pub fn seal_payload(
    number: &str,
    client_id: &str,
    asset_id: &str,
    issue_date: DateTime<Utc>,
) -> String {
    format!(
        "{}|{}|{}|{}",
        number,
        client_id,
        asset_id,
        issue_date.to_rfc3339()
    )
}

/// Compute the integrity seal as a lowercase hex SHA-256 digest
pub fn compute_seal(
    number: &str,
    client_id: &str,
    asset_id: &str,
    issue_date: DateTime<Utc>,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(seal_payload(number, client_id, asset_id, issue_date).as_bytes());
    hex::encode(hasher.finalize())
}

/// Verify a receipt's seal.
///
/// Returns `None` if the receipt has not been sealed yet (no issue date or
/// no stored hash). Otherwise recomputes the seal from the receipt fields
/// and compares:
/// - with `supplied` (a hash copied from a printed document), the supplied
///   value is checked against the recomputation, case-insensitively;
/// - without, the stored hash is checked against the recomputation, which
///   detects tampering with either the stored fields or the stored hash.
pub fn verify_seal(receipt: &CustodyReceipt, supplied: Option<&str>) -> Option<bool> {
    let issue_date = receipt.issue_date?;
    let stored = receipt.integrity_hash.as_deref()?;

    let computed = compute_seal(
        &receipt.number,
        &receipt.client_id,
        &receipt.asset_id,
        issue_date,
    );

    match supplied {
        Some(candidate) => Some(candidate.eq_ignore_ascii_case(&computed)),
        None => Some(stored == computed),
    }
}
