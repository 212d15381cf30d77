//! Public verification surface
//!
//! Anyone holding a receipt number may ask whether the receipt is
//! authentic. Receipts before `issued`, and numbers that do not exist,
//! both produce the same opaque "not verifiable" answer so the surface
//! leaks nothing about drafts or about which numbers are in use.

use crate::receipt::CustodyReceipt;
use crate::seal::verify_seal;
use crate::status::ReceiptStatus;
use chrono::{DateTime, Utc};
use custodia_core::{Amount, Asset, AssetKind, Client, Currency};
use serde::{Deserialize, Serialize};

/// Client fields disclosed on a verified receipt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSummary {
    pub name: String,
    pub country: String,
}

/// Asset fields disclosed on a verified receipt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSummary {
    pub name: String,
    pub kind: AssetKind,
    pub declared_value: Amount,
    pub currency: Currency,
}

/// Answer returned by the verification surface.
///
/// For a verifiable receipt every optional field is populated and `valid`
/// mirrors `hash_valid`. For anything else only `number` and
/// `valid: false` are set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub number: String,
    pub valid: bool,
    pub status: Option<ReceiptStatus>,
    pub issue_date: Option<DateTime<Utc>>,
    pub hash_valid: Option<bool>,
    pub client: Option<ClientSummary>,
    pub asset: Option<AssetSummary>,
}

impl VerificationReport {
    /// The opaque answer for unknown numbers and pre-issuance receipts
    pub fn not_verifiable(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            valid: false,
            status: None,
            issue_date: None,
            hash_valid: None,
            client: None,
            asset: None,
        }
    }
}

/// Build the verification report for a receipt the store resolved.
///
/// `supplied_hash` is an integrity hash copied from a printed document;
/// when present it is checked instead of the stored hash.
pub fn build_report(
    receipt: &CustodyReceipt,
    client: &Client,
    asset: &Asset,
    supplied_hash: Option<&str>,
) -> VerificationReport {
    if !receipt.status.is_verifiable() {
        return VerificationReport::not_verifiable(&receipt.number);
    }

    // Verifiable statuses are only reachable through issuance, so the
    // seal fields are present; a missing seal here is data corruption
    // and reads as invalid.
    let hash_valid = verify_seal(receipt, supplied_hash).unwrap_or(false);

    VerificationReport {
        number: receipt.number.clone(),
        valid: hash_valid,
        status: Some(receipt.status),
        issue_date: receipt.issue_date,
        hash_valid: Some(hash_valid),
        client: Some(ClientSummary {
            name: client.name.clone(),
            country: client.country.clone(),
        }),
        asset: Some(AssetSummary {
            name: asset.name.clone(),
            kind: asset.kind,
            declared_value: asset.declared_value,
            currency: asset.currency.clone(),
        }),
    }
}
