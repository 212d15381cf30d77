//! Custodia Receipt - Custody receipt lifecycle and integrity seal
//!
//! A custody receipt is the document that proves the vault holds a
//! client's asset. This crate owns:
//! - the status state machine (`draft` through `closed`, one correction
//!   edge back from `approved`)
//! - one-shot issuance stamping with a SHA-256 integrity seal
//! - the public verification surface that checks a seal without
//!   disclosing anything about unissued receipts
//!
//! All functions here are pure over the receipt value; persistence and
//! audit are the caller's concern.

pub mod error;
pub mod lifecycle;
pub mod receipt;
pub mod seal;
pub mod status;
pub mod verify;

pub use error::ReceiptError;
pub use lifecycle::{advance, ensure_deletable};
pub use receipt::CustodyReceipt;
pub use seal::{compute_seal, seal_payload, verify_seal};
pub use status::ReceiptStatus;
pub use verify::{build_report, AssetSummary, ClientSummary, VerificationReport};
