//! Audit records - one line per accepted mutation
//!
//! Events carry plain string fields rather than the domain enums so the
//! journal format is self-contained: a record written today still parses
//! after the domain types evolve.

use crate::chain::record_hash;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What happened, as written to the journal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum AuditEvent {
    ClientRegistered {
        client_id: String,
        name: String,
    },
    ClientStatusChanged {
        client_id: String,
        from: String,
        to: String,
    },
    AssetRegistered {
        asset_id: String,
        client_id: String,
    },
    ReceiptCreated {
        receipt_id: String,
        number: String,
    },
    ReceiptAdvanced {
        receipt_id: String,
        number: String,
        from: String,
        to: String,
    },
    ReceiptDeleted {
        receipt_id: String,
        number: String,
    },
    InvoiceCreated {
        invoice_id: String,
        number: String,
        client_id: String,
        amount: String,
    },
    InvoiceStatusChanged {
        invoice_id: String,
        number: String,
        from: String,
        to: String,
    },
    PaymentRecorded {
        payment_id: String,
        number: String,
        invoice_id: String,
        amount: String,
    },
    PaymentRemoved {
        payment_id: String,
        invoice_id: String,
        reverted_to_sent: bool,
    },
    CreditIssued {
        memo_id: String,
        number: String,
        invoice_id: String,
        amount: String,
    },
    AssessmentAccepted {
        assessment_id: String,
        client_id: String,
        risk_level: String,
    },
}

/// One chained journal line.
///
/// `hash` covers every other field; `prev_hash` is the previous record's
/// `hash` (or the genesis marker for the first record), which makes
/// retroactive edits to any line break verification of every later line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// 1-based, strictly increasing across the whole journal
    pub sequence: u64,

    pub prev_hash: String,

    pub hash: String,

    pub timestamp: DateTime<Utc>,

    /// Actor id that performed the mutation
    pub actor: String,

    pub event: AuditEvent,
}

impl AuditRecord {
    /// Build the next record in a chain, stamped now
    pub fn next(
        sequence: u64,
        prev_hash: impl Into<String>,
        actor: impl Into<String>,
        event: AuditEvent,
    ) -> Self {
        let mut record = Self {
            sequence,
            prev_hash: prev_hash.into(),
            hash: String::new(),
            timestamp: Utc::now(),
            actor: actor.into(),
            event,
        };
        record.hash = record_hash(&record);
        record
    }
}
