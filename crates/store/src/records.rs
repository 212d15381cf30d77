//! Record-level read and write operations
//!
//! A [`Records`] handle works over a live connection: the one inside a
//! `BEGIN IMMEDIATE` transaction ([`crate::Datastore::immediate_tx`]) or
//! the bare connection for stand-alone reads ([`crate::Datastore::read`]).
//!
//! Rows are decoded strictly. A column that no longer parses (unknown
//! status, malformed decimal, negative amount) is a corrupt row and
//! surfaces as an error instead of a default.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;

use custodia_core::{Amount, Asset, AssetKind, Client, ComplianceStatus, Currency, RiskTier};
use custodia_ledger::{
    CreditMemo, CreditReason, DocumentKind, DocumentNumber, Invoice, InvoiceStatus, Payment,
    PaymentMethod,
};
use custodia_receipt::{CustodyReceipt, ReceiptStatus};
use custodia_risk::RiskAssessment;

use crate::error::StoreError;

/// Record operations over one connection
pub struct Records<'a> {
    conn: &'a Connection,
}

impl<'a> Records<'a> {
    pub(crate) fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    // --- Clients ---

    /// Insert a new client row
    pub fn insert_client(&self, client: &Client) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO clients (id, name, country, compliance_status, risk_tier, created_at, metadata)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                client.id,
                client.name,
                client.country,
                client.compliance_status.to_string(),
                client.risk_tier.to_string(),
                client.created_at.to_rfc3339(),
                serde_json::to_string(&client.metadata)?,
            ],
        )?;
        Ok(())
    }

    /// Fetch a client by id
    pub fn get_client(&self, id: &str) -> Result<Client, StoreError> {
        self.conn
            .query_row(
                "SELECT id, name, country, compliance_status, risk_tier, created_at, metadata
                 FROM clients WHERE id = ?1",
                params![id],
                row_to_client,
            )
            .map_err(|e| lookup_err(e, "client", id))
    }

    /// Rewrite the mutable client fields. `id` and `created_at` are
    /// fixed at insert.
    pub fn update_client(&self, client: &Client) -> Result<(), StoreError> {
        let rows = self.conn.execute(
            "UPDATE clients
             SET name = ?2, country = ?3, compliance_status = ?4, risk_tier = ?5, metadata = ?6
             WHERE id = ?1",
            params![
                client.id,
                client.name,
                client.country,
                client.compliance_status.to_string(),
                client.risk_tier.to_string(),
                serde_json::to_string(&client.metadata)?,
            ],
        )?;
        if rows == 0 {
            return Err(StoreError::not_found("client", &client.id));
        }
        Ok(())
    }

    // --- Assets ---

    /// Insert a new asset row
    pub fn insert_asset(&self, asset: &Asset) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO assets (id, client_id, name, kind, declared_value, currency, created_at, metadata)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                asset.id,
                asset.client_id,
                asset.name,
                asset.kind.to_string(),
                asset.declared_value.value().to_string(),
                asset.currency.code(),
                asset.created_at.to_rfc3339(),
                serde_json::to_string(&asset.metadata)?,
            ],
        )?;
        Ok(())
    }

    /// Fetch an asset by id
    pub fn get_asset(&self, id: &str) -> Result<Asset, StoreError> {
        self.conn
            .query_row(
                "SELECT id, client_id, name, kind, declared_value, currency, created_at, metadata
                 FROM assets WHERE id = ?1",
                params![id],
                row_to_asset,
            )
            .map_err(|e| lookup_err(e, "asset", id))
    }

    // --- Custody receipts ---

    /// Insert a new receipt row
    pub fn insert_receipt(&self, receipt: &CustodyReceipt) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO receipts (id, number, client_id, asset_id, status, issue_date,
                                   issued_by, integrity_hash, created_at, updated_at, metadata)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                receipt.id,
                receipt.number,
                receipt.client_id,
                receipt.asset_id,
                receipt.status.to_string(),
                receipt.issue_date.map(|d| d.to_rfc3339()),
                receipt.issued_by,
                receipt.integrity_hash,
                receipt.created_at.to_rfc3339(),
                receipt.updated_at.to_rfc3339(),
                serde_json::to_string(&receipt.metadata)?,
            ],
        )?;
        Ok(())
    }

    /// Look a receipt up by its document number
    pub fn find_receipt_by_number(
        &self,
        number: &str,
    ) -> Result<Option<CustodyReceipt>, StoreError> {
        self.conn
            .query_row(
                "SELECT id, number, client_id, asset_id, status, issue_date,
                        issued_by, integrity_hash, created_at, updated_at, metadata
                 FROM receipts WHERE number = ?1",
                params![number],
                row_to_receipt,
            )
            .optional()
            .map_err(StoreError::from)
    }

    /// Rewrite the mutable receipt fields. The seal-covered identity
    /// (`number`, `client_id`, `asset_id`) is fixed at insert.
    pub fn update_receipt(&self, receipt: &CustodyReceipt) -> Result<(), StoreError> {
        let rows = self.conn.execute(
            "UPDATE receipts
             SET status = ?2, issue_date = ?3, issued_by = ?4, integrity_hash = ?5,
                 updated_at = ?6, metadata = ?7
             WHERE id = ?1",
            params![
                receipt.id,
                receipt.status.to_string(),
                receipt.issue_date.map(|d| d.to_rfc3339()),
                receipt.issued_by,
                receipt.integrity_hash,
                receipt.updated_at.to_rfc3339(),
                serde_json::to_string(&receipt.metadata)?,
            ],
        )?;
        if rows == 0 {
            return Err(StoreError::not_found("receipt", &receipt.id));
        }
        Ok(())
    }

    /// Delete a receipt row by id
    pub fn delete_receipt(&self, id: &str) -> Result<(), StoreError> {
        let rows = self
            .conn
            .execute("DELETE FROM receipts WHERE id = ?1", params![id])?;
        if rows == 0 {
            return Err(StoreError::not_found("receipt", id));
        }
        Ok(())
    }

    // --- Invoices ---

    /// Insert a new invoice row
    pub fn insert_invoice(&self, invoice: &Invoice) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO invoices (id, number, client_id, receipt_ref, amount, currency,
                                   status, due_date, notes, created_at, updated_at, metadata)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                invoice.id,
                invoice.number,
                invoice.client_id,
                invoice.receipt_ref,
                invoice.amount.value().to_string(),
                invoice.currency.code(),
                invoice.status.to_string(),
                invoice.due_date.map(|d| d.to_string()),
                invoice.notes,
                invoice.created_at.to_rfc3339(),
                invoice.updated_at.to_rfc3339(),
                serde_json::to_string(&invoice.metadata)?,
            ],
        )?;
        Ok(())
    }

    /// Fetch an invoice by id
    pub fn get_invoice(&self, id: &str) -> Result<Invoice, StoreError> {
        self.conn
            .query_row(
                "SELECT id, number, client_id, receipt_ref, amount, currency,
                        status, due_date, notes, created_at, updated_at, metadata
                 FROM invoices WHERE id = ?1",
                params![id],
                row_to_invoice,
            )
            .map_err(|e| lookup_err(e, "invoice", id))
    }

    /// Look an invoice up by its document number
    pub fn find_invoice_by_number(&self, number: &str) -> Result<Option<Invoice>, StoreError> {
        self.conn
            .query_row(
                "SELECT id, number, client_id, receipt_ref, amount, currency,
                        status, due_date, notes, created_at, updated_at, metadata
                 FROM invoices WHERE number = ?1",
                params![number],
                row_to_invoice,
            )
            .optional()
            .map_err(StoreError::from)
    }

    /// Rewrite the mutable invoice fields. The billed amount, currency,
    /// client and receipt reference are fixed at insert; reconciliation
    /// arithmetic depends on the amount never moving under it.
    pub fn update_invoice(&self, invoice: &Invoice) -> Result<(), StoreError> {
        let rows = self.conn.execute(
            "UPDATE invoices
             SET status = ?2, due_date = ?3, notes = ?4, updated_at = ?5, metadata = ?6
             WHERE id = ?1",
            params![
                invoice.id,
                invoice.status.to_string(),
                invoice.due_date.map(|d| d.to_string()),
                invoice.notes,
                invoice.updated_at.to_rfc3339(),
                serde_json::to_string(&invoice.metadata)?,
            ],
        )?;
        if rows == 0 {
            return Err(StoreError::not_found("invoice", &invoice.id));
        }
        Ok(())
    }

    // --- Payments ---

    /// Insert a new payment row
    pub fn insert_payment(&self, payment: &Payment) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO payments (id, number, invoice_id, amount, method, reference, received_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                payment.id,
                payment.number,
                payment.invoice_id,
                payment.amount.value().to_string(),
                payment.method.to_string(),
                payment.reference,
                payment.received_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Look a payment up by its document number
    pub fn find_payment_by_number(&self, number: &str) -> Result<Option<Payment>, StoreError> {
        self.conn
            .query_row(
                "SELECT id, number, invoice_id, amount, method, reference, received_at
                 FROM payments WHERE number = ?1",
                params![number],
                row_to_payment,
            )
            .optional()
            .map_err(StoreError::from)
    }

    /// Delete a payment row by id
    pub fn delete_payment(&self, id: &str) -> Result<(), StoreError> {
        let rows = self
            .conn
            .execute("DELETE FROM payments WHERE id = ?1", params![id])?;
        if rows == 0 {
            return Err(StoreError::not_found("payment", id));
        }
        Ok(())
    }

    /// All payments applied to an invoice, in document number order
    pub fn payments_for_invoice(&self, invoice_id: &str) -> Result<Vec<Payment>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, number, invoice_id, amount, method, reference, received_at
             FROM payments WHERE invoice_id = ?1 ORDER BY number",
        )?;
        let rows = stmt.query_map(params![invoice_id], row_to_payment)?;
        let mut payments = Vec::new();
        for payment in rows {
            payments.push(payment?);
        }
        Ok(payments)
    }

    // --- Credit memos ---

    /// Insert a new credit memo row
    pub fn insert_credit_memo(&self, memo: &CreditMemo) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO credit_memos (id, number, invoice_id, amount, reason, notes, issued_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                memo.id,
                memo.number,
                memo.invoice_id,
                memo.amount.value().to_string(),
                memo.reason.to_string(),
                memo.notes,
                memo.issued_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// All credit memos issued against an invoice, in document number order
    pub fn credit_memos_for_invoice(
        &self,
        invoice_id: &str,
    ) -> Result<Vec<CreditMemo>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, number, invoice_id, amount, reason, notes, issued_at
             FROM credit_memos WHERE invoice_id = ?1 ORDER BY number",
        )?;
        let rows = stmt.query_map(params![invoice_id], row_to_credit_memo)?;
        let mut memos = Vec::new();
        for memo in rows {
            memos.push(memo?);
        }
        Ok(memos)
    }

    // --- Risk assessments ---

    /// Insert an accepted assessment row
    pub fn insert_assessment(&self, assessment: &RiskAssessment) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO risk_assessments (id, client_id, factors, overall_score,
                                           risk_level, assessor_id, assessed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                assessment.id,
                assessment.client_id,
                serde_json::to_string(&assessment.factors)?,
                assessment.overall_score.to_string(),
                assessment.risk_level.to_string(),
                assessment.assessor_id,
                assessment.assessed_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Assessment history for a client, latest first
    pub fn assessments_for_client(
        &self,
        client_id: &str,
    ) -> Result<Vec<RiskAssessment>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, client_id, factors, overall_score, risk_level, assessor_id, assessed_at
             FROM risk_assessments WHERE client_id = ?1 ORDER BY assessed_at DESC, id",
        )?;
        let rows = stmt.query_map(params![client_id], row_to_assessment)?;
        let mut assessments = Vec::new();
        for assessment in rows {
            assessments.push(assessment?);
        }
        Ok(assessments)
    }

    // --- Document numbers ---

    /// Draw the next number for `kind` in `year`.
    ///
    /// One statement bumps the counter row and returns the new value, so
    /// a draw is atomic on its own; a rolled-back unit of work leaves a
    /// gap in the sequence, never a duplicate.
    pub fn next_document_number(
        &self,
        kind: DocumentKind,
        year: i32,
    ) -> Result<DocumentNumber, StoreError> {
        let sequence: u32 = self.conn.query_row(
            "INSERT INTO document_counters (prefix, year, next_seq) VALUES (?1, ?2, 1)
             ON CONFLICT(prefix, year) DO UPDATE SET next_seq = next_seq + 1
             RETURNING next_seq",
            params![kind.prefix(), year],
            |row| row.get(0),
        )?;
        Ok(DocumentNumber::new(kind, year, sequence))
    }
}

fn lookup_err(err: rusqlite::Error, entity: &'static str, id: &str) -> StoreError {
    match err {
        rusqlite::Error::QueryReturnedNoRows => StoreError::not_found(entity, id),
        other => other.into(),
    }
}

/// Turn a column decode failure into a rusqlite conversion error so row
/// mappers stay plain `rusqlite::Result` functions.
fn decode<T, E>(idx: usize, value: Result<T, E>) -> rusqlite::Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    value.map_err(|err| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err)))
}

fn decode_datetime(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    decode(
        idx,
        DateTime::parse_from_rfc3339(raw).map(|dt| dt.with_timezone(&Utc)),
    )
}

fn decode_amount(idx: usize, raw: &str) -> rusqlite::Result<Amount> {
    let value = decode(idx, Decimal::from_str(raw))?;
    decode(idx, Amount::new(value))
}

fn row_to_client(row: &Row<'_>) -> rusqlite::Result<Client> {
    let status: String = row.get(3)?;
    let tier: String = row.get(4)?;
    let created_at: String = row.get(5)?;
    let metadata: String = row.get(6)?;
    Ok(Client {
        id: row.get(0)?,
        name: row.get(1)?,
        country: row.get(2)?,
        compliance_status: decode(3, ComplianceStatus::from_str(&status))?,
        risk_tier: decode(4, RiskTier::from_str(&tier))?,
        created_at: decode_datetime(5, &created_at)?,
        metadata: decode(6, serde_json::from_str(&metadata))?,
    })
}

fn row_to_asset(row: &Row<'_>) -> rusqlite::Result<Asset> {
    let kind: String = row.get(3)?;
    let value: String = row.get(4)?;
    let currency: String = row.get(5)?;
    let created_at: String = row.get(6)?;
    let metadata: String = row.get(7)?;
    Ok(Asset {
        id: row.get(0)?,
        client_id: row.get(1)?,
        name: row.get(2)?,
        kind: decode(3, AssetKind::from_str(&kind))?,
        declared_value: decode_amount(4, &value)?,
        currency: decode(5, Currency::from_str(&currency))?,
        created_at: decode_datetime(6, &created_at)?,
        metadata: decode(7, serde_json::from_str(&metadata))?,
    })
}

fn row_to_receipt(row: &Row<'_>) -> rusqlite::Result<CustodyReceipt> {
    let status: String = row.get(4)?;
    let issue_date: Option<String> = row.get(5)?;
    let created_at: String = row.get(8)?;
    let updated_at: String = row.get(9)?;
    let metadata: String = row.get(10)?;
    Ok(CustodyReceipt {
        id: row.get(0)?,
        number: row.get(1)?,
        client_id: row.get(2)?,
        asset_id: row.get(3)?,
        status: decode(4, ReceiptStatus::from_str(&status))?,
        issue_date: match issue_date {
            Some(raw) => Some(decode_datetime(5, &raw)?),
            None => None,
        },
        issued_by: row.get(6)?,
        integrity_hash: row.get(7)?,
        created_at: decode_datetime(8, &created_at)?,
        updated_at: decode_datetime(9, &updated_at)?,
        metadata: decode(10, serde_json::from_str(&metadata))?,
    })
}

fn row_to_invoice(row: &Row<'_>) -> rusqlite::Result<Invoice> {
    let amount: String = row.get(4)?;
    let currency: String = row.get(5)?;
    let status: String = row.get(6)?;
    let due_date: Option<String> = row.get(7)?;
    let created_at: String = row.get(9)?;
    let updated_at: String = row.get(10)?;
    let metadata: String = row.get(11)?;
    Ok(Invoice {
        id: row.get(0)?,
        number: row.get(1)?,
        client_id: row.get(2)?,
        receipt_ref: row.get(3)?,
        amount: decode_amount(4, &amount)?,
        currency: decode(5, Currency::from_str(&currency))?,
        status: decode(6, InvoiceStatus::from_str(&status))?,
        due_date: match due_date {
            Some(raw) => Some(decode(7, NaiveDate::from_str(&raw))?),
            None => None,
        },
        notes: row.get(8)?,
        created_at: decode_datetime(9, &created_at)?,
        updated_at: decode_datetime(10, &updated_at)?,
        metadata: decode(11, serde_json::from_str(&metadata))?,
    })
}

fn row_to_payment(row: &Row<'_>) -> rusqlite::Result<Payment> {
    let amount: String = row.get(3)?;
    let method: String = row.get(4)?;
    let received_at: String = row.get(6)?;
    Ok(Payment {
        id: row.get(0)?,
        number: row.get(1)?,
        invoice_id: row.get(2)?,
        amount: decode_amount(3, &amount)?,
        method: decode(4, PaymentMethod::from_str(&method))?,
        reference: row.get(5)?,
        received_at: decode_datetime(6, &received_at)?,
    })
}

fn row_to_credit_memo(row: &Row<'_>) -> rusqlite::Result<CreditMemo> {
    let amount: String = row.get(3)?;
    let reason: String = row.get(4)?;
    let issued_at: String = row.get(6)?;
    Ok(CreditMemo {
        id: row.get(0)?,
        number: row.get(1)?,
        invoice_id: row.get(2)?,
        amount: decode_amount(3, &amount)?,
        reason: decode(4, CreditReason::from_str(&reason))?,
        notes: row.get(5)?,
        issued_at: decode_datetime(6, &issued_at)?,
    })
}

fn row_to_assessment(row: &Row<'_>) -> rusqlite::Result<RiskAssessment> {
    let factors: String = row.get(2)?;
    let score: String = row.get(3)?;
    let level: String = row.get(4)?;
    let assessed_at: String = row.get(6)?;
    Ok(RiskAssessment {
        id: row.get(0)?,
        client_id: row.get(1)?,
        factors: decode(2, serde_json::from_str(&factors))?,
        overall_score: decode(3, Decimal::from_str(&score))?,
        risk_level: decode(4, RiskTier::from_str(&level))?,
        assessor_id: row.get(5)?,
        assessed_at: decode_datetime(6, &assessed_at)?,
    })
}
