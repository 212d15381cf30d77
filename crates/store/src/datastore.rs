//! SQLite datastore
//!
//! One [`Datastore`] owns one connection. Several instances, in the same
//! process or not, may share a database file; `BEGIN IMMEDIATE` takes the
//! write lock up front so concurrent units of work queue instead of
//! interleaving their reads and writes.

use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, TransactionBehavior};
use tracing::debug;

use crate::error::StoreError;
use crate::records::Records;

/// How long a writer waits for the lock before the unit of work fails
/// with [`StoreError::Conflict`].
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database schema. `IF NOT EXISTS` keeps reopening idempotent.
///
/// Amounts and scores are stored as decimal strings, never as REAL;
/// dates as RFC 3339 text; enums in their snake_case wire form; metadata
/// and factor lists as JSON text.
const SCHEMA: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;

CREATE TABLE IF NOT EXISTS clients (
    id                TEXT PRIMARY KEY,
    name              TEXT NOT NULL,
    country           TEXT NOT NULL,
    compliance_status TEXT NOT NULL,
    risk_tier         TEXT NOT NULL,
    created_at        TEXT NOT NULL,
    metadata          TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS assets (
    id             TEXT PRIMARY KEY,
    client_id      TEXT NOT NULL,
    name           TEXT NOT NULL,
    kind           TEXT NOT NULL,
    declared_value TEXT NOT NULL,
    currency       TEXT NOT NULL,
    created_at     TEXT NOT NULL,
    metadata       TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_assets_client ON assets(client_id);

CREATE TABLE IF NOT EXISTS receipts (
    id             TEXT PRIMARY KEY,
    number         TEXT NOT NULL UNIQUE,
    client_id      TEXT NOT NULL,
    asset_id       TEXT NOT NULL,
    status         TEXT NOT NULL,
    issue_date     TEXT,
    issued_by      TEXT,
    integrity_hash TEXT,
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL,
    metadata       TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_receipts_client ON receipts(client_id);

CREATE TABLE IF NOT EXISTS invoices (
    id          TEXT PRIMARY KEY,
    number      TEXT NOT NULL UNIQUE,
    client_id   TEXT NOT NULL,
    receipt_ref TEXT,
    amount      TEXT NOT NULL,
    currency    TEXT NOT NULL,
    status      TEXT NOT NULL,
    due_date    TEXT,
    notes       TEXT,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL,
    metadata    TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_invoices_client ON invoices(client_id);

CREATE TABLE IF NOT EXISTS payments (
    id          TEXT PRIMARY KEY,
    number      TEXT NOT NULL UNIQUE,
    invoice_id  TEXT NOT NULL,
    amount      TEXT NOT NULL,
    method      TEXT NOT NULL,
    reference   TEXT,
    received_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_payments_invoice ON payments(invoice_id);

CREATE TABLE IF NOT EXISTS credit_memos (
    id         TEXT PRIMARY KEY,
    number     TEXT NOT NULL UNIQUE,
    invoice_id TEXT NOT NULL,
    amount     TEXT NOT NULL,
    reason     TEXT NOT NULL,
    notes      TEXT,
    issued_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_credit_memos_invoice ON credit_memos(invoice_id);

CREATE TABLE IF NOT EXISTS risk_assessments (
    id            TEXT PRIMARY KEY,
    client_id     TEXT NOT NULL,
    factors       TEXT NOT NULL,
    overall_score TEXT NOT NULL,
    risk_level    TEXT NOT NULL,
    assessor_id   TEXT NOT NULL,
    assessed_at   TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_risk_assessments_client ON risk_assessments(client_id);

CREATE TABLE IF NOT EXISTS document_counters (
    prefix   TEXT NOT NULL,
    year     INTEGER NOT NULL,
    next_seq INTEGER NOT NULL,
    PRIMARY KEY (prefix, year)
);
"#;

/// SQLite-backed store for every Custodia record type
pub struct Datastore {
    conn: Connection,
}

impl Datastore {
    /// Open (or create) the database at `path` and initialize the schema
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// In-memory store for tests
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(SCHEMA)?;
        debug!("store schema ready");
        Ok(Self { conn })
    }

    /// Record-level access for stand-alone reads. Writes belong inside
    /// [`Datastore::immediate_tx`].
    pub fn read(&self) -> Records<'_> {
        Records::new(&self.conn)
    }

    /// Run `work` as one unit inside a `BEGIN IMMEDIATE` transaction.
    ///
    /// The transaction commits when the closure returns `Ok` and rolls
    /// back on any error, so a unit of work either lands completely or
    /// leaves no trace. Totals read through the closure's [`Records`] are
    /// committed state: the write lock is already held, no other writer
    /// can slip a row in between the read and the commit.
    pub fn immediate_tx<T, E, F>(&mut self, work: F) -> Result<T, E>
    where
        E: From<StoreError>,
        F: FnOnce(&Records<'_>) -> Result<T, E>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(StoreError::from)?;
        let value = work(&Records::new(&tx))?;
        tx.commit().map_err(StoreError::from)?;
        Ok(value)
    }
}
