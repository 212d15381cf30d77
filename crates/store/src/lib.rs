//! Custodia store - SQLite persistence
//!
//! One database file holds every record type: clients, assets, custody
//! receipts, invoices, payments, credit memos, risk assessments and the
//! per-kind document number counters. The engine crates stay pure; this
//! crate is where their decisions are committed.
//!
//! Mutating units of work run through [`Datastore::immediate_tx`], which
//! wraps the closure in a `BEGIN IMMEDIATE` transaction. Concurrent
//! writers on the same file serialize on that lock, so a ceiling check
//! performed inside the closure always sees committed totals. A writer
//! that cannot get the lock within the busy timeout surfaces as
//! [`StoreError::Conflict`], which is safe to retry.

pub mod datastore;
pub mod error;
pub mod records;

pub use datastore::Datastore;
pub use error::StoreError;
pub use records::Records;
