//! Custodia audit journal
//!
//! Append-only, hash-chained record of every state change in the system.
//! Records are stored as JSON lines in daily files; each record carries
//! the SHA-256 hash of its predecessor so the whole history can be
//! verified after the fact.

pub mod chain;
pub mod error;
pub mod journal;
pub mod record;
pub mod reader;

pub use chain::{record_hash, verify_chain, ChainError, GENESIS};
pub use error::AuditError;
pub use journal::AuditJournal;
pub use reader::AuditReader;
pub use record::{AuditEvent, AuditRecord};
