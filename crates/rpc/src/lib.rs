//! Custodia RPC - CLI orchestrator
//!
//! This crate wires the engine crates to the store and the audit
//! journal, and provides the CLI binary. The operation pattern is
//! fixed: authorize, one store transaction, then a journal append.

pub mod auth;
pub mod commands;
pub mod context;

pub use auth::{require_role, Actor, AuthError, Role};
pub use context::{AppContext, InvoiceStatement, OpError};
