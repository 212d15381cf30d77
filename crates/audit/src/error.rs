//! Audit journal errors

use crate::chain::ChainError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Chain verification failed: {0}")]
    Chain(#[from] ChainError),
}
