//! Hash chain over audit records

use crate::record::AuditRecord;
use sha2::{Digest, Sha256};

/// `prev_hash` of the first record in a journal
pub const GENESIS: &str = "GENESIS";

/// Calculate the SHA-256 hash of a record's content (excluding the hash
/// field itself)
pub fn record_hash(record: &AuditRecord) -> String {
    let mut hasher = Sha256::new();

    hasher.update(record.sequence.to_le_bytes());
    hasher.update(record.prev_hash.as_bytes());
    hasher.update(record.timestamp.to_rfc3339().as_bytes());
    hasher.update(record.actor.as_bytes());
    hasher.update(format!("{:?}", record.event).as_bytes());

    hex::encode(hasher.finalize())
}

/// Verify chain integrity: every record's hash matches its content, every
/// `prev_hash` links to the predecessor, and sequences increase strictly
/// by one.
pub fn verify_chain(records: &[AuditRecord]) -> Result<(), ChainError> {
    if records.is_empty() {
        return Ok(());
    }

    let mut prev_hash = GENESIS.to_string();

    for (i, record) in records.iter().enumerate() {
        if record.prev_hash != prev_hash {
            return Err(ChainError::BrokenLink {
                sequence: record.sequence,
                expected: prev_hash,
                actual: record.prev_hash.clone(),
            });
        }

        let calculated = record_hash(record);
        if record.hash != calculated {
            return Err(ChainError::InvalidHash {
                sequence: record.sequence,
                expected: calculated,
                actual: record.hash.clone(),
            });
        }

        if i > 0 && record.sequence != records[i - 1].sequence + 1 {
            return Err(ChainError::InvalidSequence {
                expected: records[i - 1].sequence + 1,
                actual: record.sequence,
            });
        }

        prev_hash = record.hash.clone();
    }

    Ok(())
}

/// Errors in chain verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    BrokenLink {
        sequence: u64,
        expected: String,
        actual: String,
    },
    InvalidHash {
        sequence: u64,
        expected: String,
        actual: String,
    },
    InvalidSequence {
        expected: u64,
        actual: u64,
    },
}

impl std::fmt::Display for ChainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChainError::BrokenLink {
                sequence,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Broken link at seq {}: expected prev_hash '{}', got '{}'",
                    sequence, expected, actual
                )
            }
            ChainError::InvalidHash {
                sequence,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Invalid hash at seq {}: expected '{}', got '{}'",
                    sequence, expected, actual
                )
            }
            ChainError::InvalidSequence { expected, actual } => {
                write!(f, "Invalid sequence: expected {}, got {}", expected, actual)
            }
        }
    }
}

impl std::error::Error for ChainError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::AuditEvent;

    fn event(n: u64) -> AuditEvent {
        AuditEvent::ReceiptCreated {
            receipt_id: format!("r-{}", n),
            number: format!("CR-2025-{:05}", n),
        }
    }

    fn chain_of(len: u64) -> Vec<AuditRecord> {
        let mut records = Vec::new();
        let mut prev_hash = GENESIS.to_string();
        for sequence in 1..=len {
            let record = AuditRecord::next(sequence, prev_hash, "ops.lena", event(sequence));
            prev_hash = record.hash.clone();
            records.push(record);
        }
        records
    }

    #[test]
    fn test_hash_deterministic() {
        let record = AuditRecord::next(1, GENESIS, "ops.lena", event(1));
        assert_eq!(record_hash(&record), record_hash(&record));
    }

    #[test]
    fn test_empty_chain_verifies() {
        assert!(verify_chain(&[]).is_ok());
    }

    #[test]
    fn test_valid_chain_verifies() {
        assert!(verify_chain(&chain_of(5)).is_ok());
    }

    #[test]
    fn test_edited_record_detected() {
        let mut records = chain_of(3);
        records[1].actor = "someone.else".to_string();

        let result = verify_chain(&records);
        assert!(matches!(result, Err(ChainError::InvalidHash { sequence: 2, .. })));
    }

    #[test]
    fn test_broken_link_detected() {
        let mut records = chain_of(3);
        records[2].prev_hash = "0".repeat(64);
        // Keep the record's own hash consistent so only the link breaks
        records[2].hash = record_hash(&records[2]);

        let result = verify_chain(&records);
        assert!(matches!(result, Err(ChainError::BrokenLink { sequence: 3, .. })));
    }

    #[test]
    fn test_removed_record_detected() {
        let mut records = chain_of(3);
        records.remove(1);

        // The gap shows up as a link break at the old third record
        assert!(verify_chain(&records).is_err());
    }

    #[test]
    fn test_sequence_gap_detected() {
        let mut records = chain_of(2);
        // Rebuild the second record with a skipped sequence but valid link
        let prev_hash = records[0].hash.clone();
        let mut skipped = AuditRecord::next(5, prev_hash, "ops.lena", event(5));
        skipped.hash = record_hash(&skipped);
        records[1] = skipped;

        let result = verify_chain(&records);
        assert!(matches!(
            result,
            Err(ChainError::InvalidSequence {
                expected: 2,
                actual: 5,
            })
        ));
    }
}
