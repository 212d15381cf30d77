//! Document numbers - `{PREFIX}-{year}-{seq:05}`
//!
//! Every human-facing document carries a number like `INV-2025-00017`.
//! This module owns the format; the sequence itself comes from the
//! store's per-(kind, year) counter, incremented inside the same
//! transaction as the insert so concurrent creators can never draw the
//! same number.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The document families that draw numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Receipt,
    Invoice,
    Payment,
    CreditMemo,
}

impl DocumentKind {
    /// Prefix printed on documents of this kind
    pub fn prefix(&self) -> &'static str {
        match self {
            DocumentKind::Receipt => "CR",
            DocumentKind::Invoice => "INV",
            DocumentKind::Payment => "PAY",
            DocumentKind::CreditMemo => "CM",
        }
    }

    /// Resolve a prefix back to its kind
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "CR" => Some(DocumentKind::Receipt),
            "INV" => Some(DocumentKind::Invoice),
            "PAY" => Some(DocumentKind::Payment),
            "CM" => Some(DocumentKind::CreditMemo),
            _ => None,
        }
    }
}

/// Errors from parsing a document number string
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NumberParseError {
    #[error("Malformed document number: {0}")]
    Malformed(String),

    #[error("Unknown document prefix: {0}")]
    UnknownPrefix(String),
}

/// A parsed document number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentNumber {
    pub kind: DocumentKind,
    pub year: i32,
    pub sequence: u32,
}

impl DocumentNumber {
    pub fn new(kind: DocumentKind, year: i32, sequence: u32) -> Self {
        Self {
            kind,
            year,
            sequence,
        }
    }

    /// Format a number without constructing the struct
    pub fn format(kind: DocumentKind, year: i32, sequence: u32) -> String {
        Self::new(kind, year, sequence).to_string()
    }
}

impl fmt::Display for DocumentNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Sequences past 99999 widen past five digits rather than wrap
        write!(f, "{}-{}-{:05}", self.kind.prefix(), self.year, self.sequence)
    }
}

impl FromStr for DocumentNumber {
    type Err = NumberParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() != 3 {
            return Err(NumberParseError::Malformed(s.to_string()));
        }

        let kind = DocumentKind::from_prefix(parts[0])
            .ok_or_else(|| NumberParseError::UnknownPrefix(parts[0].to_string()))?;

        let year_ok = parts[1].len() == 4 && parts[1].chars().all(|c| c.is_ascii_digit());
        let seq_ok = parts[2].len() >= 5 && parts[2].chars().all(|c| c.is_ascii_digit());
        if !year_ok || !seq_ok {
            return Err(NumberParseError::Malformed(s.to_string()));
        }

        let year: i32 = parts[1]
            .parse()
            .map_err(|_| NumberParseError::Malformed(s.to_string()))?;
        let sequence: u32 = parts[2]
            .parse()
            .map_err(|_| NumberParseError::Malformed(s.to_string()))?;

        Ok(Self {
            kind,
            year,
            sequence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pads_to_five_digits() {
        assert_eq!(
            DocumentNumber::format(DocumentKind::Receipt, 2025, 42),
            "CR-2025-00042"
        );
        assert_eq!(
            DocumentNumber::format(DocumentKind::Invoice, 2025, 1),
            "INV-2025-00001"
        );
        assert_eq!(
            DocumentNumber::format(DocumentKind::Payment, 2024, 99999),
            "PAY-2024-99999"
        );
        assert_eq!(
            DocumentNumber::format(DocumentKind::CreditMemo, 2025, 8),
            "CM-2025-00008"
        );
    }

    #[test]
    fn test_sequence_past_padding_widens() {
        assert_eq!(
            DocumentNumber::format(DocumentKind::Payment, 2025, 123456),
            "PAY-2025-123456"
        );
    }

    #[test]
    fn test_parse_roundtrip() {
        for number in ["CR-2025-00042", "INV-2024-00001", "PAY-2025-123456", "CM-2023-99999"] {
            let parsed: DocumentNumber = number.parse().unwrap();
            assert_eq!(parsed.to_string(), number);
        }
    }

    #[test]
    fn test_parse_fields() {
        let parsed: DocumentNumber = "INV-2025-00017".parse().unwrap();
        assert_eq!(parsed.kind, DocumentKind::Invoice);
        assert_eq!(parsed.year, 2025);
        assert_eq!(parsed.sequence, 17);
    }

    #[test]
    fn test_unknown_prefix_rejected() {
        let result: Result<DocumentNumber, _> = "XX-2025-00001".parse();
        assert!(matches!(result, Err(NumberParseError::UnknownPrefix(_))));
    }

    #[test]
    fn test_malformed_rejected() {
        for s in [
            "",
            "INV",
            "INV-2025",
            "INV-25-00001",
            "INV-2025-1",
            "INV-2025-0001a",
            "INV-year-00001",
        ] {
            let result: Result<DocumentNumber, _> = s.parse();
            assert!(result.is_err(), "expected {s:?} to be rejected");
        }
    }

    #[test]
    fn test_prefix_mapping_is_total() {
        for kind in [
            DocumentKind::Receipt,
            DocumentKind::Invoice,
            DocumentKind::Payment,
            DocumentKind::CreditMemo,
        ] {
            assert_eq!(DocumentKind::from_prefix(kind.prefix()), Some(kind));
        }
    }
}
