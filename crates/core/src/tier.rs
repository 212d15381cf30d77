//! RiskTier - Compliance risk tier derived from a weighted score
//!
//! Tiers are ordered from lowest to highest so escalation rules can
//! compare them directly.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use strum_macros::{Display, EnumString};

/// Client risk tier
///
/// Derived from an overall compliance score in [0, 100]:
/// `>= 70` is high, `>= 40` is medium, anything below is low.
/// Boundaries are inclusive on the lower bound of each tier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RiskTier {
    Low = 1,
    Medium = 2,
    High = 3,
}

impl RiskTier {
    /// Classify an overall score into its tier.
    ///
    /// Pure and total: every Decimal maps to exactly one tier, including
    /// the boundary values 40 and 70.
    pub fn from_score(score: Decimal) -> Self {
        if score >= Decimal::new(70, 0) {
            RiskTier::High
        } else if score >= Decimal::new(40, 0) {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }
}

impl PartialOrd for RiskTier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RiskTier {
    fn cmp(&self, other: &Self) -> Ordering {
        (*self as u8).cmp(&(*other as u8))
    }
}

impl Default for RiskTier {
    fn default() -> Self {
        RiskTier::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tier_ordering() {
        assert!(RiskTier::Low < RiskTier::Medium);
        assert!(RiskTier::Medium < RiskTier::High);
    }

    #[test]
    fn test_from_score_boundaries() {
        assert_eq!(RiskTier::from_score(dec!(100)), RiskTier::High);
        assert_eq!(RiskTier::from_score(dec!(70)), RiskTier::High);
        assert_eq!(RiskTier::from_score(dec!(69.99)), RiskTier::Medium);
        assert_eq!(RiskTier::from_score(dec!(40)), RiskTier::Medium);
        assert_eq!(RiskTier::from_score(dec!(39.99)), RiskTier::Low);
        assert_eq!(RiskTier::from_score(dec!(0)), RiskTier::Low);
    }

    #[test]
    fn test_parse_and_display() {
        let tier: RiskTier = "medium".parse().unwrap();
        assert_eq!(tier, RiskTier::Medium);
        assert_eq!(RiskTier::High.to_string(), "high");
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&RiskTier::Low).unwrap();
        assert_eq!(json, "\"low\"");
        let parsed: RiskTier = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(parsed, RiskTier::High);
    }
}
