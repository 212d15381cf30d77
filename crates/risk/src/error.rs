//! Risk validation errors

use custodia_core::RiskTier;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors from assessment cross-validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RiskError {
    #[error("Assessment must contain at least one factor")]
    NoFactors,

    #[error("Factor '{category}' score {score} is outside [0, 100]")]
    ScoreOutOfRange { category: String, score: Decimal },

    #[error("Factor '{category}' weight {weight} is outside [0, 1]")]
    WeightOutOfRange { category: String, weight: Decimal },

    #[error("Factor weights must sum to 1.0, got {sum}")]
    WeightsNotNormalized { sum: Decimal },

    #[error("Claimed overall score {claimed} does not match computed score {computed}")]
    ScoreMismatch { claimed: Decimal, computed: Decimal },

    #[error("Claimed risk level '{claimed}' does not match '{implied}' implied by the score")]
    TierMismatch { claimed: RiskTier, implied: RiskTier },
}
