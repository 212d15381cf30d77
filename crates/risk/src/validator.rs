//! Assessment cross-validation
//!
//! The assessor submits factors plus a claimed overall score and tier.
//! Validation rejects internal inconsistencies in a fixed order: factor
//! shape, weight normalization, score arithmetic, tier consistency. The
//! first violated check decides the error, so a submission with
//! unnormalized weights reports `WeightsNotNormalized` even when the
//! score arithmetic is also off.

use crate::assessment::{RiskAssessment, RiskFactor};
use crate::config::RiskConfig;
use crate::error::RiskError;
use custodia_core::RiskTier;
use rust_decimal::Decimal;

const SCORE_MAX: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Cross-validate an assessment's claims against its factors.
///
/// Returns the computed weighted score on acceptance. The claimed tier
/// is checked against the tier implied by the *claimed* score: the
/// score tolerance already bounds how far the claim may drift from the
/// computation, and the tier must agree with the number the assessor
/// actually wrote down.
pub fn validate_assessment(
    factors: &[RiskFactor],
    claimed_score: Decimal,
    claimed_level: RiskTier,
    config: &RiskConfig,
) -> Result<Decimal, RiskError> {
    if factors.is_empty() {
        return Err(RiskError::NoFactors);
    }

    for factor in factors {
        if factor.score < Decimal::ZERO || factor.score > SCORE_MAX {
            return Err(RiskError::ScoreOutOfRange {
                category: factor.category.clone(),
                score: factor.score,
            });
        }
        if factor.weight < Decimal::ZERO || factor.weight > Decimal::ONE {
            return Err(RiskError::WeightOutOfRange {
                category: factor.category.clone(),
                weight: factor.weight,
            });
        }
    }

    let weight_sum: Decimal = factors.iter().map(|f| f.weight).sum();
    if (weight_sum - Decimal::ONE).abs() > config.weight_tolerance {
        return Err(RiskError::WeightsNotNormalized { sum: weight_sum });
    }

    let computed: Decimal = factors.iter().map(|f| f.score * f.weight).sum();
    if (computed - claimed_score).abs() > config.score_tolerance {
        return Err(RiskError::ScoreMismatch {
            claimed: claimed_score,
            computed,
        });
    }

    let implied = RiskTier::from_score(claimed_score);
    if implied != claimed_level {
        return Err(RiskError::TierMismatch {
            claimed: claimed_level,
            implied,
        });
    }

    Ok(computed)
}

/// Validate a complete assessment record
pub fn validate(assessment: &RiskAssessment, config: &RiskConfig) -> Result<Decimal, RiskError> {
    validate_assessment(
        &assessment.factors,
        assessment.overall_score,
        assessment.risk_level,
        config,
    )
}
