//! Risk assessment records as submitted by an assessor
//!
//! Assessments arrive complete: a list of weighted factors plus the
//! assessor's claimed overall score and tier. The engine never computes
//! a score on the assessor's behalf; it cross-validates the claims
//! ([`crate::validator`]) and rejects internally inconsistent documents.

use chrono::{DateTime, Utc};
use custodia_core::RiskTier;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One weighted scoring dimension of an assessment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactor {
    /// Assessor-defined dimension, e.g. "jurisdiction" or "source_of_funds"
    pub category: String,

    /// Score for this dimension, in [0, 100]
    pub score: Decimal,

    /// Relative weight, in [0, 1]; weights sum to 1 across the assessment
    pub weight: Decimal,
}

impl RiskFactor {
    pub fn new(category: impl Into<String>, score: Decimal, weight: Decimal) -> Self {
        Self {
            category: category.into(),
            score,
            weight,
        }
    }
}

/// A compliance risk assessment for a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Opaque stable identifier
    pub id: String,

    pub client_id: String,

    /// Ordered list of weighted factors
    pub factors: Vec<RiskFactor>,

    /// Overall score claimed by the assessor
    pub overall_score: Decimal,

    /// Tier claimed by the assessor; must match the score
    pub risk_level: RiskTier,

    pub assessor_id: String,

    pub assessed_at: DateTime<Utc>,
}

impl RiskAssessment {
    /// Create an assessment dated now, with a fresh id
    pub fn new(
        client_id: impl Into<String>,
        factors: Vec<RiskFactor>,
        overall_score: Decimal,
        risk_level: RiskTier,
        assessor_id: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            client_id: client_id.into(),
            factors,
            overall_score,
            risk_level,
            assessor_id: assessor_id.into(),
            assessed_at: Utc::now(),
        }
    }
}
