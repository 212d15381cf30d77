//! Custodia Risk - Weighted risk score cross-validation
//!
//! Compliance assessors submit a weighted factor breakdown together with
//! the overall score and tier they derived from it. This crate validates
//! that the three claims agree: weights normalize to 1, the claimed
//! score matches the weighted computation within tolerance, and the
//! claimed tier is the one the score implies. Tolerances are
//! configuration ([`RiskConfig`]), not inline constants.
//!
//! Tier classification itself ([`custodia_core::RiskTier::from_score`])
//! lives in the core crate because client records carry a tier.

pub mod assessment;
pub mod config;
pub mod error;
pub mod validator;

pub use assessment::{RiskAssessment, RiskFactor};
pub use config::RiskConfig;
pub use error::RiskError;
pub use validator::{validate, validate_assessment};
