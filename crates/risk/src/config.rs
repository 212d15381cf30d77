//! Risk validation tolerances
//!
//! The two tolerances are business constants without a derivation, so
//! they live in configuration rather than inline: compliance can tighten
//! them without a recompile.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Tolerances for assessment cross-validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Allowed absolute deviation of the weight sum from 1.0
    #[serde(default = "default_weight_tolerance")]
    pub weight_tolerance: Decimal,

    /// Allowed absolute deviation of the claimed overall score from the
    /// computed weighted score
    #[serde(default = "default_score_tolerance")]
    pub score_tolerance: Decimal,
}

// Default value functions for serde
fn default_weight_tolerance() -> Decimal {
    Decimal::new(1, 2) // 0.01
}

fn default_score_tolerance() -> Decimal {
    Decimal::new(5, 0)
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            weight_tolerance: default_weight_tolerance(),
            score_tolerance: default_score_tolerance(),
        }
    }
}

impl RiskConfig {
    /// Load configuration from JSON file
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}
