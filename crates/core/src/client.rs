//! Client - The party whose assets are held in custody
//!
//! Clients carry two compliance-owned fields: `compliance_status` gates
//! whether the finance capability may bill them at all, and `risk_tier` is
//! only ever overwritten by an accepted risk assessment.

use crate::metadata::Metadata;
use crate::tier::RiskTier;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use uuid::Uuid;

/// Compliance standing of a client
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ComplianceStatus {
    /// Onboarding not finished; no invoicing allowed
    Pending,
    /// Cleared for business
    Approved,
    /// Onboarding refused
    Rejected,
    /// Previously approved, currently frozen
    Suspended,
}

impl Default for ComplianceStatus {
    fn default() -> Self {
        ComplianceStatus::Pending
    }
}

/// A custody client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    /// Opaque stable identifier
    pub id: String,
    /// Legal name
    pub name: String,
    /// 2-letter country code
    pub country: String,
    /// Gate for the finance capability
    pub compliance_status: ComplianceStatus,
    /// Overwritten only by an accepted risk assessment
    pub risk_tier: RiskTier,
    pub created_at: DateTime<Utc>,
    pub metadata: Metadata,
}

impl Client {
    /// Create a new client in `Pending` status with a fresh id
    pub fn new(name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            country: country.into().to_uppercase(),
            compliance_status: ComplianceStatus::default(),
            risk_tier: RiskTier::default(),
            created_at: Utc::now(),
            metadata: Metadata::new(),
        }
    }
}
