//! Asset - An item held in custody for a client

use crate::amount::Amount;
use crate::currency::Currency;
use crate::metadata::Metadata;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use uuid::Uuid;

/// Broad classification of custodied items
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AssetKind {
    Vehicle,
    Artwork,
    Jewelry,
    PreciousMetal,
    Equipment,
    Document,
    Other,
}

/// An asset registered for custody
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Opaque stable identifier
    pub id: String,
    /// Owning client
    pub client_id: String,
    /// Human description ("1965 Jaguar E-Type", "Breguet No. 2667")
    pub name: String,
    pub kind: AssetKind,
    /// Value declared by the client at intake
    pub declared_value: Amount,
    pub currency: Currency,
    pub created_at: DateTime<Utc>,
    pub metadata: Metadata,
}

impl Asset {
    /// Register a new asset with a fresh id
    pub fn new(
        client_id: impl Into<String>,
        name: impl Into<String>,
        kind: AssetKind,
        declared_value: Amount,
        currency: Currency,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            client_id: client_id.into(),
            name: name.into(),
            kind,
            declared_value,
            currency,
            created_at: Utc::now(),
            metadata: Metadata::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_asset() {
        let value = Amount::new(dec!(85000)).unwrap();
        let asset = Asset::new(
            "client-1",
            "1965 Jaguar E-Type",
            AssetKind::Vehicle,
            value,
            Currency::Gbp,
        );

        assert!(!asset.id.is_empty());
        assert_eq!(asset.client_id, "client-1");
        assert_eq!(asset.kind, AssetKind::Vehicle);
        assert_eq!(asset.declared_value, value);
    }

    #[test]
    fn test_kind_parse_and_display() {
        let kind: AssetKind = "precious_metal".parse().unwrap();
        assert_eq!(kind, AssetKind::PreciousMetal);
        assert_eq!(AssetKind::Artwork.to_string(), "artwork");
    }

    #[test]
    fn test_asset_serde_roundtrip() {
        let asset = Asset::new(
            "client-2",
            "Monet lithograph",
            AssetKind::Artwork,
            Amount::new(dec!(12000)).unwrap(),
            Currency::Eur,
        );
        let json = serde_json::to_string(&asset).unwrap();
        let parsed: Asset = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, asset);
    }
}
