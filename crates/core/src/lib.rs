//! Custodia Core - Domain types
//!
//! This crate contains the fundamental types used across Custodia:
//! - `Amount`: Non-negative decimal wrapper for monetary values
//! - `Currency`: Type-safe 3-letter currency codes
//! - `Metadata`: Opaque key-value attachment the engine never interprets
//! - `RiskTier`: Compliance risk tier derived from a weighted score
//! - `Client` / `Asset`: The records custody receipts and invoices refer to

pub mod amount;
pub mod asset;
pub mod client;
pub mod currency;
pub mod metadata;
pub mod tier;

pub use amount::Amount;
pub use asset::{Asset, AssetKind};
pub use client::{Client, ComplianceStatus};
pub use currency::Currency;
pub use metadata::Metadata;
pub use tier::RiskTier;
