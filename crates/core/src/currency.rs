//! Currency - Type-safe 3-letter currency codes
//!
//! Billing runs in fixed fiat currencies. Common ISO 4217 codes are
//! pre-defined; anything else goes through the validated `Other` variant.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when parsing currency codes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CurrencyError {
    #[error("Empty currency code")]
    EmptyCode,

    #[error("Currency code must be exactly 3 letters: {0}")]
    InvalidLength(String),

    #[error("Currency code must be alphabetic: {0}")]
    InvalidFormat(String),
}

/// Currency codes
///
/// Common currencies are pre-defined for type safety.
/// Less common ISO codes use the `Other` variant (still 3 letters).
///
/// # Examples
/// ```
/// use custodia_core::Currency;
///
/// let eur: Currency = "EUR".parse().unwrap();
/// assert_eq!(eur, Currency::Eur);
/// assert_eq!(eur.to_string(), "EUR");
///
/// let custom: Currency = "nok".parse().unwrap();
/// assert!(matches!(custom, Currency::Other(_)));
///
/// assert!("EURO".parse::<Currency>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Currency {
    /// US Dollar
    Usd,
    /// Euro
    Eur,
    /// British Pound
    Gbp,
    /// Swiss Franc
    Chf,
    /// Japanese Yen
    Jpy,
    /// Canadian Dollar
    Cad,
    /// Australian Dollar
    Aud,
    /// Singapore Dollar
    Sgd,
    /// Hong Kong Dollar
    Hkd,
    /// UAE Dirham
    Aed,

    /// Any other 3-letter code
    Other(String),
}

impl Currency {
    /// Returns the currency code as a string slice
    pub fn code(&self) -> &str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Chf => "CHF",
            Currency::Jpy => "JPY",
            Currency::Cad => "CAD",
            Currency::Aud => "AUD",
            Currency::Sgd => "SGD",
            Currency::Hkd => "HKD",
            Currency::Aed => "AED",
            Currency::Other(s) => s.as_str(),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = CurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_uppercase();

        if s.is_empty() {
            return Err(CurrencyError::EmptyCode);
        }

        if s.len() != 3 {
            return Err(CurrencyError::InvalidLength(s));
        }

        if !s.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CurrencyError::InvalidFormat(s));
        }

        Ok(match s.as_str() {
            "USD" => Currency::Usd,
            "EUR" => Currency::Eur,
            "GBP" => Currency::Gbp,
            "CHF" => Currency::Chf,
            "JPY" => Currency::Jpy,
            "CAD" => Currency::Cad,
            "AUD" => Currency::Aud,
            "SGD" => Currency::Sgd,
            "HKD" => Currency::Hkd,
            "AED" => Currency::Aed,
            _ => Currency::Other(s),
        })
    }
}

impl TryFrom<String> for Currency {
    type Error = CurrencyError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Currency> for String {
    fn from(c: Currency) -> Self {
        c.code().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_currencies() {
        assert_eq!("USD".parse::<Currency>().unwrap(), Currency::Usd);
        assert_eq!("eur".parse::<Currency>().unwrap(), Currency::Eur);
        assert_eq!("Chf".parse::<Currency>().unwrap(), Currency::Chf);
    }

    #[test]
    fn test_parse_other_code() {
        let nok: Currency = "NOK".parse().unwrap();
        assert_eq!(nok, Currency::Other("NOK".to_string()));
        assert_eq!(nok.to_string(), "NOK");
    }

    #[test]
    fn test_empty_code_error() {
        let result: Result<Currency, _> = "".parse();
        assert!(matches!(result, Err(CurrencyError::EmptyCode)));
    }

    #[test]
    fn test_wrong_length_rejected() {
        let result: Result<Currency, _> = "EURO".parse();
        assert!(matches!(result, Err(CurrencyError::InvalidLength(_))));

        let result: Result<Currency, _> = "EU".parse();
        assert!(matches!(result, Err(CurrencyError::InvalidLength(_))));
    }

    #[test]
    fn test_non_alphabetic_rejected() {
        let result: Result<Currency, _> = "US1".parse();
        assert!(matches!(result, Err(CurrencyError::InvalidFormat(_))));
    }

    #[test]
    fn test_serde_roundtrip() {
        let currencies = vec![
            Currency::Usd,
            Currency::Eur,
            Currency::Other("NOK".to_string()),
        ];

        for currency in currencies {
            let json = serde_json::to_string(&currency).unwrap();
            let parsed: Currency = serde_json::from_str(&json).unwrap();
            assert_eq!(currency, parsed);
        }
    }
}
