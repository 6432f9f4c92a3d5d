//! Per-landlord currency settings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

string_enum! {
    /// ISO 4217 codes the platform accepts.
    pub enum Currency {
        Usd => "USD",
        Lbp => "LBP",
    }
}

/// Primary/secondary currency pair with the rate between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencySettings {
    pub landlord_id: Uuid,
    pub primary_currency: Currency,
    pub secondary_currency: Option<Currency>,
    /// Units of secondary currency per one unit of primary
    pub exchange_rate: f64,
    pub updated_at: DateTime<Utc>,
}

impl CurrencySettings {
    /// Settings a landlord starts with: USD only.
    pub fn default_for(landlord_id: Uuid) -> Self {
        Self {
            landlord_id,
            primary_currency: Currency::Usd,
            secondary_currency: None,
            exchange_rate: 1.0,
            updated_at: Utc::now(),
        }
    }

    /// Convert a primary-currency amount into the secondary currency.
    pub fn to_secondary(&self, amount: f64) -> Option<f64> {
        self.secondary_currency.map(|_| amount * self.exchange_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_currency_is_upper_case_on_the_wire() {
        assert_eq!(Currency::from_str("LBP").unwrap(), Currency::Lbp);
        assert!(Currency::from_str("usd").is_err());
        assert!(Currency::from_str("EUR").is_err());
    }

    #[test]
    fn test_conversion_requires_secondary() {
        let mut settings = CurrencySettings::default_for(Uuid::new_v4());
        assert_eq!(settings.to_secondary(10.0), None);

        settings.secondary_currency = Some(Currency::Lbp);
        settings.exchange_rate = 89_500.0;
        assert_eq!(settings.to_secondary(2.0), Some(179_000.0));
    }
}
