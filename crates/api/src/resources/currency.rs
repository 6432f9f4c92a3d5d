use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use domain::{Currency, CurrencySettings};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CurrencySettingsResource {
    pub primary_currency: Currency,
    pub secondary_currency: Option<Currency>,
    pub exchange_rate: f64,
    /// Every code the platform accepts
    pub available_currencies: Vec<Currency>,
    pub updated_at: DateTime<Utc>,
}

impl From<&CurrencySettings> for CurrencySettingsResource {
    fn from(settings: &CurrencySettings) -> Self {
        Self {
            primary_currency: settings.primary_currency,
            secondary_currency: settings.secondary_currency,
            exchange_rate: settings.exchange_rate,
            available_currencies: Currency::ALL.to_vec(),
            updated_at: settings.updated_at,
        }
    }
}
