use async_trait::async_trait;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use common::{AppResult, FieldErrors};

use super::{access, FormRequest, RuleContext};
use crate::middleware::CurrentUser;

/// Currency pair for the caller's landlord.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCurrencySettingsRequest {
    #[validate(required, custom(function = "super::rules::currency"))]
    #[schema(example = "USD")]
    pub primary_currency: Option<String>,
    /// `null` clears the secondary currency
    #[validate(custom(function = "super::rules::currency"))]
    #[schema(example = "LBP")]
    pub secondary_currency: Option<String>,
    /// Units of secondary per one primary; required with a secondary
    #[schema(example = 89500.0)]
    pub exchange_rate: Option<f64>,
}

#[async_trait]
impl FormRequest for UpdateCurrencySettingsRequest {
    fn authorize(identity: Option<&CurrentUser>) -> bool {
        access::settings_admin(identity)
    }

    async fn after(&self, _ctx: &RuleContext<'_>, errors: &mut FieldErrors) -> AppResult<()> {
        if self.exchange_rate.map_or(false, |rate| rate <= 0.0) {
            errors.add("exchange_rate", "The exchange rate field must be greater than 0.");
        }
        if let Some(secondary) = &self.secondary_currency {
            if self.primary_currency.as_ref() == Some(secondary) {
                errors.add(
                    "secondary_currency",
                    "The secondary currency and primary currency must be different.",
                );
            }
            if self.exchange_rate.is_none() {
                errors.add(
                    "exchange_rate",
                    "The exchange rate field is required when secondary currency is present.",
                );
            }
        }
        Ok(())
    }
}
