use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use common::{AppResult, FieldErrors};

use super::{access, FormRequest, RuleContext};
use crate::middleware::CurrentUser;

/// Plan change for one landlord.
///
/// Without `subscription_expires_at` the new period lasts one billing cycle
/// from `subscription_started_at` (or now).
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateSubscriptionRequest {
    #[validate(required, custom(function = "super::rules::subscription_tier"))]
    #[schema(example = "enterprise")]
    pub subscription_tier: Option<String>,
    #[validate(custom(function = "super::rules::subscription_status"))]
    #[schema(example = "active")]
    pub subscription_status: Option<String>,
    #[validate(custom(function = "super::rules::billing_cycle"))]
    #[schema(example = "yearly")]
    pub billing_cycle: Option<String>,
    pub subscription_started_at: Option<DateTime<Utc>>,
    pub subscription_expires_at: Option<DateTime<Utc>>,
    pub auto_renew: Option<bool>,
}

#[async_trait]
impl FormRequest for UpdateSubscriptionRequest {
    fn authorize(identity: Option<&CurrentUser>) -> bool {
        access::super_admin(identity)
    }

    async fn after(&self, _ctx: &RuleContext<'_>, errors: &mut FieldErrors) -> AppResult<()> {
        let start = self.subscription_started_at.unwrap_or_else(Utc::now);
        if let Some(expires) = self.subscription_expires_at {
            if expires <= start {
                errors.add(
                    "subscription_expires_at",
                    "The subscription expires at must be a date after subscription started at.",
                );
            }
        }
        Ok(())
    }
}
