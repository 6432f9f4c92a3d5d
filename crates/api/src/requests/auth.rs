use async_trait::async_trait;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use common::{AppResult, FieldErrors};

use super::{access, landlord::OwnerInput, FormRequest, RuleContext};
use crate::middleware::CurrentUser;

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(required, email)]
    #[schema(example = "owner@acme.test")]
    pub email: Option<String>,
    #[validate(required)]
    #[schema(example = "secret-password")]
    pub password: Option<String>,
}

impl FormRequest for LoginRequest {
    fn authorize(identity: Option<&CurrentUser>) -> bool {
        access::anyone(identity)
    }
}

/// Self-service sign-up: a landlord on trial plus its owner account.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterLandlordRequest {
    #[validate(required, length(max = 255))]
    #[schema(example = "Acme Rentals")]
    pub company_name: Option<String>,
    #[validate(required, email, length(max = 255))]
    #[schema(example = "billing@acme.test")]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    /// Trial tier, defaults to basic
    #[validate(custom(function = "super::rules::subscription_tier"))]
    #[schema(example = "basic")]
    pub subscription_tier: Option<String>,
    #[validate(required)]
    pub owner: Option<OwnerInput>,
}

#[async_trait]
impl FormRequest for RegisterLandlordRequest {
    fn authorize(identity: Option<&CurrentUser>) -> bool {
        access::anyone(identity)
    }

    async fn after(&self, ctx: &RuleContext<'_>, errors: &mut FieldErrors) -> AppResult<()> {
        super::landlord::check_landlord_email(ctx, errors, self.email.as_deref(), None).await?;
        if let Some(owner) = &self.owner {
            owner.check(ctx, errors).await?;
        }
        Ok(())
    }
}
