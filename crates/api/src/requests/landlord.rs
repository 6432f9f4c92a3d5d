use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use common::{AppResult, FieldErrors};

use super::{access, FormRequest, RuleContext, EMAIL_TAKEN};
use crate::middleware::CurrentUser;
use crate::store::{Lookup, Table};

/// Owner account created together with a landlord.
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct OwnerInput {
    #[validate(required, length(max = 255))]
    #[schema(example = "Ada")]
    pub first_name: Option<String>,
    #[validate(required, length(max = 255))]
    #[schema(example = "Lovelace")]
    pub last_name: Option<String>,
    #[validate(required, email, length(max = 255))]
    #[schema(example = "ada@acme.test")]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub mobile: Option<String>,
    #[validate(required, length(min = 8))]
    pub password: Option<String>,
}

impl OwnerInput {
    /// Static rules under the `owner.` prefix plus email uniqueness.
    pub(super) async fn check(&self, ctx: &RuleContext<'_>, errors: &mut FieldErrors) -> AppResult<()> {
        if let Err(e) = self.validate() {
            errors.extend_from_validator(&e, "owner.");
        }
        if let Some(email) = &self.email {
            let lookup = Lookup::new(Table::Users, "email", email.as_str());
            ctx.unique(errors, "owner.email", lookup, Some(EMAIL_TAKEN)).await?;
        }
        Ok(())
    }
}

/// `unique:landlords,email`, ignoring `except`.
pub(super) async fn check_landlord_email(
    ctx: &RuleContext<'_>,
    errors: &mut FieldErrors,
    email: Option<&str>,
    except: Option<Uuid>,
) -> AppResult<()> {
    match email {
        Some(email) => {
            let lookup = Lookup::new(Table::Landlords, "email", email).except(except);
            ctx.unique(errors, "email", lookup, None).await
        }
        None => Ok(()),
    }
}

/// Landlord created by a super admin.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct StoreLandlordRequest {
    #[validate(required, length(max = 255))]
    #[schema(example = "Acme Rentals")]
    pub company_name: Option<String>,
    #[validate(required, email, length(max = 255))]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
    #[validate(required, custom(function = "super::rules::subscription_tier"))]
    #[schema(example = "pro")]
    pub subscription_tier: Option<String>,
    #[validate(custom(function = "super::rules::subscription_status"))]
    #[schema(example = "active")]
    pub subscription_status: Option<String>,
    #[validate(custom(function = "super::rules::billing_cycle"))]
    #[schema(example = "monthly")]
    pub billing_cycle: Option<String>,
    pub auto_renew: Option<bool>,
    #[validate(required)]
    pub owner: Option<OwnerInput>,
}

#[async_trait]
impl FormRequest for StoreLandlordRequest {
    fn authorize(identity: Option<&CurrentUser>) -> bool {
        access::super_admin(identity)
    }

    async fn after(&self, ctx: &RuleContext<'_>, errors: &mut FieldErrors) -> AppResult<()> {
        check_landlord_email(ctx, errors, self.email.as_deref(), None).await?;
        if let Some(owner) = &self.owner {
            owner.check(ctx, errors).await?;
        }
        Ok(())
    }
}

/// Landlord profile changes. Every field is optional.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateLandlordRequest {
    #[validate(length(min = 1, max = 255))]
    pub company_name: Option<String>,
    #[validate(email, length(max = 255))]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
    pub is_active: Option<bool>,
    pub auto_renew: Option<bool>,
}

#[async_trait]
impl FormRequest for UpdateLandlordRequest {
    fn authorize(identity: Option<&CurrentUser>) -> bool {
        access::account_owner(identity)
    }

    async fn after(&self, ctx: &RuleContext<'_>, errors: &mut FieldErrors) -> AppResult<()> {
        check_landlord_email(ctx, errors, self.email.as_deref(), ctx.subject).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner(email: &str) -> OwnerInput {
        OwnerInput {
            first_name: Some("A".to_string()),
            last_name: Some("B".to_string()),
            email: Some(email.to_string()),
            mobile: Some("123".to_string()),
            password: Some("long-enough".to_string()),
        }
    }

    #[test]
    fn test_owner_static_rules() {
        assert!(owner("a@b.test").validate().is_ok());

        let mut bad = owner("not-an-email");
        bad.first_name = None;
        let errors = FieldErrors::from(&bad.validate().unwrap_err());
        assert!(errors.has("email"));
        assert!(errors.has("first_name"));
    }

    #[test]
    fn test_store_landlord_requires_tier_and_owner() {
        let request = StoreLandlordRequest {
            company_name: Some("Acme".to_string()),
            email: Some("acme@x.test".to_string()),
            phone: None,
            address: None,
            subscription_tier: Some("platinum".to_string()),
            subscription_status: None,
            billing_cycle: None,
            auto_renew: None,
            owner: None,
        };
        let errors = FieldErrors::from(&request.validate().unwrap_err());

        assert_eq!(errors.get("subscription_tier").unwrap(), ["The selected subscription tier is invalid."]);
        assert_eq!(errors.get("owner").unwrap(), ["The owner field is required."]);
    }
}
