use async_trait::async_trait;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use common::{AppError, AppResult, FieldErrors};
use domain::Role;

use super::{access, FormRequest, LandlordSchema, RuleContext, EMAIL_TAKEN};
use crate::middleware::CurrentUser;
use crate::store::{Lookup, Table};

/// Message when someone below owner level hands out the owner role.
pub const OWNER_ROLE_RESERVED: &str = "Only the account owner can assign the owner role.";

/// The owner role is assignable by super admins and owners only.
fn check_owner_role(ctx: &RuleContext<'_>, errors: &mut FieldErrors, role: Option<&str>) {
    if role == Some(Role::Owner.as_str()) && !access::account_owner(ctx.identity) {
        errors.add("role", OWNER_ROLE_RESERVED);
    }
}

/// New user of a landlord.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct StoreUserRequest {
    /// Required for super admins, ignored otherwise
    pub landlord_id: Option<Uuid>,
    #[validate(required, length(max = 255))]
    pub first_name: Option<String>,
    #[validate(required, length(max = 255))]
    pub last_name: Option<String>,
    #[validate(required, email, length(max = 255))]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub mobile: Option<String>,
    #[validate(required, custom(function = "super::rules::assignable_role"))]
    #[schema(example = "manager")]
    pub role: Option<String>,
    #[validate(required, length(min = 8))]
    pub password: Option<String>,
}

#[async_trait]
impl FormRequest for StoreUserRequest {
    fn authorize(identity: Option<&CurrentUser>) -> bool {
        access::administrator(identity)
    }

    async fn after(&self, ctx: &RuleContext<'_>, errors: &mut FieldErrors) -> AppResult<()> {
        let schema = LandlordSchema::for_identity(ctx.identity);
        schema.check(ctx, errors, self.landlord_id).await?;
        check_owner_role(ctx, errors, self.role.as_deref());

        if let Some(email) = &self.email {
            let lookup = Lookup::new(Table::Users, "email", email.as_str());
            ctx.unique(errors, "email", lookup, Some(EMAIL_TAKEN)).await?;
        }

        let target = match schema {
            LandlordSchema::SuperAdmin => self.landlord_id,
            LandlordSchema::Landlord => ctx.landlord_scope(),
        };
        if let Some(landlord_id) = target {
            ctx.within_limit(errors, Table::Users, landlord_id).await?;
        }
        Ok(())
    }
}

/// Changes to an existing user. Every field is optional.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 255))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub last_name: Option<String>,
    #[validate(email, length(max = 255))]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub mobile: Option<String>,
    #[validate(custom(function = "super::rules::assignable_role"))]
    pub role: Option<String>,
    pub is_active: Option<bool>,
    #[validate(length(min = 8))]
    pub password: Option<String>,
}

#[async_trait]
impl FormRequest for UpdateUserRequest {
    fn authorize(identity: Option<&CurrentUser>) -> bool {
        access::administrator(identity)
    }

    async fn after(&self, ctx: &RuleContext<'_>, errors: &mut FieldErrors) -> AppResult<()> {
        // Only super admins and owners may change an owner's role,
        // password or status.
        let sensitive = self.role.is_some() || self.password.is_some() || self.is_active.is_some();
        if sensitive && !access::account_owner(ctx.identity) {
            if let Some(id) = ctx.subject {
                // Owners of other landlords fall through to the handler's 404
                let target = ctx.store.find_user(id).await?;
                let visible_owner = target.filter(|u| u.role.is_owner()).map_or(false, |u| {
                    u.landlord_id.map_or(false, |l| ctx.landlord_scope() == Some(l))
                });
                if visible_owner {
                    return Err(AppError::Forbidden);
                }
            }
        }
        check_owner_role(ctx, errors, self.role.as_deref());

        if let Some(email) = &self.email {
            let lookup = Lookup::new(Table::Users, "email", email.as_str()).except(ctx.subject);
            ctx.unique(errors, "email", lookup, Some(EMAIL_TAKEN)).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::CurrentUser;
    use crate::store::{MemoryStore, Store};
    use domain::User;
    use validator::Validate;

    fn caller(role: Role, landlord_id: Uuid) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            landlord_id: Some(landlord_id),
            email: "caller@x.com".to_string(),
            role,
            is_active: true,
        }
    }

    fn store_request(role: &str) -> StoreUserRequest {
        StoreUserRequest {
            landlord_id: None,
            first_name: Some("Sam".to_string()),
            last_name: Some("Doe".to_string()),
            email: Some("sam@x.com".to_string()),
            mobile: None,
            role: Some(role.to_string()),
            password: Some("long-enough".to_string()),
        }
    }

    fn password_change() -> UpdateUserRequest {
        UpdateUserRequest {
            first_name: None,
            last_name: None,
            email: None,
            mobile: None,
            role: None,
            is_active: None,
            password: Some("hijacked-pass".to_string()),
        }
    }

    #[tokio::test]
    async fn test_admin_cannot_create_owner() {
        let store = MemoryStore::new();
        let landlord = Uuid::new_v4();
        let request = store_request("owner");
        assert!(request.validate().is_ok());

        let admin = caller(Role::Admin, landlord);
        let ctx = RuleContext {
            identity: Some(&admin),
            store: &store,
            subject: None,
        };
        let mut errors = FieldErrors::new();
        request.after(&ctx, &mut errors).await.unwrap();
        assert_eq!(errors.get("role").unwrap(), [OWNER_ROLE_RESERVED]);

        let owner = caller(Role::Owner, landlord);
        let ctx = RuleContext {
            identity: Some(&owner),
            store: &store,
            subject: None,
        };
        let mut errors = FieldErrors::new();
        request.after(&ctx, &mut errors).await.unwrap();
        assert!(!errors.has("role"));
    }

    #[tokio::test]
    async fn test_admin_cannot_touch_owner_credentials() {
        let store = MemoryStore::new();
        let landlord = Uuid::new_v4();
        let owner = store
            .save_user(User::new(
                Some(landlord),
                "Olga".to_string(),
                "Owner".to_string(),
                "owner@x.com".to_string(),
                Role::Owner,
                String::new(),
            ))
            .await
            .unwrap();

        let admin = caller(Role::Admin, landlord);
        let ctx = RuleContext {
            identity: Some(&admin),
            store: &store,
            subject: Some(owner.id),
        };
        let mut errors = FieldErrors::new();
        let result = password_change().after(&ctx, &mut errors).await;
        assert!(matches!(result, Err(AppError::Forbidden)));

        let super_admin = CurrentUser {
            landlord_id: None,
            role: Role::SuperAdmin,
            ..caller(Role::SuperAdmin, landlord)
        };
        let ctx = RuleContext {
            identity: Some(&super_admin),
            store: &store,
            subject: Some(owner.id),
        };
        let mut errors = FieldErrors::new();
        password_change().after(&ctx, &mut errors).await.unwrap();
        assert!(errors.is_empty());
    }
}
