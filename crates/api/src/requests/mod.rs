//! Request validators.
//!
//! Each endpoint that accepts a body has a request type implementing
//! [`FormRequest`]. The extractor runs three stages in order:
//!
//! 1. `authorize` over the caller identity (403 on failure)
//! 2. the static `validator` rules derived on the struct
//! 3. `after`, for rules that read the store or depend on the caller
//!
//! Stages 2 and 3 write into one [`FieldErrors`] map, so every violation of
//! every field is reported together.

pub mod access;
pub mod rules;

mod auth;
mod currency;
mod document_template;
mod landlord;
mod lease;
mod payment;
mod property;
mod subscription;
mod unit;
mod user;

pub use auth::{LoginRequest, RegisterLandlordRequest};
pub use currency::UpdateCurrencySettingsRequest;
pub use document_template::{
    RenderDocumentRequest, StoreDocumentTemplateRequest, UpdateDocumentTemplateRequest,
};
pub use landlord::{OwnerInput, StoreLandlordRequest, UpdateLandlordRequest};
pub use lease::StoreLeaseRequest;
pub use payment::StorePaymentRequest;
pub use property::StorePropertyRequest;
pub use subscription::UpdateSubscriptionRequest;
pub use unit::StoreUnitRequest;
pub use user::{StoreUserRequest, UpdateUserRequest};

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use uuid::Uuid;
use validator::Validate;

use common::{field_errors, AppError, AppResult, FieldErrors};
use domain::SubscriptionLimit;

use crate::middleware::CurrentUser;
use crate::store::{Lookup, Store, Table};

/// Message for a failed `unique` rule on an owner or user email.
pub const EMAIL_TAKEN: &str = "This email address is already registered.";

/// A validated request body.
#[async_trait]
pub trait FormRequest: DeserializeOwned + Validate + Send + Sync + 'static {
    /// Whether the caller may make this request at all.
    fn authorize(identity: Option<&CurrentUser>) -> bool;

    /// Store-backed and identity-dependent rules.
    async fn after(&self, _ctx: &RuleContext<'_>, _errors: &mut FieldErrors) -> AppResult<()> {
        Ok(())
    }
}

/// What `after` rules may consult.
pub struct RuleContext<'a> {
    pub identity: Option<&'a CurrentUser>,
    pub store: &'a dyn Store,
    /// Id of the record addressed by the route, for `unique` on update
    pub subject: Option<Uuid>,
}

impl<'a> RuleContext<'a> {
    /// Landlord whose records the caller sees; `None` for super admins.
    pub fn landlord_scope(&self) -> Option<Uuid> {
        self.identity.and_then(CurrentUser::landlord_scope)
    }

    /// `exists:<table>,<column>`
    pub async fn exists(&self, errors: &mut FieldErrors, field: &str, lookup: Lookup) -> AppResult<()> {
        if !self.store.exists(lookup).await? {
            errors.add(field, format!("The selected {} is invalid.", field_errors::label(field)));
        }
        Ok(())
    }

    /// `unique:<table>,<column>`, with an optional override message.
    pub async fn unique(
        &self,
        errors: &mut FieldErrors,
        field: &str,
        lookup: Lookup,
        message: Option<&str>,
    ) -> AppResult<()> {
        if self.store.exists(lookup).await? {
            let message = message
                .map(str::to_owned)
                .unwrap_or_else(|| format!("The {} has already been taken.", field_errors::label(field)));
            errors.add(field, message);
        }
        Ok(())
    }

    /// Reject creating one more `table` row when the landlord's tier is full.
    pub async fn within_limit(
        &self,
        errors: &mut FieldErrors,
        table: Table,
        landlord_id: Uuid,
    ) -> AppResult<()> {
        let Some(landlord) = self.store.find_landlord(landlord_id).await? else {
            return Ok(());
        };
        let limits = landlord.subscription_tier.limits();
        let cap = match table {
            Table::Properties => limits.max_properties,
            Table::Units => limits.max_units,
            Table::Users => limits.max_users,
            _ => None,
        };

        let current = self.store.count(table, landlord_id).await?;
        if !SubscriptionLimit::allows(cap, current) {
            errors.add(
                "subscription_tier",
                format!(
                    "The {} plan allows at most {} {}.",
                    landlord.subscription_tier,
                    cap.unwrap_or_default(),
                    table.name().replace('_', " ")
                ),
            );
        }
        Ok(())
    }
}

/// Schema variants for requests that name a landlord.
///
/// Super admins act on any landlord and must say which one; everyone else
/// acts on their own landlord and `landlord_id` is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandlordSchema {
    SuperAdmin,
    Landlord,
}

impl LandlordSchema {
    pub fn for_identity(identity: Option<&CurrentUser>) -> Self {
        match identity {
            Some(user) if user.is_super_admin() => LandlordSchema::SuperAdmin,
            _ => LandlordSchema::Landlord,
        }
    }

    /// Apply the variant's `landlord_id` rules.
    pub async fn check(
        &self,
        ctx: &RuleContext<'_>,
        errors: &mut FieldErrors,
        landlord_id: Option<Uuid>,
    ) -> AppResult<()> {
        match (self, landlord_id) {
            (LandlordSchema::Landlord, _) => Ok(()),
            (LandlordSchema::SuperAdmin, None) => {
                errors.add("landlord_id", "The landlord id field is required.");
                Ok(())
            }
            (LandlordSchema::SuperAdmin, Some(id)) => {
                ctx.exists(errors, "landlord_id", Lookup::new(Table::Landlords, "id", id.to_string()))
                    .await
            }
        }
    }

    /// Landlord the validated request acts on.
    pub fn target(identity: &CurrentUser, landlord_id: Option<Uuid>) -> AppResult<Uuid> {
        match Self::for_identity(Some(identity)) {
            LandlordSchema::SuperAdmin => landlord_id,
            LandlordSchema::Landlord => identity.landlord_id,
        }
        .ok_or(AppError::Forbidden)
    }
}

/// Run the static rules and then `after`, collecting every violation.
pub async fn validate_request<T: FormRequest>(request: &T, ctx: &RuleContext<'_>) -> AppResult<()> {
    let mut errors = match request.validate() {
        Ok(()) => FieldErrors::new(),
        Err(e) => FieldErrors::from(&e),
    };
    request.after(ctx, &mut errors).await?;

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

/// Parse a field already checked by [`rules::date`].
pub fn parse_date(field: &str, value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, rules::DATE_FORMAT)
        .map_err(|_| AppError::invalid(field, format!("The {} field must be a valid date.", field_errors::label(field))))
}

/// Value of a field marked `required`, after validation has passed.
pub fn required<'a, T>(field: &str, value: &'a Option<T>) -> AppResult<&'a T> {
    value
        .as_ref()
        .ok_or_else(|| AppError::invalid(field, format!("The {} field is required.", field_errors::label(field))))
}

/// Parse an enum field already checked by a membership rule.
pub fn parse_enum<E: std::str::FromStr>(field: &str, value: &str) -> AppResult<E> {
    value
        .parse()
        .map_err(|_| AppError::invalid(field, format!("The selected {} is invalid.", field_errors::label(field))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::Utc;
    use domain::{Landlord, Role, SubscriptionTier};

    fn identity(role: Role, landlord_id: Option<Uuid>) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            landlord_id,
            email: "caller@x.com".to_string(),
            role,
            is_active: true,
        }
    }

    #[test]
    fn test_schema_follows_identity() {
        let admin = identity(Role::SuperAdmin, None);
        let owner = identity(Role::Owner, Some(Uuid::new_v4()));

        assert_eq!(LandlordSchema::for_identity(Some(&admin)), LandlordSchema::SuperAdmin);
        assert_eq!(LandlordSchema::for_identity(Some(&owner)), LandlordSchema::Landlord);
        assert_eq!(LandlordSchema::for_identity(None), LandlordSchema::Landlord);
    }

    #[test]
    fn test_target_ignores_landlord_id_for_tenants() {
        let own = Uuid::new_v4();
        let owner = identity(Role::Owner, Some(own));
        assert_eq!(LandlordSchema::target(&owner, Some(Uuid::new_v4())).unwrap(), own);

        let admin = identity(Role::SuperAdmin, None);
        assert!(matches!(LandlordSchema::target(&admin, None), Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_super_admin_variant_requires_existing_landlord() {
        let store = MemoryStore::new();
        let landlord = store
            .save_landlord(Landlord::on_trial(
                "Acme".to_string(),
                "acme@x.com".to_string(),
                SubscriptionTier::Basic,
                Utc::now(),
            ))
            .await
            .unwrap();
        let admin = identity(Role::SuperAdmin, None);
        let ctx = RuleContext {
            identity: Some(&admin),
            store: &store,
            subject: None,
        };

        let mut errors = FieldErrors::new();
        LandlordSchema::SuperAdmin.check(&ctx, &mut errors, None).await.unwrap();
        assert!(errors.has("landlord_id"));

        let mut errors = FieldErrors::new();
        LandlordSchema::SuperAdmin
            .check(&ctx, &mut errors, Some(Uuid::new_v4()))
            .await
            .unwrap();
        assert!(errors.has("landlord_id"));

        let mut errors = FieldErrors::new();
        LandlordSchema::SuperAdmin
            .check(&ctx, &mut errors, Some(landlord.id))
            .await
            .unwrap();
        assert!(errors.is_empty());
    }

    #[tokio::test]
    async fn test_tier_limit_reported_on_subscription_tier() {
        let store = MemoryStore::new();
        let landlord = store
            .save_landlord(Landlord::on_trial(
                "Acme".to_string(),
                "acme@x.com".to_string(),
                SubscriptionTier::Basic,
                Utc::now(),
            ))
            .await
            .unwrap();
        for n in 0..2 {
            store
                .save_user(domain::User::new(
                    Some(landlord.id),
                    "Staff".to_string(),
                    n.to_string(),
                    format!("staff{}@x.com", n),
                    Role::Manager,
                    String::new(),
                ))
                .await
                .unwrap();
        }
        let ctx = RuleContext {
            identity: None,
            store: &store,
            subject: None,
        };

        let mut errors = FieldErrors::new();
        ctx.within_limit(&mut errors, Table::Users, landlord.id).await.unwrap();
        assert!(errors.has("subscription_tier"));

        let mut errors = FieldErrors::new();
        ctx.within_limit(&mut errors, Table::Properties, landlord.id).await.unwrap();
        assert!(errors.is_empty());
    }

    #[test]
    fn test_required_and_parse_helpers() {
        let missing: Option<String> = None;
        let err = required("company_name", &missing).unwrap_err();
        assert!(err.field_errors().unwrap().has("company_name"));

        assert!(parse_enum::<SubscriptionTier>("subscription_tier", "gold").is_err());
        assert!(parse_date("start_date", "2024-02-30").is_err());
        assert!(parse_date("start_date", "2024-02-29").is_ok());
    }
}
