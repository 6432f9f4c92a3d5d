use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use domain::{BillingCycle, Landlord, SubscriptionStatus, SubscriptionTier, User};

use super::UserResource;

/// Landlord with its subscription, tier limits and, when loaded, usage
/// counts and owner.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LandlordResource {
    pub id: Uuid,
    pub company_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub subscription: SubscriptionResource,
    pub limits: LimitResource,
    pub usage: Option<UsageResource>,
    pub owner: Option<UserResource>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubscriptionResource {
    pub tier: SubscriptionTier,
    pub status: SubscriptionStatus,
    pub billing_cycle: BillingCycle,
    pub started_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub auto_renew: bool,
    /// Whole days until expiry, negative once past; `null` without expiry
    pub days_until_expiry: Option<i64>,
    pub is_expired: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LimitResource {
    /// `null` means unlimited
    pub max_properties: Option<u32>,
    pub max_units: Option<u32>,
    pub max_users: Option<u32>,
    pub price: f64,
    pub features: Vec<String>,
}

/// Current record counts against the tier limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct UsageResource {
    pub properties: u64,
    pub units: u64,
    pub users: u64,
}

impl LandlordResource {
    pub fn new(
        landlord: &Landlord,
        owner: Option<&User>,
        usage: Option<UsageResource>,
        now: DateTime<Utc>,
    ) -> Self {
        let limits = landlord.subscription_tier.limits();

        Self {
            id: landlord.id,
            company_name: landlord.company_name.clone(),
            email: landlord.email.clone(),
            phone: landlord.phone.clone(),
            address: landlord.address.clone(),
            is_active: landlord.is_active,
            subscription: SubscriptionResource {
                tier: landlord.subscription_tier,
                status: landlord.subscription_status,
                billing_cycle: landlord.billing_cycle,
                started_at: landlord.subscription_started_at,
                expires_at: landlord.subscription_expires_at,
                auto_renew: landlord.auto_renew,
                days_until_expiry: landlord.days_until_expiry(now),
                is_expired: landlord.is_expired(now),
            },
            limits: LimitResource {
                max_properties: limits.max_properties,
                max_units: limits.max_units,
                max_users: limits.max_users,
                price: limits.price,
                features: limits.features,
            },
            usage,
            owner: owner.map(UserResource::from),
            created_at: landlord.created_at,
            updated_at: landlord.updated_at,
        }
    }
}
