//! Landlord (tenant organisation) entity and subscription model.

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{SECONDS_PER_DAY, TRIAL_PERIOD_DAYS};

string_enum! {
    /// Service level controlling a landlord's resource limits.
    pub enum SubscriptionTier {
        Basic => "basic",
        Pro => "pro",
        Enterprise => "enterprise",
    }
}

string_enum! {
    pub enum SubscriptionStatus {
        Trial => "trial",
        Active => "active",
        PastDue => "past_due",
        Cancelled => "cancelled",
        Expired => "expired",
    }
}

string_enum! {
    pub enum BillingCycle {
        Monthly => "monthly",
        Yearly => "yearly",
    }
}

impl BillingCycle {
    /// End of one billing period starting at `from`.
    ///
    /// Calendar aware: Jan 31 + one month lands on the last day of February.
    pub fn advance(&self, from: DateTime<Utc>) -> DateTime<Utc> {
        let months = match self {
            BillingCycle::Monthly => Months::new(1),
            BillingCycle::Yearly => Months::new(12),
        };
        from.checked_add_months(months).unwrap_or(from)
    }
}

/// Per-tier resource caps. `None` means unlimited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionLimit {
    pub tier: SubscriptionTier,
    pub max_properties: Option<u32>,
    pub max_units: Option<u32>,
    pub max_users: Option<u32>,
    /// Monthly price in USD
    pub price: f64,
    pub features: Vec<String>,
}

impl SubscriptionLimit {
    /// Whether one more record fits under `cap` given the current count.
    pub fn allows(cap: Option<u32>, current: u64) -> bool {
        cap.map_or(true, |max| current < u64::from(max))
    }
}

impl SubscriptionTier {
    /// Static limit table.
    pub fn limits(&self) -> SubscriptionLimit {
        let features = |names: &[&str]| names.iter().map(|n| n.to_string()).collect();
        match self {
            SubscriptionTier::Basic => SubscriptionLimit {
                tier: *self,
                max_properties: Some(3),
                max_units: Some(20),
                max_users: Some(2),
                price: 19.0,
                features: features(&["leases", "payments"]),
            },
            SubscriptionTier::Pro => SubscriptionLimit {
                tier: *self,
                max_properties: Some(25),
                max_units: Some(250),
                max_users: Some(10),
                price: 59.0,
                features: features(&["leases", "payments", "document_templates", "multi_currency"]),
            },
            SubscriptionTier::Enterprise => SubscriptionLimit {
                tier: *self,
                max_properties: None,
                max_units: None,
                max_users: None,
                price: 199.0,
                features: features(&[
                    "leases",
                    "payments",
                    "document_templates",
                    "multi_currency",
                    "priority_support",
                ]),
            },
        }
    }
}

/// Landlord entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Landlord {
    pub id: Uuid,
    pub company_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub subscription_tier: SubscriptionTier,
    pub subscription_status: SubscriptionStatus,
    pub billing_cycle: BillingCycle,
    pub subscription_started_at: Option<DateTime<Utc>>,
    pub subscription_expires_at: Option<DateTime<Utc>>,
    pub auto_renew: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Landlord {
    /// New landlord on a trial of the given tier.
    pub fn on_trial(company_name: String, email: String, tier: SubscriptionTier, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            company_name,
            email,
            phone: None,
            address: None,
            is_active: true,
            subscription_tier: tier,
            subscription_status: SubscriptionStatus::Trial,
            billing_cycle: BillingCycle::Monthly,
            subscription_started_at: Some(now),
            subscription_expires_at: Some(now + Duration::days(TRIAL_PERIOD_DAYS)),
            auto_renew: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Signed whole days from `now` until expiry, rounded down; negative
    /// once expired.
    pub fn days_until_expiry(&self, now: DateTime<Utc>) -> Option<i64> {
        self.subscription_expires_at
            .map(|expires| (expires - now).num_seconds().div_euclid(SECONDS_PER_DAY))
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.subscription_expires_at
            .map_or(false, |expires| expires <= now)
    }

    /// Switch tier/cycle and restart the subscription period.
    ///
    /// Without an explicit expiry the period is one billing cycle from the
    /// start date.
    pub fn change_subscription(
        &mut self,
        tier: SubscriptionTier,
        cycle: BillingCycle,
        started_at: Option<DateTime<Utc>>,
        expires_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) {
        let start = started_at.unwrap_or(now);
        self.subscription_tier = tier;
        self.billing_cycle = cycle;
        self.subscription_started_at = Some(start);
        self.subscription_expires_at = Some(expires_at.unwrap_or_else(|| cycle.advance(start)));
        self.updated_at = now;
    }
}
