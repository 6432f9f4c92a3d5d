use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use domain::{Currency, Lease, LeaseStatus, Payment, PaymentMethod, Unit};

/// Unit reference embedded in a lease.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UnitSummary {
    pub id: Uuid,
    pub unit_number: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaseResource {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub tenant_name: String,
    pub tenant_email: Option<String>,
    pub tenant_phone: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub monthly_rent: f64,
    pub deposit: Option<f64>,
    pub currency: Currency,
    pub payment_day: u8,
    pub status: LeaseStatus,
    /// Inclusive length in days
    pub duration_days: i64,
    /// Days left relative to `now`, never negative
    pub days_remaining: i64,
    pub unit: Option<UnitSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LeaseResource {
    pub fn new(lease: &Lease, unit: Option<&Unit>, now: DateTime<Utc>) -> Self {
        Self {
            id: lease.id,
            unit_id: lease.unit_id,
            tenant_name: lease.tenant_name.clone(),
            tenant_email: lease.tenant_email.clone(),
            tenant_phone: lease.tenant_phone.clone(),
            start_date: lease.start_date,
            end_date: lease.end_date,
            monthly_rent: lease.monthly_rent,
            deposit: lease.deposit,
            currency: lease.currency,
            payment_day: lease.payment_day,
            status: lease.status,
            duration_days: lease.duration_days(),
            days_remaining: lease.days_remaining(now.date_naive()),
            unit: unit.map(|u| UnitSummary {
                id: u.id,
                unit_number: u.unit_number.clone(),
            }),
            created_at: lease.created_at,
            updated_at: lease.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaymentResource {
    pub id: Uuid,
    pub lease_id: Uuid,
    pub amount: f64,
    pub currency: Currency,
    pub paid_on: NaiveDate,
    pub method: PaymentMethod,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Payment> for PaymentResource {
    fn from(payment: &Payment) -> Self {
        Self {
            id: payment.id,
            lease_id: payment.lease_id,
            amount: payment.amount,
            currency: payment.currency,
            paid_on: payment.paid_on,
            method: payment.method,
            reference: payment.reference.clone(),
            notes: payment.notes.clone(),
            created_at: payment.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn lease() -> Lease {
        let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        Lease {
            id: Uuid::new_v4(),
            landlord_id: Uuid::new_v4(),
            unit_id: Uuid::new_v4(),
            tenant_name: "Rami".to_string(),
            tenant_email: None,
            tenant_phone: None,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            monthly_rent: 500.0,
            deposit: None,
            currency: Currency::Usd,
            payment_day: 1,
            status: LeaseStatus::Active,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_dates_and_derived_days() {
        let now = Utc.with_ymd_and_hms(2025, 12, 21, 15, 0, 0).unwrap();
        let json = serde_json::to_value(LeaseResource::new(&lease(), None, now)).unwrap();

        assert_eq!(json["start_date"], "2025-01-01");
        assert_eq!(json["duration_days"], 365);
        assert_eq!(json["days_remaining"], 10);
        assert!(json["unit"].is_null());
        assert!(json["deposit"].is_null());
    }
}
