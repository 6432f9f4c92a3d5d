//! Leases and the payments recorded against them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::currency::Currency;

string_enum! {
    pub enum LeaseStatus {
        Pending => "pending",
        Active => "active",
        Expired => "expired",
        Terminated => "terminated",
    }
}

string_enum! {
    pub enum PaymentMethod {
        Cash => "cash",
        BankTransfer => "bank_transfer",
        Cheque => "cheque",
        Card => "card",
        Other => "other",
    }
}

/// Lease entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lease {
    pub id: Uuid,
    pub landlord_id: Uuid,
    pub unit_id: Uuid,
    pub tenant_name: String,
    pub tenant_email: Option<String>,
    pub tenant_phone: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub monthly_rent: f64,
    pub deposit: Option<f64>,
    pub currency: Currency,
    /// Day of month rent falls due
    pub payment_day: u8,
    pub status: LeaseStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lease {
    /// Length of the lease in days, end date inclusive.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Days left until the end date, never negative.
    pub fn days_remaining(&self, today: NaiveDate) -> i64 {
        (self.end_date - today).num_days().max(0)
    }
}

/// Payment entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub landlord_id: Uuid,
    pub lease_id: Uuid,
    pub amount: f64,
    pub currency: Currency,
    pub paid_on: NaiveDate,
    pub method: PaymentMethod,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
