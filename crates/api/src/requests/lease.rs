use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use common::{AppResult, FieldErrors};

use super::{access, rules::DATE_FORMAT, FormRequest, RuleContext};
use crate::middleware::CurrentUser;
use crate::store::{Lookup, Table};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct StoreLeaseRequest {
    #[validate(required)]
    pub unit_id: Option<Uuid>,
    #[validate(required, length(max = 255))]
    #[schema(example = "Rami Haddad")]
    pub tenant_name: Option<String>,
    #[validate(email, length(max = 255))]
    pub tenant_email: Option<String>,
    #[validate(length(max = 20))]
    pub tenant_phone: Option<String>,
    #[validate(required, custom(function = "super::rules::date"))]
    #[schema(example = "2025-01-01")]
    pub start_date: Option<String>,
    #[validate(required, custom(function = "super::rules::date"))]
    #[schema(example = "2025-12-31")]
    pub end_date: Option<String>,
    #[validate(required, range(min = 0.0))]
    pub monthly_rent: Option<f64>,
    #[validate(range(min = 0.0))]
    pub deposit: Option<f64>,
    /// Defaults to the landlord's primary currency
    #[validate(custom(function = "super::rules::currency"))]
    #[schema(example = "USD")]
    pub currency: Option<String>,
    #[validate(range(min = 1, max = 28))]
    pub payment_day: Option<u8>,
    #[validate(custom(function = "super::rules::lease_status"))]
    pub status: Option<String>,
}

#[async_trait]
impl FormRequest for StoreLeaseRequest {
    fn authorize(identity: Option<&CurrentUser>) -> bool {
        access::manager(identity)
    }

    async fn after(&self, ctx: &RuleContext<'_>, errors: &mut FieldErrors) -> AppResult<()> {
        if let Some(unit_id) = self.unit_id {
            let lookup = Lookup::new(Table::Units, "id", unit_id.to_string()).scoped(ctx.landlord_scope());
            ctx.exists(errors, "unit_id", lookup).await?;
        }

        let date = |v: &Option<String>| {
            v.as_deref()
                .and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok())
        };
        if let (Some(start), Some(end)) = (date(&self.start_date), date(&self.end_date)) {
            if end <= start {
                errors.add("end_date", "The end date must be a date after start date.");
            }
        }
        Ok(())
    }
}
