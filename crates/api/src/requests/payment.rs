use async_trait::async_trait;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use common::{AppResult, FieldErrors};

use super::{access, FormRequest, RuleContext};
use crate::middleware::CurrentUser;
use crate::store::{Lookup, Table};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct StorePaymentRequest {
    #[validate(required)]
    pub lease_id: Option<Uuid>,
    #[validate(required, range(min = 0.01))]
    #[schema(example = 650.0)]
    pub amount: Option<f64>,
    /// Defaults to the lease currency
    #[validate(custom(function = "super::rules::currency"))]
    pub currency: Option<String>,
    #[validate(required, custom(function = "super::rules::date"))]
    #[schema(example = "2025-03-01")]
    pub paid_on: Option<String>,
    #[validate(required, custom(function = "super::rules::payment_method"))]
    #[schema(example = "bank_transfer")]
    pub method: Option<String>,
    #[validate(length(max = 255))]
    pub reference: Option<String>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

#[async_trait]
impl FormRequest for StorePaymentRequest {
    fn authorize(identity: Option<&CurrentUser>) -> bool {
        access::manager(identity)
    }

    async fn after(&self, ctx: &RuleContext<'_>, errors: &mut FieldErrors) -> AppResult<()> {
        if let Some(lease_id) = self.lease_id {
            let lookup = Lookup::new(Table::Leases, "id", lease_id.to_string()).scoped(ctx.landlord_scope());
            ctx.exists(errors, "lease_id", lookup).await?;
        }
        Ok(())
    }
}
