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
pub struct StoreUnitRequest {
    #[validate(required)]
    pub property_id: Option<Uuid>,
    #[validate(required, length(max = 50))]
    #[schema(example = "3B")]
    pub unit_number: Option<String>,
    #[validate(range(min = -10, max = 200))]
    pub floor: Option<i32>,
    #[validate(range(max = 50))]
    pub bedrooms: Option<u32>,
    #[validate(range(max = 50))]
    pub bathrooms: Option<u32>,
    #[validate(range(min = 0.0))]
    pub area_sqm: Option<f64>,
    #[validate(required, range(min = 0.0))]
    #[schema(example = 650.0)]
    pub monthly_rent: Option<f64>,
    #[validate(custom(function = "super::rules::unit_status"))]
    #[schema(example = "vacant")]
    pub status: Option<String>,
}

#[async_trait]
impl FormRequest for StoreUnitRequest {
    fn authorize(identity: Option<&CurrentUser>) -> bool {
        access::manager(identity)
    }

    async fn after(&self, ctx: &RuleContext<'_>, errors: &mut FieldErrors) -> AppResult<()> {
        let scope = ctx.landlord_scope();
        if let Some(property_id) = self.property_id {
            let lookup = Lookup::new(Table::Properties, "id", property_id.to_string()).scoped(scope);
            ctx.exists(errors, "property_id", lookup).await?;
        }
        if let Some(landlord_id) = scope {
            ctx.within_limit(errors, Table::Units, landlord_id).await?;
        }
        Ok(())
    }
}
