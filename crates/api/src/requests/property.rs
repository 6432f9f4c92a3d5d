use async_trait::async_trait;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use common::{AppResult, FieldErrors};

use super::{access, FormRequest, RuleContext};
use crate::middleware::CurrentUser;
use crate::store::Table;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct StorePropertyRequest {
    #[validate(required, length(max = 255))]
    #[schema(example = "Cedar Court")]
    pub name: Option<String>,
    #[validate(required, length(max = 255))]
    #[schema(example = "12 Hamra Street")]
    pub address: Option<String>,
    #[validate(length(max = 255))]
    #[schema(example = "Beirut")]
    pub city: Option<String>,
}

#[async_trait]
impl FormRequest for StorePropertyRequest {
    fn authorize(identity: Option<&CurrentUser>) -> bool {
        access::manager(identity)
    }

    async fn after(&self, ctx: &RuleContext<'_>, errors: &mut FieldErrors) -> AppResult<()> {
        if let Some(landlord_id) = ctx.landlord_scope() {
            ctx.within_limit(errors, Table::Properties, landlord_id).await?;
        }
        Ok(())
    }
}
