use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use common::{AppResult, FieldErrors};

use super::{access, FormRequest, LandlordSchema, RuleContext};
use crate::middleware::CurrentUser;

/// New document template.
///
/// The schema depends on the caller: a super admin must name an existing
/// landlord, anyone else creates the template for their own landlord.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct StoreDocumentTemplateRequest {
    pub landlord_id: Option<Uuid>,
    #[validate(required, length(max = 255))]
    #[schema(example = "Standard receipt")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    #[validate(required, custom(function = "super::rules::document_type"))]
    #[schema(example = "payment_receipt")]
    pub kind: Option<String>,
    /// HTML with `{{ variable }}` placeholders
    #[validate(required, length(min = 1, max = 100000))]
    #[schema(example = "<p>Received {{ amount }} from {{ tenant_name }}.</p>")]
    pub body: Option<String>,
    /// Declared variables; defaults to the placeholders found in `body`
    #[validate(custom(function = "super::rules::variable_names"))]
    pub variables: Option<Vec<String>>,
    pub is_default: Option<bool>,
}

#[async_trait]
impl FormRequest for StoreDocumentTemplateRequest {
    fn authorize(identity: Option<&CurrentUser>) -> bool {
        access::administrator(identity)
    }

    async fn after(&self, ctx: &RuleContext<'_>, errors: &mut FieldErrors) -> AppResult<()> {
        LandlordSchema::for_identity(ctx.identity)
            .check(ctx, errors, self.landlord_id)
            .await
    }
}

/// Changes to a template. Every field is optional.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateDocumentTemplateRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[serde(rename = "type")]
    #[validate(custom(function = "super::rules::document_type"))]
    pub kind: Option<String>,
    #[validate(length(min = 1, max = 100000))]
    pub body: Option<String>,
    #[validate(custom(function = "super::rules::variable_names"))]
    pub variables: Option<Vec<String>>,
    pub is_default: Option<bool>,
}

impl FormRequest for UpdateDocumentTemplateRequest {
    fn authorize(identity: Option<&CurrentUser>) -> bool {
        access::administrator(identity)
    }
}

/// Values substituted into a template's placeholders.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct RenderDocumentRequest {
    #[serde(default)]
    pub values: HashMap<String, String>,
}

impl FormRequest for RenderDocumentRequest {
    fn authorize(identity: Option<&CurrentUser>) -> bool {
        access::active(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_type_is_read_from_wire_name() {
        let request: StoreDocumentTemplateRequest = serde_json::from_value(serde_json::json!({
            "name": "Receipt",
            "type": "payment_receipt",
            "body": "<p>{{ amount }}</p>"
        }))
        .unwrap();

        assert_eq!(request.kind.as_deref(), Some("payment_receipt"));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_unknown_type_rejected() {
        let request: StoreDocumentTemplateRequest = serde_json::from_value(serde_json::json!({
            "name": "Receipt",
            "type": "postcard",
            "body": "x"
        }))
        .unwrap();

        let errors = FieldErrors::from(&request.validate().unwrap_err());
        assert_eq!(errors.len(), 1);
    }
}
