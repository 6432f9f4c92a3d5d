use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use domain::{DocumentTemplate, DocumentType};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DocumentTemplateResource {
    pub id: Uuid,
    pub landlord_id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DocumentType,
    pub body: String,
    pub variables: Vec<String>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&DocumentTemplate> for DocumentTemplateResource {
    fn from(template: &DocumentTemplate) -> Self {
        Self {
            id: template.id,
            landlord_id: template.landlord_id,
            name: template.name.clone(),
            kind: template.kind,
            body: template.body.clone(),
            variables: template.variables.clone(),
            is_default: template.is_default,
            created_at: template.created_at,
            updated_at: template.updated_at,
        }
    }
}

/// Template body with placeholders substituted.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RenderedDocumentResource {
    pub template_id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DocumentType,
    pub html: String,
}

impl RenderedDocumentResource {
    pub fn new(template: &DocumentTemplate, html: String) -> Self {
        Self {
            template_id: template.id,
            name: template.name.clone(),
            kind: template.kind,
            html,
        }
    }
}
