use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use domain::{Role, User};

/// Public user shape. The password hash never leaves the store.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResource {
    pub id: Uuid,
    pub landlord_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    #[schema(example = "Ada Lovelace")]
    pub full_name: String,
    pub email: String,
    pub mobile: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserResource {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            landlord_id: user.landlord_id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            full_name: user.full_name(),
            email: user.email.clone(),
            mobile: user.mobile.clone(),
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
