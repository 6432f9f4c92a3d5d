//! User entity and role model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

string_enum! {
    /// Closed set of user roles.
    ///
    /// Authorization is decided by pure predicates over this enum; there is
    /// no role hierarchy beyond what the predicates spell out.
    pub enum Role {
        /// Platform operator, manages all landlords
        SuperAdmin => "super_admin",
        /// Owner of a landlord account
        Owner => "owner",
        Admin => "admin",
        Manager => "manager",
        Staff => "staff",
    }
}

impl Role {
    pub fn is_super_admin(&self) -> bool {
        matches!(self, Role::SuperAdmin)
    }

    pub fn is_owner(&self) -> bool {
        matches!(self, Role::Owner)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn is_manager(&self) -> bool {
        matches!(self, Role::Manager)
    }

    /// Roles a landlord's own staff may be given. Super admin is never
    /// assignable through the landlord-facing API.
    pub fn assignable() -> Vec<&'static str> {
        Role::ALL
            .iter()
            .filter(|r| !r.is_super_admin())
            .map(|r| r.as_str())
            .collect()
    }
}

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// Owning landlord; `None` only for super admins
    pub landlord_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile: Option<String>,
    pub role: Role,
    pub is_active: bool,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create an active user.
    pub fn new(
        landlord_id: Option<Uuid>,
        first_name: String,
        last_name: String,
        email: String,
        role: Role,
        password_hash: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            landlord_id,
            first_name,
            last_name,
            email,
            mobile: None,
            role,
            is_active: true,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn is_super_admin(&self) -> bool {
        self.role.is_super_admin()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
