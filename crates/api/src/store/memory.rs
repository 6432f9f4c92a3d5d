//! In-process store.
//!
//! Keeps every table in a map behind one `RwLock`. Used by the default
//! server and by tests; data does not survive a restart.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{
    CurrencySettings, DocumentTemplate, DocumentType, Landlord, Lease, Payment, Property, Role,
    Unit, User,
};

use super::{Lookup, Store, Table};
use crate::requests::EMAIL_TAKEN;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    landlords: HashMap<Uuid, Landlord>,
    properties: HashMap<Uuid, Property>,
    units: HashMap<Uuid, Unit>,
    leases: HashMap<Uuid, Lease>,
    payments: HashMap<Uuid, Payment>,
    templates: HashMap<Uuid, DocumentTemplate>,
    currency: HashMap<Uuid, CurrencySettings>,
}

impl Tables {
    /// Rows of `table` in their wire shape, for column probes.
    fn rows(&self, table: Table) -> AppResult<Vec<Value>> {
        match table {
            Table::Users => to_rows(self.users.values()),
            Table::Landlords => to_rows(self.landlords.values()),
            Table::Properties => to_rows(self.properties.values()),
            Table::Units => to_rows(self.units.values()),
            Table::Leases => to_rows(self.leases.values()),
            Table::Payments => to_rows(self.payments.values()),
            Table::DocumentTemplates => to_rows(self.templates.values()),
        }
    }

    /// Insert `user` unless another user already holds its email.
    fn insert_user(&mut self, user: User) -> AppResult<User> {
        let taken = self
            .users
            .values()
            .any(|u| u.id != user.id && u.email.eq_ignore_ascii_case(&user.email));
        if taken {
            return Err(AppError::invalid("email", EMAIL_TAKEN));
        }
        self.users.insert(user.id, user.clone());
        Ok(user)
    }
}

fn to_rows<'a, T: Serialize + 'a>(records: impl Iterator<Item = &'a T>) -> AppResult<Vec<Value>> {
    records
        .map(|r| serde_json::to_value(r).map_err(|e| AppError::internal(e.to_string())))
        .collect()
}

fn column_matches(cell: &Value, expected: &str) -> bool {
    match cell {
        Value::String(s) => s.eq_ignore_ascii_case(expected),
        Value::Number(n) => n.to_string() == expected,
        Value::Bool(b) => b.to_string() == expected,
        _ => false,
    }
}

fn owned_by(row: &Value, landlord_id: Uuid) -> bool {
    column_matches(&row["landlord_id"], &landlord_id.to_string())
}

/// Oldest first, filtered by owning landlord.
fn listed<T: Clone>(
    records: &HashMap<Uuid, T>,
    landlord_id: Option<Uuid>,
    owner: impl Fn(&T) -> Option<Uuid>,
    created: impl Fn(&T) -> chrono::DateTime<chrono::Utc>,
) -> Vec<T> {
    let mut rows: Vec<T> = records
        .values()
        .filter(|r| landlord_id.map_or(true, |id| owner(r) == Some(id)))
        .cloned()
        .collect();
    rows.sort_by_key(|r| created(r));
    rows
}

/// Store backed by process memory.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn exists(&self, lookup: Lookup) -> AppResult<bool> {
        let tables = self.tables.read().await;
        let rows = tables.rows(lookup.table)?;
        let except = lookup.except.map(|id| id.to_string());

        Ok(rows.iter().any(|row| {
            column_matches(&row[lookup.column], &lookup.value)
                && lookup.landlord_id.map_or(true, |id| owned_by(row, id))
                && except
                    .as_deref()
                    .map_or(true, |skip| !column_matches(&row["id"], skip))
        }))
    }

    async fn count(&self, table: Table, landlord_id: Uuid) -> AppResult<u64> {
        let tables = self.tables.read().await;
        let rows = tables.rows(table)?;
        Ok(rows.iter().filter(|row| owned_by(row, landlord_id)).count() as u64)
    }

    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn list_users(&self, landlord_id: Option<Uuid>) -> AppResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(listed(&tables.users, landlord_id, |u| u.landlord_id, |u| u.created_at))
    }

    async fn save_user(&self, user: User) -> AppResult<User> {
        self.tables.write().await.insert_user(user)
    }

    async fn find_landlord(&self, id: Uuid) -> AppResult<Option<Landlord>> {
        Ok(self.tables.read().await.landlords.get(&id).cloned())
    }

    async fn list_landlords(&self) -> AppResult<Vec<Landlord>> {
        let tables = self.tables.read().await;
        Ok(listed(&tables.landlords, None, |l| Some(l.id), |l| l.created_at))
    }

    async fn save_landlord(&self, landlord: Landlord) -> AppResult<Landlord> {
        self.tables
            .write()
            .await
            .landlords
            .insert(landlord.id, landlord.clone());
        Ok(landlord)
    }

    async fn save_landlord_with_owner(
        &self,
        landlord: Landlord,
        owner: User,
    ) -> AppResult<(Landlord, User)> {
        let mut tables = self.tables.write().await;
        let owner = tables.insert_user(owner)?;
        tables.landlords.insert(landlord.id, landlord.clone());
        Ok((landlord, owner))
    }

    async fn find_owner(&self, landlord_id: Uuid) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(listed(&tables.users, Some(landlord_id), |u| u.landlord_id, |u| u.created_at)
            .into_iter()
            .find(|u| u.role == Role::Owner))
    }

    async fn find_property(&self, id: Uuid) -> AppResult<Option<Property>> {
        Ok(self.tables.read().await.properties.get(&id).cloned())
    }

    async fn list_properties(&self, landlord_id: Option<Uuid>) -> AppResult<Vec<Property>> {
        let tables = self.tables.read().await;
        Ok(listed(&tables.properties, landlord_id, |p| Some(p.landlord_id), |p| p.created_at))
    }

    async fn save_property(&self, property: Property) -> AppResult<Property> {
        self.tables
            .write()
            .await
            .properties
            .insert(property.id, property.clone());
        Ok(property)
    }

    async fn find_unit(&self, id: Uuid) -> AppResult<Option<Unit>> {
        Ok(self.tables.read().await.units.get(&id).cloned())
    }

    async fn list_units(&self, landlord_id: Option<Uuid>) -> AppResult<Vec<Unit>> {
        let tables = self.tables.read().await;
        Ok(listed(&tables.units, landlord_id, |u| Some(u.landlord_id), |u| u.created_at))
    }

    async fn save_unit(&self, unit: Unit) -> AppResult<Unit> {
        self.tables.write().await.units.insert(unit.id, unit.clone());
        Ok(unit)
    }

    async fn find_lease(&self, id: Uuid) -> AppResult<Option<Lease>> {
        Ok(self.tables.read().await.leases.get(&id).cloned())
    }

    async fn list_leases(&self, landlord_id: Option<Uuid>) -> AppResult<Vec<Lease>> {
        let tables = self.tables.read().await;
        Ok(listed(&tables.leases, landlord_id, |l| Some(l.landlord_id), |l| l.created_at))
    }

    async fn save_lease(&self, lease: Lease) -> AppResult<Lease> {
        self.tables.write().await.leases.insert(lease.id, lease.clone());
        Ok(lease)
    }

    async fn list_payments(&self, landlord_id: Option<Uuid>) -> AppResult<Vec<Payment>> {
        let tables = self.tables.read().await;
        Ok(listed(&tables.payments, landlord_id, |p| Some(p.landlord_id), |p| p.created_at))
    }

    async fn save_payment(&self, payment: Payment) -> AppResult<Payment> {
        self.tables
            .write()
            .await
            .payments
            .insert(payment.id, payment.clone());
        Ok(payment)
    }

    async fn find_template(&self, id: Uuid) -> AppResult<Option<DocumentTemplate>> {
        Ok(self.tables.read().await.templates.get(&id).cloned())
    }

    async fn list_templates(
        &self,
        landlord_id: Option<Uuid>,
        kind: Option<DocumentType>,
    ) -> AppResult<Vec<DocumentTemplate>> {
        let tables = self.tables.read().await;
        Ok(listed(&tables.templates, landlord_id, |t| Some(t.landlord_id), |t| t.created_at)
            .into_iter()
            .filter(|t| kind.map_or(true, |k| t.kind == k))
            .collect())
    }

    async fn save_template(&self, template: DocumentTemplate) -> AppResult<DocumentTemplate> {
        let mut tables = self.tables.write().await;
        // A landlord has at most one default template per document type.
        if template.is_default {
            for other in tables.templates.values_mut() {
                if other.id != template.id
                    && other.landlord_id == template.landlord_id
                    && other.kind == template.kind
                {
                    other.is_default = false;
                }
            }
        }
        tables.templates.insert(template.id, template.clone());
        Ok(template)
    }

    async fn delete_template(&self, id: Uuid) -> AppResult<()> {
        self.tables
            .write()
            .await
            .templates
            .remove(&id)
            .map(|_| ())
            .ok_or(AppError::NotFound)
    }

    async fn currency_settings(&self, landlord_id: Uuid) -> AppResult<Option<CurrencySettings>> {
        Ok(self.tables.read().await.currency.get(&landlord_id).cloned())
    }

    async fn save_currency_settings(&self, settings: CurrencySettings) -> AppResult<CurrencySettings> {
        self.tables
            .write()
            .await
            .currency
            .insert(settings.landlord_id, settings.clone());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain::SubscriptionTier;

    fn user(landlord_id: Option<Uuid>, email: &str, role: Role) -> User {
        User::new(
            landlord_id,
            "Test".to_string(),
            "User".to_string(),
            email.to_string(),
            role,
            String::new(),
        )
    }

    #[tokio::test]
    async fn test_exists_is_case_insensitive() {
        let store = MemoryStore::new();
        store.save_user(user(None, "taken@x.com", Role::SuperAdmin)).await.unwrap();

        let lookup = Lookup::new(Table::Users, "email", "TAKEN@x.com");
        assert!(store.exists(lookup).await.unwrap());
        assert!(!store.exists(Lookup::new(Table::Users, "email", "free@x.com")).await.unwrap());
    }

    #[tokio::test]
    async fn test_exists_honours_except_and_scope() {
        let store = MemoryStore::new();
        let landlord = Uuid::new_v4();
        let saved = store.save_user(user(Some(landlord), "a@x.com", Role::Owner)).await.unwrap();

        let same_row = Lookup::new(Table::Users, "email", "a@x.com").except(Some(saved.id));
        assert!(!store.exists(same_row).await.unwrap());

        let other_landlord = Lookup::new(Table::Users, "email", "a@x.com").scoped(Some(Uuid::new_v4()));
        assert!(!store.exists(other_landlord).await.unwrap());
    }

    #[tokio::test]
    async fn test_count_and_owner_lookup() {
        let store = MemoryStore::new();
        let landlord = store
            .save_landlord(Landlord::on_trial(
                "Acme".to_string(),
                "acme@x.com".to_string(),
                SubscriptionTier::Basic,
                Utc::now(),
            ))
            .await
            .unwrap();
        store.save_user(user(Some(landlord.id), "owner@x.com", Role::Owner)).await.unwrap();
        store.save_user(user(Some(landlord.id), "mgr@x.com", Role::Manager)).await.unwrap();

        assert_eq!(store.count(Table::Users, landlord.id).await.unwrap(), 2);
        assert_eq!(store.count(Table::Units, landlord.id).await.unwrap(), 0);
        assert_eq!(
            store.find_owner(landlord.id).await.unwrap().unwrap().email,
            "owner@x.com"
        );
    }

    #[tokio::test]
    async fn test_delete_missing_template_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.delete_template(Uuid::new_v4()).await,
            Err(AppError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_save_user_rejects_duplicate_email() {
        let store = MemoryStore::new();
        let first = store.save_user(user(None, "dup@x.com", Role::SuperAdmin)).await.unwrap();

        let err = store
            .save_user(user(Some(Uuid::new_v4()), "DUP@x.com", Role::Owner))
            .await
            .unwrap_err();
        match err {
            AppError::Validation(errors) => {
                assert_eq!(errors.get("email").unwrap(), [EMAIL_TAKEN]);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        // Re-saving the same row keeps its own email.
        assert!(store.save_user(first).await.is_ok());
    }

    #[tokio::test]
    async fn test_landlord_is_not_saved_when_owner_email_is_taken() {
        let store = MemoryStore::new();
        store.save_user(user(None, "owner@x.com", Role::SuperAdmin)).await.unwrap();
        let landlord = Landlord::on_trial(
            "Acme".to_string(),
            "acme@x.com".to_string(),
            SubscriptionTier::Basic,
            Utc::now(),
        );
        let owner = user(Some(landlord.id), "owner@x.com", Role::Owner);

        assert!(store.save_landlord_with_owner(landlord, owner).await.is_err());
        assert!(store.list_landlords().await.unwrap().is_empty());
    }
}
