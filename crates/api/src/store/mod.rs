//! Persistence boundary.
//!
//! Handlers and validators only talk to [`Store`]. It exposes key lookups,
//! upserts, existence checks and per-landlord counts; query planning and
//! durability belong to the implementation.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use uuid::Uuid;

use common::AppResult;
use domain::{
    CurrencySettings, DocumentTemplate, DocumentType, Landlord, Lease, Payment, Property, Unit,
    User,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Record collections known to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Users,
    Landlords,
    Properties,
    Units,
    Leases,
    Payments,
    DocumentTemplates,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::Users => "users",
            Table::Landlords => "landlords",
            Table::Properties => "properties",
            Table::Units => "units",
            Table::Leases => "leases",
            Table::Payments => "payments",
            Table::DocumentTemplates => "document_templates",
        }
    }
}

/// An `exists:<table>,<column>` probe.
///
/// `column` uses wire names (`email`, `id`, `type`). String comparison is
/// ASCII case-insensitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Lookup {
    pub table: Table,
    pub column: &'static str,
    pub value: String,
    /// Only rows owned by this landlord count
    pub landlord_id: Option<Uuid>,
    /// Ignore the row with this id (updates checking uniqueness)
    pub except: Option<Uuid>,
}

impl Lookup {
    pub fn new(table: Table, column: &'static str, value: impl Into<String>) -> Self {
        Self {
            table,
            column,
            value: value.into(),
            landlord_id: None,
            except: None,
        }
    }

    pub fn scoped(mut self, landlord_id: Option<Uuid>) -> Self {
        self.landlord_id = landlord_id;
        self
    }

    pub fn except(mut self, id: Option<Uuid>) -> Self {
        self.except = id;
        self
    }
}

/// Storage operations used by the API.
///
/// `save_*` methods insert or replace by id. `list_*` methods return rows
/// oldest first; `None` as landlord means every landlord.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait Store: Send + Sync {
    /// Whether any row satisfies the lookup
    async fn exists(&self, lookup: Lookup) -> AppResult<bool>;

    /// Number of rows of `table` owned by `landlord_id`
    async fn count(&self, table: Table, landlord_id: Uuid) -> AppResult<u64>;

    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn list_users(&self, landlord_id: Option<Uuid>) -> AppResult<Vec<User>>;
    async fn save_user(&self, user: User) -> AppResult<User>;

    async fn find_landlord(&self, id: Uuid) -> AppResult<Option<Landlord>>;
    async fn list_landlords(&self) -> AppResult<Vec<Landlord>>;
    async fn save_landlord(&self, landlord: Landlord) -> AppResult<Landlord>;
    /// Save a new landlord and its owner together, or neither
    async fn save_landlord_with_owner(
        &self,
        landlord: Landlord,
        owner: User,
    ) -> AppResult<(Landlord, User)>;
    /// The landlord's user with the owner role
    async fn find_owner(&self, landlord_id: Uuid) -> AppResult<Option<User>>;

    async fn find_property(&self, id: Uuid) -> AppResult<Option<Property>>;
    async fn list_properties(&self, landlord_id: Option<Uuid>) -> AppResult<Vec<Property>>;
    async fn save_property(&self, property: Property) -> AppResult<Property>;

    async fn find_unit(&self, id: Uuid) -> AppResult<Option<Unit>>;
    async fn list_units(&self, landlord_id: Option<Uuid>) -> AppResult<Vec<Unit>>;
    async fn save_unit(&self, unit: Unit) -> AppResult<Unit>;

    async fn find_lease(&self, id: Uuid) -> AppResult<Option<Lease>>;
    async fn list_leases(&self, landlord_id: Option<Uuid>) -> AppResult<Vec<Lease>>;
    async fn save_lease(&self, lease: Lease) -> AppResult<Lease>;

    async fn list_payments(&self, landlord_id: Option<Uuid>) -> AppResult<Vec<Payment>>;
    async fn save_payment(&self, payment: Payment) -> AppResult<Payment>;

    async fn find_template(&self, id: Uuid) -> AppResult<Option<DocumentTemplate>>;
    async fn list_templates(
        &self,
        landlord_id: Option<Uuid>,
        kind: Option<DocumentType>,
    ) -> AppResult<Vec<DocumentTemplate>>;
    async fn save_template(&self, template: DocumentTemplate) -> AppResult<DocumentTemplate>;
    async fn delete_template(&self, id: Uuid) -> AppResult<()>;

    async fn currency_settings(&self, landlord_id: Uuid) -> AppResult<Option<CurrencySettings>>;
    async fn save_currency_settings(&self, settings: CurrencySettings) -> AppResult<CurrencySettings>;
}
