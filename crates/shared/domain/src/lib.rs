//! Domain layer - Core rental-management entities and value objects.
//!
//! Pure data and business rules with no HTTP or storage concerns.
//! Shared by the API crate for validation, persistence and response shaping.

#[macro_use]
mod macros;

pub mod constants;
pub mod currency;
pub mod document;
pub mod error;
pub mod landlord;
pub mod lease;
pub mod password;
pub mod property;
pub mod user;

pub use constants::*;
pub use currency::{Currency, CurrencySettings};
pub use document::{DocumentTemplate, DocumentType};
pub use error::{DomainError, DomainResult};
pub use landlord::{BillingCycle, Landlord, SubscriptionLimit, SubscriptionStatus, SubscriptionTier};
pub use lease::{Lease, LeaseStatus, Payment, PaymentMethod};
pub use password::Password;
pub use property::{Property, Unit, UnitStatus};
pub use user::{Role, User};
