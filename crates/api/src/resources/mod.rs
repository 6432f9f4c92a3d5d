//! Resource transformers.
//!
//! Pure constructors from a record, its already-loaded relations and `now`
//! to the public JSON shape. Missing relations serialize as `null` and
//! collections as `[]`; dates use `YYYY-MM-DD`, timestamps RFC 3339.

mod currency;
mod document_template;
mod landlord;
mod lease;
mod property;
mod user;

pub use currency::CurrencySettingsResource;
pub use document_template::{DocumentTemplateResource, RenderedDocumentResource};
pub use landlord::{LandlordResource, LimitResource, SubscriptionResource, UsageResource};
pub use lease::{LeaseResource, PaymentResource, UnitSummary};
pub use property::{PropertyResource, PropertySummary, UnitResource};
pub use user::UserResource;
