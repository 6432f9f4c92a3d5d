//! HTTP request handlers.

pub mod auth_handler;
pub mod currency_handler;
pub mod document_template_handler;
pub mod health_handler;
pub mod landlord_handler;
pub mod lease_handler;
pub mod payment_handler;
pub mod property_handler;
pub mod unit_handler;
pub mod user_handler;

pub use auth_handler::auth_routes;
pub use currency_handler::currency_routes;
pub use document_template_handler::document_template_routes;
pub use health_handler::health_routes;
pub use landlord_handler::landlord_routes;
pub use lease_handler::lease_routes;
pub use payment_handler::payment_routes;
pub use property_handler::property_routes;
pub use unit_handler::unit_routes;
pub use user_handler::user_routes;

use uuid::Uuid;

use common::{AppError, AppResult};

use crate::middleware::CurrentUser;

/// Turn a failed role predicate into 403.
pub(crate) fn ensure(allowed: bool) -> AppResult<()> {
    if allowed {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// A record the caller may see, or 404 when it is missing or belongs to
/// another landlord.
pub(crate) fn visible<T>(
    user: &CurrentUser,
    record: Option<T>,
    landlord_of: impl Fn(&T) -> Uuid,
) -> AppResult<T> {
    record
        .filter(|r| user.can_see(landlord_of(r)))
        .ok_or(AppError::NotFound)
}

/// The caller's own landlord; super admins have none.
pub(crate) fn own_landlord(user: &CurrentUser) -> AppResult<Uuid> {
    user.landlord_id.ok_or(AppError::Forbidden)
}
