//! HTTP middleware.

mod auth;
mod fault;

pub use auth::{account_active, identify, require_auth, CurrentUser};
pub use fault::{fault_boundary, panic_response};
