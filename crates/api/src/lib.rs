//! Rentdesk API library
//!
//! HTTP surface of the rental-management backend: identity, request
//! validation, tenant scoping, resource shaping and the CORS/fault
//! boundary around them.

pub mod auth;
pub mod cli;
pub mod commands;
pub mod config;
pub mod cors;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod pagination;
pub mod requests;
pub mod resources;
pub mod routes;
pub mod state;
pub mod store;

pub use config::ApiConfig;
pub use routes::create_router;
pub use state::AppState;
