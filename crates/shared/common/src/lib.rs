//! Common utilities shared across the workspace.
//!
//! This crate provides:
//! - Unified error handling with HTTP rendering
//! - Per-field validation error maps
//! - The fault envelope returned for uncaught failures
//! - Shared configuration structures and logging bootstrap

pub mod config;
pub mod error;
pub mod fault;
pub mod field_errors;
pub mod logging;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
pub use fault::{Fault, FaultEnvelope};
pub use field_errors::FieldErrors;
