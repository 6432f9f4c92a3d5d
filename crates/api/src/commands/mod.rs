//! CLI command implementations.

pub mod openapi;
pub mod origins;
pub mod serve;
