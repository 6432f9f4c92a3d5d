//! Shared configuration structures.

use std::path::PathBuf;

/// JWT configuration for authentication.
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            expiration_hours: domain::DEFAULT_JWT_EXPIRATION_HOURS,
        }
    }
}

/// Pagination defaults for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    pub default_per_page: u64,
    pub max_per_page: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_per_page: 15,
            max_per_page: 100,
        }
    }
}

/// Log sinks and verbosity.
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    /// Force debug level regardless of `RUST_LOG`
    pub verbose: bool,
    /// Application log file, appended to in addition to stderr
    pub file: Option<PathBuf>,
}
