//! API configuration.
//!
//! Built once at start-up from the environment and passed explicitly
//! through [`AppState`](crate::state::AppState).

use std::env;
use std::path::PathBuf;

use common::{AppError, AppResult, JwtConfig, LoggingConfig, PaginationConfig};
use domain::MIN_JWT_SECRET_LENGTH;

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8000;

/// Origins allowed when `CORS_ALLOWED_ORIGINS` is empty or unset.
pub const DEV_ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:5173",
    "http://127.0.0.1:5173",
    "*",
];

const DEV_JWT_SECRET: &str = "dev-secret-key-minimum-32-chars!!";

/// Credentials for the super admin created at start-up.
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

/// API configuration.
#[derive(Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// Expose fault details in 500 responses
    pub debug: bool,
    pub jwt: JwtConfig,
    /// Exact-match CORS origins; `*` allows any origin
    pub cors_allowed_origins: Vec<String>,
    pub pagination: PaginationConfig,
    pub logging: LoggingConfig,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("debug", &self.debug)
            .field("jwt", &self.jwt)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("pagination", &self.pagination)
            .field("logging", &self.logging)
            .field(
                "bootstrap_admin",
                &self.bootstrap_admin.as_ref().map(|a| a.email.as_str()),
            )
            .finish()
    }
}

impl ApiConfig {
    /// Load configuration from environment variables (and `.env`).
    ///
    /// # Errors
    /// Fails when `JWT_SECRET` is missing outside debug builds or shorter
    /// than [`MIN_JWT_SECRET_LENGTH`].
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                DEV_JWT_SECRET.to_string()
            }
            Err(_) => {
                return Err(AppError::internal(
                    "JWT_SECRET environment variable must be set in production",
                ))
            }
        };
        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(AppError::internal(format!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            )));
        }

        let defaults = PaginationConfig::default();
        let bootstrap_admin = match (env::var("SUPER_ADMIN_EMAIL"), env::var("SUPER_ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) => Some(BootstrapAdmin { email, password }),
            _ => None,
        };

        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            port: parsed("SERVER_PORT").unwrap_or(DEFAULT_SERVER_PORT),
            debug: env::var("APP_DEBUG")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            jwt: JwtConfig {
                secret: jwt_secret,
                expiration_hours: parsed("JWT_EXPIRATION_HOURS")
                    .unwrap_or(domain::DEFAULT_JWT_EXPIRATION_HOURS),
            },
            cors_allowed_origins: parse_origins(env::var("CORS_ALLOWED_ORIGINS").ok().as_deref()),
            pagination: PaginationConfig {
                default_per_page: parsed("DEFAULT_PAGE_SIZE").unwrap_or(defaults.default_per_page),
                max_per_page: parsed("MAX_PAGE_SIZE").unwrap_or(defaults.max_per_page),
            },
            logging: LoggingConfig {
                verbose: false,
                file: env::var("APP_LOG_FILE").ok().filter(|p| !p.is_empty()).map(PathBuf::from),
            },
            bootstrap_admin,
        })
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
            debug: false,
            jwt: JwtConfig {
                secret: DEV_JWT_SECRET.to_string(),
                ..JwtConfig::default()
            },
            cors_allowed_origins: parse_origins(None),
            pagination: PaginationConfig::default(),
            logging: LoggingConfig::default(),
            bootstrap_admin: None,
        }
    }
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Split a comma-separated origin list; blank input yields the
/// development defaults.
pub fn parse_origins(raw: Option<&str>) -> Vec<String> {
    let origins: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect();

    if origins.is_empty() {
        DEV_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect()
    } else {
        origins
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_trims_and_skips_blanks() {
        let origins = parse_origins(Some(" https://app.rentdesk.app , ,http://localhost:3000"));
        assert_eq!(origins, vec!["https://app.rentdesk.app", "http://localhost:3000"]);
    }

    #[test]
    fn test_parse_origins_falls_back_to_dev_list() {
        assert!(parse_origins(None).contains(&"*".to_string()));
        assert_eq!(parse_origins(Some("  ")).len(), DEV_ALLOWED_ORIGINS.len());
    }

    #[test]
    fn test_debug_output_redacts_secret() {
        let config = ApiConfig::default();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains(DEV_JWT_SECRET));
    }
}
