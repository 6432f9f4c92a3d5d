//! Application state for dependency injection.

use std::sync::Arc;

use crate::auth::TokenService;
use crate::config::ApiConfig;
use crate::store::Store;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: Arc<TokenService>,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    /// Create new app state.
    pub fn new(store: Arc<dyn Store>, config: ApiConfig) -> Self {
        Self {
            store,
            tokens: Arc::new(TokenService::new(config.jwt.clone())),
            config: Arc::new(config),
        }
    }
}
