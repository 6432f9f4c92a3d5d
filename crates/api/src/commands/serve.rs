//! Serve command - Starts the HTTP server.

use std::sync::Arc;

use common::{AppError, AppResult};
use domain::{Password, Role, User};

use crate::cli::ServeArgs;
use crate::config::{ApiConfig, BootstrapAdmin};
use crate::routes::create_router;
use crate::state::AppState;
use crate::store::{MemoryStore, Store};

/// Execute the serve command
pub async fn execute(args: ServeArgs, mut config: ApiConfig) -> AppResult<()> {
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if config.debug {
        tracing::warn!("APP_DEBUG is on: fault responses include exception details");
    }

    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    if let Some(admin) = &config.bootstrap_admin {
        bootstrap_super_admin(store.as_ref(), admin).await?;
    }

    let addr = config.server_addr();
    let app = create_router(AppState::new(store, config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}

/// Create the configured super admin unless that email already exists.
pub async fn bootstrap_super_admin(store: &dyn Store, admin: &BootstrapAdmin) -> AppResult<()> {
    if store.find_user_by_email(&admin.email).await?.is_some() {
        tracing::debug!(email = %admin.email, "Super admin already present");
        return Ok(());
    }

    let password = Password::new(&admin.password)?;
    let user = User::new(
        None,
        "Super".to_string(),
        "Admin".to_string(),
        admin.email.clone(),
        Role::SuperAdmin,
        password.into(),
    );
    store.save_user(user).await?;
    tracing::info!(email = %admin.email, "Super admin created");
    Ok(())
}
