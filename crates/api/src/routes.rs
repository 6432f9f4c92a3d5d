//! Route configuration.

use axum::{middleware, Router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::cors::OriginPolicy;
use crate::handlers::{
    auth_routes, currency_routes, document_template_routes, health_routes, landlord_routes,
    lease_routes, payment_routes, property_routes, unit_routes, user_routes,
};
use crate::middleware::{fault_boundary, identify, panic_response, require_auth};
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Create the main router with all routes.
///
/// Layers, innermost first: identity, panic capture, fault rendering,
/// CORS, tracing. CORS therefore decorates fault responses too.
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .nest("/landlords", landlord_routes())
        .nest("/users", user_routes())
        .nest("/properties", property_routes())
        .nest("/units", unit_routes())
        .nest("/leases", lease_routes())
        .nest("/payments", payment_routes())
        .nest("/document-templates", document_template_routes())
        .nest("/settings/currency", currency_routes())
        .route_layer(middleware::from_fn(require_auth));

    let origins = OriginPolicy::new(&state.config.cors_allowed_origins, state.config.debug);

    Router::new()
        // Health check (no auth)
        .nest("/health", health_routes())
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Auth routes (login and registration are anonymous)
        .nest("/auth", auth_routes())
        .merge(protected)
        .layer(middleware::from_fn_with_state(state.clone(), identify))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn_with_state(state.clone(), fault_boundary))
        .layer(origins.into_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
