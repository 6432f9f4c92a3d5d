//! Property handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use chrono::Utc;
use uuid::Uuid;

use common::AppResult;
use domain::Property;

use super::{ensure, own_landlord, visible};
use crate::extractors::ValidatedJson;
use crate::middleware::CurrentUser;
use crate::pagination::{Paginated, PaginationParams};
use crate::requests::{access, required, StorePropertyRequest};
use crate::resources::PropertyResource;
use crate::state::AppState;

/// Create property routes
pub fn property_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_properties).post(store_property))
        .route("/:id", get(show_property))
}

/// List properties visible to the caller
#[utoipa::path(
    get,
    path = "/properties",
    tag = "Properties",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of properties", body = PaginatedProperties),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_properties(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<PropertyResource>>> {
    ensure(access::active(Some(&current_user)))?;

    let properties = state.store.list_properties(current_user.landlord_scope()).await?;
    Ok(Json(Paginated::paginate(
        properties,
        &params,
        &state.config.pagination,
        |p| PropertyResource::from(&p),
    )))
}

/// Create a property
#[utoipa::path(
    post,
    path = "/properties",
    tag = "Properties",
    security(("bearer_auth" = [])),
    request_body = StorePropertyRequest,
    responses(
        (status = 201, description = "Property created", body = PropertyResource),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 422, description = "Validation error or plan limit reached")
    )
)]
pub async fn store_property(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<StorePropertyRequest>,
) -> AppResult<(StatusCode, Json<PropertyResource>)> {
    let now = Utc::now();
    let property = Property {
        id: Uuid::new_v4(),
        landlord_id: own_landlord(&current_user)?,
        name: required("name", &payload.name)?.clone(),
        address: required("address", &payload.address)?.clone(),
        city: payload.city,
        created_at: now,
        updated_at: now,
    };

    let property = state.store.save_property(property).await?;
    Ok((StatusCode::CREATED, Json(PropertyResource::from(&property))))
}

/// Get property by ID
#[utoipa::path(
    get,
    path = "/properties/{id}",
    tag = "Properties",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Property ID")
    ),
    responses(
        (status = 200, description = "Property", body = PropertyResource),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Property not found")
    )
)]
pub async fn show_property(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PropertyResource>> {
    ensure(access::active(Some(&current_user)))?;

    let property = visible(&current_user, state.store.find_property(id).await?, |p| p.landlord_id)?;
    Ok(Json(PropertyResource::from(&property)))
}
