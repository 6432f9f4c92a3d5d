//! Unit handlers.

use std::collections::HashMap;

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
use domain::{Unit, UnitStatus};

use super::{ensure, own_landlord, visible};
use crate::extractors::ValidatedJson;
use crate::middleware::CurrentUser;
use crate::pagination::{Paginated, PaginationParams};
use crate::requests::{access, parse_enum, required, StoreUnitRequest};
use crate::resources::UnitResource;
use crate::state::AppState;

/// Create unit routes
pub fn unit_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_units).post(store_unit))
        .route("/:id", get(show_unit))
}

/// List units visible to the caller
#[utoipa::path(
    get,
    path = "/units",
    tag = "Units",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of units", body = PaginatedUnits),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_units(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<UnitResource>>> {
    ensure(access::active(Some(&current_user)))?;

    let scope = current_user.landlord_scope();
    let (units, properties) = tokio::try_join!(
        state.store.list_units(scope),
        state.store.list_properties(scope),
    )?;
    let properties: HashMap<_, _> = properties.into_iter().map(|p| (p.id, p)).collect();

    Ok(Json(Paginated::paginate(
        units,
        &params,
        &state.config.pagination,
        |unit| UnitResource::new(&unit, properties.get(&unit.property_id)),
    )))
}

/// Create a unit inside one of the caller's properties
#[utoipa::path(
    post,
    path = "/units",
    tag = "Units",
    security(("bearer_auth" = [])),
    request_body = StoreUnitRequest,
    responses(
        (status = 201, description = "Unit created", body = UnitResource),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 422, description = "Validation error or plan limit reached")
    )
)]
pub async fn store_unit(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<StoreUnitRequest>,
) -> AppResult<(StatusCode, Json<UnitResource>)> {
    let now = Utc::now();
    let property_id = *required("property_id", &payload.property_id)?;
    let status = match payload.status.as_deref() {
        Some(value) => parse_enum("status", value)?,
        None => UnitStatus::Vacant,
    };

    let unit = Unit {
        id: Uuid::new_v4(),
        landlord_id: own_landlord(&current_user)?,
        property_id,
        unit_number: required("unit_number", &payload.unit_number)?.clone(),
        floor: payload.floor,
        bedrooms: payload.bedrooms,
        bathrooms: payload.bathrooms,
        area_sqm: payload.area_sqm,
        monthly_rent: *required("monthly_rent", &payload.monthly_rent)?,
        status,
        created_at: now,
        updated_at: now,
    };

    let unit = state.store.save_unit(unit).await?;
    let property = state.store.find_property(property_id).await?;
    Ok((StatusCode::CREATED, Json(UnitResource::new(&unit, property.as_ref()))))
}

/// Get unit by ID
#[utoipa::path(
    get,
    path = "/units/{id}",
    tag = "Units",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Unit ID")
    ),
    responses(
        (status = 200, description = "Unit", body = UnitResource),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Unit not found")
    )
)]
pub async fn show_unit(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UnitResource>> {
    ensure(access::active(Some(&current_user)))?;

    let unit = visible(&current_user, state.store.find_unit(id).await?, |u| u.landlord_id)?;
    let property = state.store.find_property(unit.property_id).await?;
    Ok(Json(UnitResource::new(&unit, property.as_ref())))
}
