//! Lease handlers.

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
use domain::{Currency, Lease, LeaseStatus};

use super::{ensure, own_landlord, visible};
use crate::extractors::ValidatedJson;
use crate::middleware::CurrentUser;
use crate::pagination::{Paginated, PaginationParams};
use crate::requests::{access, parse_date, parse_enum, required, StoreLeaseRequest};
use crate::resources::LeaseResource;
use crate::state::AppState;

/// Create lease routes
pub fn lease_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_leases).post(store_lease))
        .route("/:id", get(show_lease))
}

/// List leases visible to the caller
#[utoipa::path(
    get,
    path = "/leases",
    tag = "Leases",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of leases", body = PaginatedLeases),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_leases(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<LeaseResource>>> {
    ensure(access::active(Some(&current_user)))?;

    let scope = current_user.landlord_scope();
    let (leases, units) = tokio::try_join!(state.store.list_leases(scope), state.store.list_units(scope))?;
    let units: HashMap<_, _> = units.into_iter().map(|u| (u.id, u)).collect();

    let now = Utc::now();
    Ok(Json(Paginated::paginate(
        leases,
        &params,
        &state.config.pagination,
        |lease| LeaseResource::new(&lease, units.get(&lease.unit_id), now),
    )))
}

/// Create a lease on one of the caller's units
#[utoipa::path(
    post,
    path = "/leases",
    tag = "Leases",
    security(("bearer_auth" = [])),
    request_body = StoreLeaseRequest,
    responses(
        (status = 201, description = "Lease created", body = LeaseResource),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn store_lease(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<StoreLeaseRequest>,
) -> AppResult<(StatusCode, Json<LeaseResource>)> {
    let now = Utc::now();
    let landlord_id = own_landlord(&current_user)?;
    let unit_id = *required("unit_id", &payload.unit_id)?;

    // Rent defaults to the landlord's primary currency
    let currency = match payload.currency.as_deref() {
        Some(value) => parse_enum("currency", value)?,
        None => state
            .store
            .currency_settings(landlord_id)
            .await?
            .map_or(Currency::Usd, |s| s.primary_currency),
    };
    let status = match payload.status.as_deref() {
        Some(value) => parse_enum("status", value)?,
        None => LeaseStatus::Pending,
    };

    let lease = Lease {
        id: Uuid::new_v4(),
        landlord_id,
        unit_id,
        tenant_name: required("tenant_name", &payload.tenant_name)?.clone(),
        tenant_email: payload.tenant_email,
        tenant_phone: payload.tenant_phone,
        start_date: parse_date("start_date", required("start_date", &payload.start_date)?)?,
        end_date: parse_date("end_date", required("end_date", &payload.end_date)?)?,
        monthly_rent: *required("monthly_rent", &payload.monthly_rent)?,
        deposit: payload.deposit,
        currency,
        payment_day: payload.payment_day.unwrap_or(1),
        status,
        created_at: now,
        updated_at: now,
    };

    let lease = state.store.save_lease(lease).await?;
    let unit = state.store.find_unit(unit_id).await?;
    tracing::info!(lease_id = %lease.id, %unit_id, "Lease created");
    Ok((StatusCode::CREATED, Json(LeaseResource::new(&lease, unit.as_ref(), now))))
}

/// Get lease by ID
#[utoipa::path(
    get,
    path = "/leases/{id}",
    tag = "Leases",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Lease ID")
    ),
    responses(
        (status = 200, description = "Lease", body = LeaseResource),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Lease not found")
    )
)]
pub async fn show_lease(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<LeaseResource>> {
    ensure(access::active(Some(&current_user)))?;

    let lease = visible(&current_user, state.store.find_lease(id).await?, |l| l.landlord_id)?;
    let unit = state.store.find_unit(lease.unit_id).await?;
    Ok(Json(LeaseResource::new(&lease, unit.as_ref(), Utc::now())))
}
