//! Landlord handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Router,
};
use chrono::Utc;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{BillingCycle, Landlord, Password, Role, SubscriptionStatus, User};

use super::{ensure, visible};
use crate::extractors::ValidatedJson;
use crate::middleware::CurrentUser;
use crate::pagination::{Paginated, PaginationParams};
use crate::requests::{
    access, parse_enum, required, OwnerInput, StoreLandlordRequest, UpdateLandlordRequest,
    UpdateSubscriptionRequest, EMAIL_TAKEN,
};
use crate::resources::{LandlordResource, UsageResource};
use crate::state::AppState;
use crate::store::{Store, Table};

/// Create landlord routes
pub fn landlord_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_landlords).post(store_landlord))
        .route("/:id", get(show_landlord).put(update_landlord))
        .route("/:id/subscription", put(update_subscription))
}

/// Persist a landlord and its owner account.
pub(crate) async fn create_with_owner(
    store: &dyn Store,
    landlord: Landlord,
    owner: &OwnerInput,
) -> AppResult<(Landlord, User)> {
    let password = Password::new(required("owner.password", &owner.password)?)?;

    let mut user = User::new(
        Some(landlord.id),
        required("owner.first_name", &owner.first_name)?.clone(),
        required("owner.last_name", &owner.last_name)?.clone(),
        required("owner.email", &owner.email)?.clone(),
        Role::Owner,
        password.into(),
    );
    user.mobile = owner.mobile.clone();

    store
        .save_landlord_with_owner(landlord, user)
        .await
        .map_err(|e| match e {
            AppError::Validation(errors) if errors.has("email") => {
                AppError::invalid("owner.email", EMAIL_TAKEN)
            }
            other => other,
        })
}

/// Property, unit and user counts, queried concurrently.
async fn usage(store: &dyn Store, landlord_id: Uuid) -> AppResult<UsageResource> {
    let (properties, units, users) = tokio::try_join!(
        store.count(Table::Properties, landlord_id),
        store.count(Table::Units, landlord_id),
        store.count(Table::Users, landlord_id),
    )?;
    Ok(UsageResource {
        properties,
        units,
        users,
    })
}

/// Full resource with owner and usage.
async fn detailed(store: &dyn Store, landlord: &Landlord) -> AppResult<LandlordResource> {
    let (owner, usage) = tokio::try_join!(store.find_owner(landlord.id), usage(store, landlord.id))?;
    Ok(LandlordResource::new(landlord, owner.as_ref(), Some(usage), Utc::now()))
}

/// List landlords (super admin only)
#[utoipa::path(
    get,
    path = "/landlords",
    tag = "Landlords",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of landlords", body = PaginatedLandlords),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Super admin only")
    )
)]
pub async fn list_landlords(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<LandlordResource>>> {
    ensure(access::super_admin(Some(&current_user)))?;

    let now = Utc::now();
    let landlords = state.store.list_landlords().await?;
    Ok(Json(Paginated::paginate(
        landlords,
        &params,
        &state.config.pagination,
        |landlord| LandlordResource::new(&landlord, None, None, now),
    )))
}

/// Create a landlord with its owner (super admin only)
#[utoipa::path(
    post,
    path = "/landlords",
    tag = "Landlords",
    security(("bearer_auth" = [])),
    request_body = StoreLandlordRequest,
    responses(
        (status = 201, description = "Landlord created", body = LandlordResource),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Super admin only"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn store_landlord(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<StoreLandlordRequest>,
) -> AppResult<(StatusCode, Json<LandlordResource>)> {
    let now = Utc::now();
    let tier = parse_enum("subscription_tier", required("subscription_tier", &payload.subscription_tier)?)?;
    let status = match payload.subscription_status.as_deref() {
        Some(value) => parse_enum("subscription_status", value)?,
        None => SubscriptionStatus::Trial,
    };
    let cycle = match payload.billing_cycle.as_deref() {
        Some(value) => parse_enum("billing_cycle", value)?,
        None => BillingCycle::Monthly,
    };

    let mut landlord = Landlord::on_trial(
        required("company_name", &payload.company_name)?.clone(),
        required("email", &payload.email)?.clone(),
        tier,
        now,
    );
    // Anything past trial starts a paid period of one billing cycle.
    if status != SubscriptionStatus::Trial {
        landlord.change_subscription(tier, cycle, None, None, now);
    }
    landlord.billing_cycle = cycle;
    landlord.subscription_status = status;
    landlord.phone = payload.phone;
    landlord.address = payload.address;
    if let Some(auto_renew) = payload.auto_renew {
        landlord.auto_renew = auto_renew;
    }

    let owner = required("owner", &payload.owner)?;
    let (landlord, _) = create_with_owner(state.store.as_ref(), landlord, owner).await?;
    tracing::info!(landlord_id = %landlord.id, "Landlord created");

    let resource = detailed(state.store.as_ref(), &landlord).await?;
    Ok((StatusCode::CREATED, Json(resource)))
}

/// Landlord with owner and usage
#[utoipa::path(
    get,
    path = "/landlords/{id}",
    tag = "Landlords",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Landlord ID")
    ),
    responses(
        (status = 200, description = "Landlord", body = LandlordResource),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Landlord not found")
    )
)]
pub async fn show_landlord(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<LandlordResource>> {
    ensure(access::active(Some(&current_user)))?;

    let landlord = visible(&current_user, state.store.find_landlord(id).await?, |l| l.id)?;
    Ok(Json(detailed(state.store.as_ref(), &landlord).await?))
}

/// Update landlord profile (super admin or the landlord's owner)
#[utoipa::path(
    put,
    path = "/landlords/{id}",
    tag = "Landlords",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Landlord ID")
    ),
    request_body = UpdateLandlordRequest,
    responses(
        (status = 200, description = "Landlord updated", body = LandlordResource),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Landlord not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_landlord(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateLandlordRequest>,
) -> AppResult<Json<LandlordResource>> {
    let mut landlord = visible(&current_user, state.store.find_landlord(id).await?, |l| l.id)?;

    if let Some(company_name) = payload.company_name {
        landlord.company_name = company_name;
    }
    if let Some(email) = payload.email {
        landlord.email = email;
    }
    if payload.phone.is_some() {
        landlord.phone = payload.phone;
    }
    if payload.address.is_some() {
        landlord.address = payload.address;
    }
    if let Some(auto_renew) = payload.auto_renew {
        landlord.auto_renew = auto_renew;
    }
    // Owners cannot suspend or reactivate their own account.
    if let Some(is_active) = payload.is_active {
        ensure(current_user.is_super_admin())?;
        landlord.is_active = is_active;
    }
    landlord.updated_at = Utc::now();

    let landlord = state.store.save_landlord(landlord).await?;
    Ok(Json(detailed(state.store.as_ref(), &landlord).await?))
}

/// Change a landlord's plan (super admin only)
#[utoipa::path(
    put,
    path = "/landlords/{id}/subscription",
    tag = "Landlords",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Landlord ID")
    ),
    request_body = UpdateSubscriptionRequest,
    responses(
        (status = 200, description = "Subscription updated", body = LandlordResource),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Super admin only"),
        (status = 404, description = "Landlord not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_subscription(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateSubscriptionRequest>,
) -> AppResult<Json<LandlordResource>> {
    let mut landlord = state.store.find_landlord(id).await?.ok_or_not_found()?;
    let now = Utc::now();

    let tier = parse_enum("subscription_tier", required("subscription_tier", &payload.subscription_tier)?)?;
    let cycle = match payload.billing_cycle.as_deref() {
        Some(value) => parse_enum("billing_cycle", value)?,
        None => landlord.billing_cycle,
    };
    landlord.change_subscription(
        tier,
        cycle,
        payload.subscription_started_at,
        payload.subscription_expires_at,
        now,
    );
    landlord.subscription_status = match payload.subscription_status.as_deref() {
        Some(value) => parse_enum("subscription_status", value)?,
        None => SubscriptionStatus::Active,
    };
    if let Some(auto_renew) = payload.auto_renew {
        landlord.auto_renew = auto_renew;
    }

    let landlord = state.store.save_landlord(landlord).await?;
    tracing::info!(
        landlord_id = %landlord.id,
        tier = %landlord.subscription_tier,
        "Subscription changed"
    );
    Ok(Json(detailed(state.store.as_ref(), &landlord).await?))
}
