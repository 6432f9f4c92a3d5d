//! User handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{Password, Role, User};

use super::{ensure, visible};
use crate::extractors::ValidatedJson;
use crate::middleware::CurrentUser;
use crate::pagination::{Paginated, PaginationParams};
use crate::requests::{access, parse_enum, required, LandlordSchema, StoreUserRequest, UpdateUserRequest};
use crate::resources::UserResource;
use crate::state::AppState;

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(store_user))
        .route("/:id", get(show_user).put(update_user))
}

/// Load a user the caller administers. Landlord users are visible within
/// their landlord; platform users only to super admins.
async fn find_visible(state: &AppState, user: &CurrentUser, id: Uuid) -> AppResult<User> {
    let record = state.store.find_user(id).await?;
    match record {
        Some(found) if found.landlord_id.is_none() && !user.is_super_admin() => Err(AppError::NotFound),
        other => visible(user, other, |u| u.landlord_id.unwrap_or_default()),
    }
}

/// List users of the caller's landlord (all users for super admins)
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of users", body = PaginatedUsers),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn list_users(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<UserResource>>> {
    ensure(access::administrator(Some(&current_user)))?;

    let users = state.store.list_users(current_user.landlord_scope()).await?;
    Ok(Json(Paginated::paginate(
        users,
        &params,
        &state.config.pagination,
        |user| UserResource::from(&user),
    )))
}

/// Create a user for a landlord
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = StoreUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResource),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn store_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<StoreUserRequest>,
) -> AppResult<(StatusCode, Json<UserResource>)> {
    let landlord_id = LandlordSchema::target(&current_user, payload.landlord_id)?;
    let role: Role = parse_enum("role", required("role", &payload.role)?)?;
    let password = Password::new(required("password", &payload.password)?)?;

    let mut user = User::new(
        Some(landlord_id),
        required("first_name", &payload.first_name)?.clone(),
        required("last_name", &payload.last_name)?.clone(),
        required("email", &payload.email)?.clone(),
        role,
        password.into(),
    );
    user.mobile = payload.mobile;

    let user = state.store.save_user(user).await?;
    tracing::info!(user_id = %user.id, %landlord_id, role = %user.role, "User created");
    Ok((StatusCode::CREATED, Json(UserResource::from(&user))))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User", body = UserResource),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    )
)]
pub async fn show_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResource>> {
    // Anyone may read their own profile
    if current_user.id != id {
        ensure(access::administrator(Some(&current_user)))?;
    }
    let user = find_visible(&state, &current_user, id).await?;
    Ok(Json(UserResource::from(&user)))
}

/// Update a user
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResource),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserResource>> {
    let mut user = find_visible(&state, &current_user, id).await?;

    if let Some(first_name) = payload.first_name {
        user.first_name = first_name;
    }
    if let Some(last_name) = payload.last_name {
        user.last_name = last_name;
    }
    if let Some(email) = payload.email {
        user.email = email;
    }
    if payload.mobile.is_some() {
        user.mobile = payload.mobile;
    }
    if let Some(role) = payload.role.as_deref() {
        // The platform account keeps its role
        ensure(!user.is_super_admin())?;
        user.role = parse_enum("role", role)?;
    }
    if let Some(is_active) = payload.is_active {
        ensure(user.id != current_user.id)?;
        user.is_active = is_active;
    }
    if let Some(password) = payload.password.as_deref() {
        user.password_hash = Password::new(password)?.into();
    }
    user.touch();

    let user = state.store.save_user(user).await?;
    Ok(Json(UserResource::from(&user)))
}
