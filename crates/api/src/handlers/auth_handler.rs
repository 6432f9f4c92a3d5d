//! Authentication handlers.

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use common::{AppError, AppResult, OptionExt};
use domain::{Password, SubscriptionTier};

use super::landlord_handler::create_with_owner;
use crate::auth::TokenResponse;
use crate::extractors::ValidatedJson;
use crate::middleware::{account_active, require_auth, CurrentUser};
use crate::requests::{required, LoginRequest, RegisterLandlordRequest};
use crate::resources::{LandlordResource, UserResource};
use crate::state::AppState;

/// Hash verified when the email is unknown, so both paths cost the same.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$ZHVtbXlzYWx0MTIzNDU2$3n2z0m0y1bQ2m4uY3m8Jp8gYtV2f8q0pJQ8w6Kf1cYs";

/// Result of a self-service sign-up
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisteredResponse {
    pub landlord: LandlordResource,
    pub token: TokenResponse,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me).route_layer(middleware::from_fn(require_auth)))
}

/// Register a landlord on trial together with its owner
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Authentication",
    request_body = RegisterLandlordRequest,
    responses(
        (status = 201, description = "Landlord registered", body = RegisteredResponse),
        (status = 422, description = "Validation error")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterLandlordRequest>,
) -> AppResult<(StatusCode, Json<RegisteredResponse>)> {
    let now = Utc::now();
    let tier = match payload.subscription_tier.as_deref() {
        Some(value) => crate::requests::parse_enum("subscription_tier", value)?,
        None => SubscriptionTier::Basic,
    };

    let mut landlord = domain::Landlord::on_trial(
        required("company_name", &payload.company_name)?.clone(),
        required("email", &payload.email)?.clone(),
        tier,
        now,
    );
    landlord.phone = payload.phone;

    let owner = required("owner", &payload.owner)?;
    let (landlord, owner) = create_with_owner(state.store.as_ref(), landlord, owner).await?;
    let token = state.tokens.issue(&owner)?;

    tracing::info!(landlord_id = %landlord.id, "Landlord registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisteredResponse {
            landlord: LandlordResource::new(&landlord, Some(&owner), None, now),
            token,
        }),
    ))
}

/// Login and get JWT token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account disabled"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let email = required("email", &payload.email)?;
    let password = required("password", &payload.password)?;

    let user = state.store.find_user_by_email(email).await?;
    let hash = user
        .as_ref()
        .map_or(DUMMY_HASH.to_string(), |u| u.password_hash.clone());
    let verified = Password::from_hash(hash).verify(password);

    let user = match user {
        Some(user) if verified => user,
        _ => return Err(AppError::InvalidCredentials),
    };
    if !account_active(state.store.as_ref(), &user).await? {
        return Err(AppError::Forbidden);
    }

    Ok(Json(state.tokens.issue(&user)?))
}

/// Profile of the authenticated caller
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResource),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn me(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<UserResource>> {
    let user = state.store.find_user(current_user.id).await?.ok_or_not_found()?;
    Ok(Json(UserResource::from(&user)))
}
