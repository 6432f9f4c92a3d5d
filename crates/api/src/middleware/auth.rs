//! Identity middleware.
//!
//! [`identify`] runs for every request and attaches a [`CurrentUser`] when
//! a valid bearer token names an existing user. Anonymous requests pass
//! through untouched; [`require_auth`] guards the route groups that need an
//! identity.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use common::AppError;
use domain::{Role, User, BEARER_TOKEN_PREFIX};

use crate::state::AppState;
use crate::store::Store;

/// Authenticated caller, reloaded from the store on every request.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub landlord_id: Option<Uuid>,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
}

impl CurrentUser {
    pub fn is_super_admin(&self) -> bool {
        self.role.is_super_admin()
    }

    /// Landlord whose records this caller may see; `None` means all.
    pub fn landlord_scope(&self) -> Option<Uuid> {
        if self.is_super_admin() {
            None
        } else {
            self.landlord_id
        }
    }

    /// Whether a record owned by `landlord_id` is visible to this caller.
    pub fn can_see(&self, landlord_id: Uuid) -> bool {
        self.landlord_scope().map_or(true, |own| own == landlord_id)
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            landlord_id: user.landlord_id,
            email: user.email.clone(),
            role: user.role,
            is_active: user.is_active,
        }
    }
}

/// Resolve the bearer token, if any, into a [`CurrentUser`] extension.
///
/// Invalid or expired tokens and deleted users leave the request anonymous.
pub async fn identify(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .map(str::to_owned);

    if let Some(token) = token {
        match resolve(&state, &token).await {
            Ok(Some(user)) => {
                let mut current = CurrentUser::from(&user);
                match account_active(state.store.as_ref(), &user).await {
                    Ok(active) => current.is_active = active,
                    Err(e) => return e.into_response(),
                }
                request.extensions_mut().insert(current);
            }
            Ok(None) => tracing::debug!("Bearer token rejected, continuing anonymously"),
            Err(e) => return e.into_response(),
        }
    }

    next.run(request).await
}

async fn resolve(state: &AppState, token: &str) -> Result<Option<User>, AppError> {
    let claims = match state.tokens.verify(token) {
        Ok(claims) => claims,
        Err(_) => return Ok(None),
    };
    state.store.find_user(claims.sub).await
}

/// Whether `user` may act: the account is active and, for landlord users,
/// so is the landlord.
pub async fn account_active(store: &dyn Store, user: &User) -> Result<bool, AppError> {
    if !user.is_active {
        return Ok(false);
    }
    match user.landlord_id {
        Some(landlord_id) => Ok(store
            .find_landlord(landlord_id)
            .await?
            .map_or(false, |landlord| landlord.is_active)),
        None => Ok(true),
    }
}

/// Reject anonymous requests with 401.
pub async fn require_auth(request: Request, next: Next) -> Result<Response, AppError> {
    if request.extensions().get::<CurrentUser>().is_none() {
        return Err(AppError::Unauthorized);
    }
    Ok(next.run(request).await)
}
