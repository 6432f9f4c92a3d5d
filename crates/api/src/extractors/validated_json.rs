//! Validated JSON extractor.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, RawPathParams, Request},
    Json,
};
use uuid::Uuid;

use common::AppError;

use crate::middleware::CurrentUser;
use crate::requests::{validate_request, FormRequest, RuleContext};
use crate::state::AppState;

/// JSON body that has passed its [`FormRequest`] checks.
///
/// Authorization runs before the body is read, so a forbidden caller gets
/// 403 regardless of what they sent. Malformed JSON and type mismatches are
/// reported as a validation failure on `body`.
///
/// # Example
/// ```ignore
/// pub async fn store(
///     Extension(user): Extension<CurrentUser>,
///     State(state): State<AppState>,
///     ValidatedJson(payload): ValidatedJson<StorePropertyRequest>,
/// ) -> AppResult<Json<PropertyResource>> { ... }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T: FormRequest> FromRequest<AppState> for ValidatedJson<T> {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = req.into_parts();
        let identity = parts.extensions.get::<CurrentUser>().cloned();

        if !T::authorize(identity.as_ref()) {
            return Err(AppError::Forbidden);
        }

        let subject = RawPathParams::from_request_parts(&mut parts, state)
            .await
            .ok()
            .and_then(|params| {
                params
                    .iter()
                    .find(|(name, _)| *name == "id")
                    .and_then(|(_, value)| Uuid::parse_str(value).ok())
            });

        let req = Request::from_parts(parts, body);
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::invalid("body", e.body_text()))?;

        let ctx = RuleContext {
            identity: identity.as_ref(),
            store: state.store.as_ref(),
            subject,
        };
        validate_request(&value, &ctx).await?;

        Ok(ValidatedJson(value))
    }
}
