//! Currency settings handlers.

use axum::{
    extract::{Extension, State},
    response::Json,
    routing::get,
    Router,
};
use chrono::Utc;

use common::AppResult;
use domain::CurrencySettings;

use super::{ensure, own_landlord};
use crate::extractors::ValidatedJson;
use crate::middleware::CurrentUser;
use crate::requests::{access, parse_enum, required, UpdateCurrencySettingsRequest};
use crate::resources::CurrencySettingsResource;
use crate::state::AppState;

/// Create currency settings routes
pub fn currency_routes() -> Router<AppState> {
    Router::new().route("/", get(show_settings).put(update_settings))
}

/// Currency settings of the caller's landlord
#[utoipa::path(
    get,
    path = "/settings/currency",
    tag = "Settings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Currency settings", body = CurrencySettingsResource),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn show_settings(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<CurrencySettingsResource>> {
    ensure(access::active(Some(&current_user)))?;
    let landlord_id = own_landlord(&current_user)?;

    let settings = state
        .store
        .currency_settings(landlord_id)
        .await?
        .unwrap_or_else(|| CurrencySettings::default_for(landlord_id));
    Ok(Json(CurrencySettingsResource::from(&settings)))
}

/// Replace the currency settings of the caller's landlord
#[utoipa::path(
    put,
    path = "/settings/currency",
    tag = "Settings",
    security(("bearer_auth" = [])),
    request_body = UpdateCurrencySettingsRequest,
    responses(
        (status = 200, description = "Currency settings updated", body = CurrencySettingsResource),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_settings(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UpdateCurrencySettingsRequest>,
) -> AppResult<Json<CurrencySettingsResource>> {
    let secondary_currency = match payload.secondary_currency.as_deref() {
        Some(value) => Some(parse_enum("secondary_currency", value)?),
        None => None,
    };

    let settings = CurrencySettings {
        landlord_id: own_landlord(&current_user)?,
        primary_currency: parse_enum("primary_currency", required("primary_currency", &payload.primary_currency)?)?,
        secondary_currency,
        exchange_rate: payload.exchange_rate.filter(|_| secondary_currency.is_some()).unwrap_or(1.0),
        updated_at: Utc::now(),
    };

    let settings = state.store.save_currency_settings(settings).await?;
    Ok(Json(CurrencySettingsResource::from(&settings)))
}
