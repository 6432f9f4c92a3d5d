//! Payment handlers.

use axum::{
    extract::{Extension, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use chrono::Utc;
use uuid::Uuid;

use common::{AppResult, OptionExt};
use domain::Payment;

use super::{ensure, own_landlord};
use crate::extractors::ValidatedJson;
use crate::middleware::CurrentUser;
use crate::pagination::{Paginated, PaginationParams};
use crate::requests::{access, parse_date, parse_enum, required, StorePaymentRequest};
use crate::resources::PaymentResource;
use crate::state::AppState;

/// Create payment routes
pub fn payment_routes() -> Router<AppState> {
    Router::new().route("/", get(list_payments).post(store_payment))
}

/// List payments visible to the caller
#[utoipa::path(
    get,
    path = "/payments",
    tag = "Payments",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of payments", body = PaginatedPayments),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_payments(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<PaymentResource>>> {
    ensure(access::active(Some(&current_user)))?;

    let payments = state.store.list_payments(current_user.landlord_scope()).await?;
    Ok(Json(Paginated::paginate(
        payments,
        &params,
        &state.config.pagination,
        |p| PaymentResource::from(&p),
    )))
}

/// Record a payment against a lease
#[utoipa::path(
    post,
    path = "/payments",
    tag = "Payments",
    security(("bearer_auth" = [])),
    request_body = StorePaymentRequest,
    responses(
        (status = 201, description = "Payment recorded", body = PaymentResource),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn store_payment(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<StorePaymentRequest>,
) -> AppResult<(StatusCode, Json<PaymentResource>)> {
    let lease_id = *required("lease_id", &payload.lease_id)?;
    let lease = state.store.find_lease(lease_id).await?.ok_or_not_found()?;

    let currency = match payload.currency.as_deref() {
        Some(value) => parse_enum("currency", value)?,
        None => lease.currency,
    };

    let payment = Payment {
        id: Uuid::new_v4(),
        landlord_id: own_landlord(&current_user)?,
        lease_id,
        amount: *required("amount", &payload.amount)?,
        currency,
        paid_on: parse_date("paid_on", required("paid_on", &payload.paid_on)?)?,
        method: parse_enum("method", required("method", &payload.method)?)?,
        reference: payload.reference,
        notes: payload.notes,
        created_at: Utc::now(),
    };

    let payment = state.store.save_payment(payment).await?;
    tracing::info!(payment_id = %payment.id, %lease_id, amount = payment.amount, "Payment recorded");
    Ok((StatusCode::CREATED, Json(PaymentResource::from(&payment))))
}
