//! Fault boundary.
//!
//! Handler faults arrive as 500 responses carrying a [`Fault`] extension and
//! panics are turned into the same shape by [`panic_response`]. The boundary
//! re-renders them with diagnostics when debug mode is on. It sits inside the
//! CORS layer, so fault responses still carry CORS headers.

use std::any::Any;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use common::Fault;

use crate::state::AppState;

/// Re-render faults with detail when `APP_DEBUG` is on.
pub async fn fault_boundary(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let response = next.run(request).await;

    if !state.config.debug {
        return response;
    }
    match response.extensions().get::<Fault>() {
        Some(fault) => fault.clone().render(true),
        None => response,
    }
}

/// Panic handler for `CatchPanicLayer`.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic message".to_string()
    };

    tracing::error!(kind = "panic", "Uncaught fault: {}", detail);
    Fault::new("panic", detail).render(false)
}
