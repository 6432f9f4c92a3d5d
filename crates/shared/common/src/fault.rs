//! Envelope rendered for uncaught failures.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;

/// Generic message shown to clients for any fault.
pub const FAULT_MESSAGE: &str = "Server Error";

/// Error text shown when debug mode is off.
pub const FAULT_ERROR: &str = "An internal error occurred";

/// Details of a fault, carried as a response extension so the boundary
/// middleware can re-render it with diagnostics in debug mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    /// Failure category, e.g. `internal` or `panic`
    pub kind: &'static str,
    pub detail: String,
}

/// `{message, error, exception?, timestamp}` body with HTTP 500.
#[derive(Debug, Clone, Serialize)]
pub struct FaultEnvelope {
    pub message: String,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<String>,
    pub timestamp: String,
}

impl Fault {
    pub fn new(kind: &'static str, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    /// Build the envelope; diagnostics are included only when `debug`.
    pub fn envelope(&self, debug: bool) -> FaultEnvelope {
        FaultEnvelope {
            message: FAULT_MESSAGE.to_string(),
            error: if debug {
                self.detail.clone()
            } else {
                FAULT_ERROR.to_string()
            },
            exception: debug.then(|| self.kind.to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    /// Render as a 500 response, keeping `self` in the extensions.
    pub fn render(self, debug: bool) -> Response {
        let body = self.envelope(debug);
        let mut response = (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
        response.extensions_mut().insert(self);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_hides_detail_outside_debug() {
        let fault = Fault::new("internal", "connection refused");
        let json = serde_json::to_value(fault.envelope(false)).unwrap();

        assert_eq!(json["message"], FAULT_MESSAGE);
        assert_eq!(json["error"], FAULT_ERROR);
        assert!(json.get("exception").is_none());
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_envelope_shows_detail_in_debug() {
        let fault = Fault::new("panic", "index out of bounds");
        let json = serde_json::to_value(fault.envelope(true)).unwrap();

        assert_eq!(json["error"], "index out of bounds");
        assert_eq!(json["exception"], "panic");
    }

    #[test]
    fn test_render_is_500_and_keeps_fault() {
        let response = Fault::new("internal", "boom").render(false);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.extensions().get::<Fault>().unwrap().detail, "boom");
    }
}
