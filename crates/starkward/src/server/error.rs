//! Client-visible error mapping.
//!
//! Every verification failure is a client-addressable condition (bad
//! policy, missing policy, rejected simulation, violated rule), so the
//! whole [`VerifyError`] taxonomy maps to `400` with a JSON body.
//! Violations additionally carry the count and the violating events so
//! wallets can show the user what was blocked.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

use starkward_core::error::VerifyError;

/// Wrapper turning a [`VerifyError`] into an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub VerifyError);

impl From<VerifyError> for ApiError {
    fn from(err: VerifyError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match &self.0 {
            VerifyError::PolicyViolation { count, violations } => json!({
                "message": self.0.to_string(),
                "count": count,
                "violations": violations,
            }),
            other => {
                tracing::debug!(error = %other, "request failed");
                json!({ "message": other.to_string() })
            }
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use starkward_core::types::Violation;

    #[test]
    fn violation_body_carries_count_and_events() {
        let err = ApiError(VerifyError::policy_violation(vec![
            Violation::UnlistedContract {
                address: "0xdead".to_string(),
            },
        ]));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn operational_errors_map_to_bad_request() {
        let err = ApiError(VerifyError::policy_not_found("0xabc"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
