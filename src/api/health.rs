use crate::api::MgmtState;
use crate::api::schemas::health::HealthResponse;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

/// Liveness probe: returns 200 OK as long as the server is running.
pub async fn livez() -> impl IntoResponse {
    StatusCode::OK
}

/// Readiness probe. Push is optional, so a missing VAPID setup is reported but does not
/// make the server unready.
pub async fn readyz(State(state): State<MgmtState>) -> impl IntoResponse {
    let push_status = match state.notification_service.check_configured() {
        Ok(()) => "ok",
        Err(e) => {
            tracing::debug!(error = %e, component = "push", "Push notifications disabled");
            "disabled"
        }
    };

    let response = HealthResponse { status: "ok".to_string(), push: push_status.to_string() };

    (StatusCode::OK, Json(response))
}
