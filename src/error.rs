use crate::domain::vapid::VapidError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

pub const INVALID_SUBSCRIPTION_MESSAGE: &str = "Invalid push subscription payload.";
pub const NO_SUBSCRIPTION_MESSAGE: &str = "No push subscription found. Subscribe first.";
pub const DELIVERY_FAILED_MESSAGE: &str =
    "Failed to send notification. Verify your VAPID keys and browser permissions.";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid push subscription payload.")]
    InvalidSubscription,
    #[error("No push subscription found. Subscribe first.")]
    NoSubscription,
    #[error(transparent)]
    Setup(#[from] VapidError),
    /// Delivery failed for a reason that may clear up on its own.
    #[error("Push delivery failed: {0}")]
    Delivery(String),
    /// The push service no longer knows the subscription; it has been forgotten.
    #[error("Push subscription expired (HTTP {0})")]
    SubscriptionGone(u16),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Internal server error")]
    Internal,
}

pub type Result<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::InvalidSubscription => {
                tracing::debug!("Rejected invalid push subscription payload");
                (StatusCode::BAD_REQUEST, INVALID_SUBSCRIPTION_MESSAGE.to_string())
            }
            Self::NoSubscription => {
                tracing::debug!("No stored push subscription");
                (StatusCode::NOT_FOUND, NO_SUBSCRIPTION_MESSAGE.to_string())
            }
            Self::Setup(e) => {
                tracing::warn!(error = %e, "Push is not configured");
                (StatusCode::SERVICE_UNAVAILABLE, e.to_string())
            }
            Self::Delivery(e) => {
                tracing::error!(error = %e, "Failed to send push notification");
                (StatusCode::BAD_GATEWAY, DELIVERY_FAILED_MESSAGE.to_string())
            }
            Self::SubscriptionGone(status) => {
                tracing::error!(status, "Failed to send push notification, subscription is gone");
                (StatusCode::BAD_GATEWAY, DELIVERY_FAILED_MESSAGE.to_string())
            }
            Self::BadRequest(msg) => {
                tracing::debug!(message = %msg, "Bad request");
                (StatusCode::BAD_REQUEST, msg)
            }
            Self::Internal => {
                tracing::error!("Internal server error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "success": false,
            "error": message
        }));

        (status, body).into_response()
    }
}
