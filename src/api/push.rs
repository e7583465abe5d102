use crate::api::AppState;
use crate::api::schemas::push::{ActionResponse, PushConfigResponse, SendNotificationRequest};
use crate::domain::subscription::RawSubscription;
use crate::error::{AppError, Result};
use axum::{Json, extract::State, extract::rejection::JsonRejection, response::IntoResponse};
use axum_extra::extract::cookie::CookieJar;

/// Stores the browser's push subscription in the subscription cookie.
///
/// # Errors
/// Returns `AppError::InvalidSubscription` if the body is not a usable subscription.
pub async fn subscribe(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: std::result::Result<Json<RawSubscription>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(raw) = payload.map_err(|e| {
        tracing::debug!(error = %e, "Subscription body is not valid JSON");
        AppError::InvalidSubscription
    })?;
    let subscription = raw.normalize().ok_or(AppError::InvalidSubscription)?;

    let jar = state.store.save(jar, &subscription).map_err(|e| {
        tracing::error!(error = %e, "Failed to encode push subscription");
        AppError::Internal
    })?;

    tracing::info!(endpoint = %subscription.endpoint, "Push subscription stored");
    Ok((jar, Json(ActionResponse::ok())))
}

/// Forgets the stored subscription. Always succeeds.
pub async fn unsubscribe(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    tracing::info!("Push subscription cleared");
    (state.store.clear(jar), Json(ActionResponse::ok()))
}

/// Sends a test notification to the stored subscription.
///
/// A subscription the push service reports as gone is dropped from the cookie.
///
/// # Errors
/// See [`crate::services::notification_service::NotificationService::send_test`].
pub async fn send_notification(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: std::result::Result<Json<SendNotificationRequest>, JsonRejection>,
) -> std::result::Result<impl IntoResponse, (CookieJar, AppError)> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(e) => return Err((jar, AppError::BadRequest(e.body_text()))),
    };

    let subscription = state.store.read(&jar);
    match state.notification_service.send_test(subscription.as_ref(), &request.message).await {
        Ok(()) => Ok(Json(ActionResponse::ok())),
        Err(e @ AppError::SubscriptionGone(_)) => {
            tracing::info!("Pruning push subscription reported gone by the push service");
            Err((state.store.clear(jar), e))
        }
        Err(e) => Err((jar, e)),
    }
}

/// Exposes the VAPID public key so the page can subscribe.
pub async fn push_config(State(state): State<AppState>) -> impl IntoResponse {
    Json(PushConfigResponse { public_key: state.notification_service.public_key() })
}
