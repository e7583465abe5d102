use crate::adapters::cookie::SubscriptionStore;
use crate::config::Config;
use crate::services::notification_service::NotificationService;
use axum::body::Body;
use axum::http::Request;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_governor::GovernorLayer;
use tower_governor::governor::GovernorConfigBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod assets;
pub mod health;
pub mod middleware;
pub mod push;
pub mod schemas;

#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Config,
    pub store: SubscriptionStore,
    pub notification_service: NotificationService,
}

#[derive(Clone, Debug)]
pub struct MgmtState {
    pub notification_service: NotificationService,
}

#[derive(Debug)]
pub struct ServiceContainer {
    pub store: SubscriptionStore,
    pub notification_service: NotificationService,
}

/// Configures and returns the primary application router.
///
/// The router must be served with `into_make_service_with_connect_info::<SocketAddr>()`;
/// the rate limiter keys on the peer address.
///
/// # Panics
/// Panics if the rate limiter configuration cannot be constructed.
pub fn app_router(config: Config, services: ServiceContainer) -> Router {
    let interval_ns = 1_000_000_000 / config.rate_limit.per_second.max(1);
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_nanosecond(u64::from(interval_ns))
            .burst_size(config.rate_limit.burst.max(1))
            .finish()
            .expect("Failed to build rate limiter config"),
    );

    let static_dir = config.server.static_dir.clone();
    let state =
        AppState { config, store: services.store, notification_service: services.notification_service };

    let api_routes = Router::new()
        .route("/push/subscription", post(push::subscribe).delete(push::unsubscribe))
        .route("/push/notifications", post(push::send_notification))
        .route("/push/config", get(push::push_config))
        .layer(GovernorLayer::new(governor_conf));

    let mut router = Router::new()
        .route("/", get(assets::index))
        .route("/manifest.webmanifest", get(assets::manifest))
        .route("/sw.js", get(assets::service_worker))
        .nest("/api", api_routes);

    if let Some(dir) = static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(PropagateRequestIdLayer::new(axum::http::HeaderName::from_static("x-request-id")))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(move |request: &Request<Body>| {
                    let request_id = request
                        .extensions()
                        .get::<tower_http::request_id::RequestId>()
                        .map(|id| id.header_value().to_str().unwrap_or_default())
                        .unwrap_or_default()
                        .to_string();

                    tracing::info_span!(
                        "request",
                        "request_id" = %request_id,
                        "http.request.method" = %request.method(),
                        "url.path" = %request.uri().path(),
                        "http.response.status_code" = tracing::field::Empty,
                        "otel.kind" = "server",
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: std::time::Duration, _span: &tracing::Span| {
                        let status = response.status();
                        tracing::Span::current().record("http.response.status_code", status.as_u16());

                        tracing::info!(
                            latency_ms = %latency.as_millis(),
                            status = %status.as_u16(),
                            "request completed"
                        );
                    },
                )
                .on_failure(|error, _latency, _span: &tracing::Span| {
                    tracing::error!(error = %error, "request failed");
                }),
        )
        .layer(SetRequestIdLayer::new(
            axum::http::HeaderName::from_static("x-request-id"),
            middleware::MakeRequestUuidV7,
        ))
        .with_state(state)
}

pub fn mgmt_router(state: MgmtState) -> Router {
    Router::new().route("/livez", get(health::livez)).route("/readyz", get(health::readyz)).with_state(state)
}
