use crate::api::AppState;
use crate::config::AppConfig;
use crate::domain::manifest::WebManifest;
use axum::{
    Json,
    extract::State,
    http::header,
    response::{Html, IntoResponse},
};

const INDEX_HTML: &str = include_str!("../../static/index.html");
const SERVICE_WORKER_JS: &str = include_str!("../../static/sw.js");

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn render_index(app: &AppConfig) -> String {
    INDEX_HTML
        .replace("{{APP_NAME}}", &escape_html(&app.name))
        .replace("{{APP_SHORT_NAME}}", &escape_html(&app.short_name))
        .replace("{{APP_DESCRIPTION}}", &escape_html(&app.description))
        .replace("{{THEME_COLOR}}", &escape_html(&app.theme_color))
}

/// Landing page with the install and push controls.
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    Html(render_index(&state.config.app))
}

/// The web app manifest.
pub async fn manifest(State(state): State<AppState>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/manifest+json")], Json(WebManifest::from_config(&state.config.app)))
}

/// The service worker, served uncached so browsers always pick up updates.
pub async fn service_worker() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "application/javascript; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
            (header::HeaderName::from_static("service-worker-allowed"), "/"),
        ],
        SERVICE_WORKER_JS,
    )
}
