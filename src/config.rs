use clap::{Args, Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub vapid: VapidConfig,

    #[command(flatten)]
    pub push: PushConfig,

    #[command(flatten)]
    pub app: AppConfig,

    #[command(flatten)]
    pub rate_limit: RateLimitConfig,

    #[command(flatten)]
    pub telemetry: TelemetryConfig,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Clone, Debug, Args)]
pub struct ServerConfig {
    /// Host to listen on
    #[arg(long, env = "PWA_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PWA_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Port for the management (health) listener
    #[arg(long, env = "PWA_MGMT_PORT", default_value_t = 9090)]
    pub mgmt_port: u16,

    /// Seconds to wait for in-flight work during shutdown
    #[arg(long, env = "PWA_SHUTDOWN_TIMEOUT_SECS", default_value_t = 5)]
    pub shutdown_timeout_secs: u64,

    /// Deployment environment; production marks the subscription cookie as Secure
    #[arg(long, env = "PWA_ENVIRONMENT", value_enum, default_value_t = Environment::Development)]
    pub environment: Environment,

    /// Directory served for files that are not built in, such as icons
    #[arg(long, env = "PWA_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,
}

/// Raw VAPID values as supplied by the environment. Use
/// [`crate::domain::vapid::VapidCredentials::resolve`] before signing anything.
#[derive(Clone, Debug, Default, Args)]
pub struct VapidConfig {
    /// Base64url VAPID public key (uncompressed P-256 point); also handed to browsers
    #[arg(long = "vapid-public-key", env = "VAPID_PUBLIC_KEY")]
    pub public_key: Option<String>,

    /// Base64url VAPID private key (raw P-256 scalar)
    #[arg(long = "vapid-private-key", env = "VAPID_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    /// Contact URI identifying the sender, e.g. mailto:you@example.com
    #[arg(long = "vapid-subject", env = "VAPID_SUBJECT")]
    pub subject: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct PushConfig {
    /// Title of outgoing test notifications
    #[arg(long = "push-title", env = "PWA_PUSH_TITLE", default_value = "PWA Push Starter")]
    pub title: String,

    /// Icon path of outgoing notifications
    #[arg(long = "push-icon", env = "PWA_PUSH_ICON", default_value = "/icon-192x192.png")]
    pub icon: String,

    /// Badge path of outgoing notifications
    #[arg(long = "push-badge", env = "PWA_PUSH_BADGE", default_value = "/badge-72x72.png")]
    pub badge: String,

    /// URL opened when the notification is clicked
    #[arg(long = "push-url", env = "PWA_PUSH_URL", default_value = "/")]
    pub url: String,

    /// Time-to-live handed to the push service, in seconds
    #[arg(long = "push-ttl-secs", env = "PWA_PUSH_TTL_SECS", default_value_t = 86_400)]
    pub ttl_secs: u32,

    /// Timeout for the HTTP call to the push service, in seconds
    #[arg(long = "push-timeout-secs", env = "PWA_PUSH_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            title: "PWA Push Starter".to_string(),
            icon: "/icon-192x192.png".to_string(),
            badge: "/badge-72x72.png".to_string(),
            url: "/".to_string(),
            ttl_secs: 86_400,
            timeout_secs: 10,
        }
    }
}

#[derive(Clone, Debug, Args)]
pub struct AppConfig {
    /// Application name shown in the manifest
    #[arg(long = "app-name", env = "PWA_APP_NAME", default_value = "PWA Push Starter")]
    pub name: String,

    /// Short name used on home screens
    #[arg(long = "app-short-name", env = "PWA_APP_SHORT_NAME", default_value = "PWAPush")]
    pub short_name: String,

    #[arg(
        long = "app-description",
        env = "PWA_APP_DESCRIPTION",
        default_value = "Clone-and-deploy progressive web app starter with install support and optional web push notifications."
    )]
    pub description: String,

    #[arg(long = "theme-color", env = "PWA_THEME_COLOR", default_value = "#0f172a")]
    pub theme_color: String,

    #[arg(long = "background-color", env = "PWA_BACKGROUND_COLOR", default_value = "#ece6da")]
    pub background_color: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "PWA Push Starter".to_string(),
            short_name: "PWAPush".to_string(),
            description: "Clone-and-deploy progressive web app starter with install support and optional web push notifications."
                .to_string(),
            theme_color: "#0f172a".to_string(),
            background_color: "#ece6da".to_string(),
        }
    }
}

#[derive(Clone, Debug, Args)]
pub struct RateLimitConfig {
    /// Requests per second allowed per client IP on /api routes
    #[arg(long = "rate-limit-per-second", env = "PWA_RATE_LIMIT_PER_SECOND", default_value_t = 5)]
    pub per_second: u32,

    /// Burst allowance per client IP on /api routes
    #[arg(long = "rate-limit-burst", env = "PWA_RATE_LIMIT_BURST", default_value_t = 10)]
    pub burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self { per_second: 5, burst: 10 }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Debug, Default, Args)]
pub struct TelemetryConfig {
    /// Log output format
    #[arg(long, env = "PWA_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// OTLP collector endpoint; traces and metrics are exported only when set
    #[arg(long, env = "PWA_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,
}

impl Config {
    #[must_use]
    pub fn load() -> Self {
        Self::parse()
    }
}
