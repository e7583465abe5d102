#![allow(clippy::unwrap_used, clippy::panic, clippy::missing_panics_doc, dead_code, unreachable_pub)]

use async_trait::async_trait;
use pwa_push_server::App;
use pwa_push_server::adapters::push::{PushError, PushProvider};
use pwa_push_server::config::{
    AppConfig, Config, Environment, PushConfig, RateLimitConfig, ServerConfig, TelemetryConfig, VapidConfig,
};
use pwa_push_server::domain::subscription::StoredSubscription;
use pwa_push_server::domain::vapid::{VapidCredentials, generate_keys};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, Once};

static INIT: Once = Once::new();

pub fn setup_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into())
            .add_directive("pwa_push_server=debug".parse().unwrap())
            .add_directive("tower=warn".parse().unwrap())
            .add_directive("hyper=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap());

        tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().init();
    });
}

pub fn vapid_config() -> VapidConfig {
    let keys = generate_keys();
    VapidConfig {
        public_key: Some(keys.public_key),
        private_key: Some(keys.private_key),
        subject: Some("mailto:tests@example.com".to_string()),
    }
}

pub fn get_test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            mgmt_port: 0,
            shutdown_timeout_secs: 1,
            environment: Environment::Development,
            static_dir: None,
        },
        vapid: vapid_config(),
        push: PushConfig::default(),
        app: AppConfig::default(),
        rate_limit: RateLimitConfig { per_second: 10_000, burst: 10_000 },
        telemetry: TelemetryConfig::default(),
    }
}

#[derive(Debug, Clone)]
pub struct SentPush {
    pub subscription: StoredSubscription,
    pub subject: String,
    pub payload: serde_json::Value,
}

/// Records every push instead of delivering it. Queued failures are returned in order.
#[derive(Debug, Default)]
pub struct RecordingPushProvider {
    pub sent: Mutex<Vec<SentPush>>,
    pub failures: Mutex<Vec<PushError>>,
}

impl RecordingPushProvider {
    pub fn sent(&self) -> Vec<SentPush> {
        self.sent.lock().unwrap().clone()
    }

    pub fn fail_next(&self, error: PushError) {
        self.failures.lock().unwrap().push(error);
    }
}

#[async_trait]
impl PushProvider for RecordingPushProvider {
    async fn send_push(
        &self,
        subscription: &StoredSubscription,
        credentials: &VapidCredentials,
        payload: &[u8],
    ) -> Result<(), PushError> {
        self.sent.lock().unwrap().push(SentPush {
            subscription: subscription.clone(),
            subject: credentials.subject().to_string(),
            payload: serde_json::from_slice(payload).unwrap(),
        });

        let mut failures = self.failures.lock().unwrap();
        if failures.is_empty() { Ok(()) } else { Err(failures.remove(0)) }
    }
}

pub struct TestApp {
    pub server_url: String,
    pub mgmt_url: String,
    pub client: reqwest::Client,
    pub provider: Arc<RecordingPushProvider>,
    pub config: Config,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_config(get_test_config()).await
    }

    pub async fn spawn_with_config(config: Config) -> Self {
        setup_tracing();

        let provider = Arc::new(RecordingPushProvider::default());
        let app = App::build(config.clone(), Arc::clone(&provider) as Arc<dyn PushProvider>);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mgmt_listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let server_url = format!("http://{}", listener.local_addr().unwrap());
        let mgmt_url = format!("http://{}", mgmt_listener.local_addr().unwrap());

        tokio::spawn(async move {
            axum::serve(listener, app.router.into_make_service_with_connect_info::<SocketAddr>()).await.unwrap();
        });
        tokio::spawn(async move {
            axum::serve(mgmt_listener, app.mgmt_router.into_make_service_with_connect_info::<SocketAddr>())
                .await
                .unwrap();
        });

        let client = reqwest::Client::builder().cookie_store(true).build().unwrap();

        Self { server_url, mgmt_url, client, provider, config }
    }

    pub async fn subscribe(&self, body: serde_json::Value) -> reqwest::Response {
        self.client.post(format!("{}/api/push/subscription", self.server_url)).json(&body).send().await.unwrap()
    }

    pub async fn unsubscribe(&self) -> reqwest::Response {
        self.client.delete(format!("{}/api/push/subscription", self.server_url)).send().await.unwrap()
    }

    pub async fn send_notification(&self, message: &str) -> reqwest::Response {
        self.client
            .post(format!("{}/api/push/notifications", self.server_url))
            .json(&serde_json::json!({ "message": message }))
            .send()
            .await
            .unwrap()
    }
}

pub fn valid_subscription() -> serde_json::Value {
    serde_json::json!({
        "endpoint": "https://push.example/abc",
        "keys": { "p256dh": "p1", "auth": "a1" }
    })
}
