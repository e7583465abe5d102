#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::todo)]
#![warn(clippy::panic)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(unreachable_pub)]
#![warn(missing_debug_implementations)]
#![warn(unused_qualifications)]
#![deny(unused_must_use)]

pub mod adapters;
pub mod api;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod services;
pub mod telemetry;

use crate::adapters::cookie::SubscriptionStore;
use crate::adapters::push::PushProvider;
use crate::api::{MgmtState, ServiceContainer};
use crate::config::Config;
use crate::services::notification_service::NotificationService;
use std::sync::Arc;
use tokio::sync::watch;

/// The wired application: the public router and the management router.
#[derive(Debug)]
pub struct App {
    pub router: axum::Router,
    pub mgmt_router: axum::Router,
}

impl App {
    /// Wires services and routers around the given push provider.
    #[must_use]
    pub fn build(config: Config, provider: Arc<dyn PushProvider>) -> Self {
        let notification_service =
            NotificationService::new(provider, config.vapid.clone(), config.push.clone());

        match notification_service.check_configured() {
            Ok(()) => tracing::info!("Push notifications enabled"),
            Err(e) => tracing::warn!(error = %e, "Push notifications disabled"),
        }

        let services = ServiceContainer {
            store: SubscriptionStore::new(config.server.environment),
            notification_service: notification_service.clone(),
        };

        Self {
            router: api::app_router(config, services),
            mgmt_router: api::mgmt_router(MgmtState { notification_service }),
        }
    }
}

/// Routes panics through `tracing` so they reach structured logs.
pub fn setup_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let location = info.location().map(ToString::to_string).unwrap_or_default();
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .map(ToString::to_string)
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_default();
        tracing::error!(panic.location = %location, panic.payload = %payload, "Panic occurred");
    }));
}

/// Flips `shutdown_tx` to `true` on SIGINT or SIGTERM.
pub fn spawn_signal_handler(shutdown_tx: watch::Sender<bool>) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to install SIGTERM handler");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            () = ctrl_c => {},
            () = terminate => {},
        }

        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });
}
