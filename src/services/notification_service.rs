use crate::adapters::push::{PushError, PushProvider};
use crate::config::{PushConfig, VapidConfig};
use crate::domain::payload::PushPayload;
use crate::domain::subscription::StoredSubscription;
use crate::domain::vapid::VapidCredentials;
use crate::error::{AppError, Result};
use opentelemetry::{KeyValue, global, metrics::Counter};
use std::sync::Arc;

#[derive(Clone, Debug)]
struct Metrics {
    sent: Counter<u64>,
    errors: Counter<u64>,
    pruned_subscriptions: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("pwa-push-server");
        Self {
            sent: meter
                .u64_counter("pwa_push_sent_total")
                .with_description("Total number of push notifications successfully sent")
                .build(),
            errors: meter
                .u64_counter("pwa_push_errors_total")
                .with_description("Total number of push notification delivery errors")
                .build(),
            pruned_subscriptions: meter
                .u64_counter("pwa_push_pruned_subscriptions_total")
                .with_description("Total number of subscriptions forgotten because the push service reported them gone")
                .build(),
        }
    }
}

/// Sends test notifications to the caller's stored subscription.
#[derive(Clone, Debug)]
pub struct NotificationService {
    provider: Arc<dyn PushProvider>,
    vapid: VapidConfig,
    push: PushConfig,
    metrics: Metrics,
}

impl NotificationService {
    #[must_use]
    pub fn new(provider: Arc<dyn PushProvider>, vapid: VapidConfig, push: PushConfig) -> Self {
        Self { provider, vapid, push, metrics: Metrics::new() }
    }

    /// The VAPID public key browsers need to subscribe, if push is fully configured.
    #[must_use]
    pub fn public_key(&self) -> Option<String> {
        VapidCredentials::resolve(&self.vapid).ok().map(|creds| creds.public_key().to_string())
    }

    /// Whether a send could be attempted with the current configuration.
    ///
    /// # Errors
    /// Returns the resolver's setup error when VAPID is missing or malformed.
    pub fn check_configured(&self) -> std::result::Result<(), crate::domain::vapid::VapidError> {
        VapidCredentials::resolve(&self.vapid).map(|_| ())
    }

    /// Sends one test notification carrying `message`.
    ///
    /// # Errors
    /// Returns `AppError::NoSubscription` when nothing is stored, `AppError::Setup` when VAPID
    /// is not configured (nothing is sent), `AppError::SubscriptionGone` when the push service
    /// has forgotten the subscription, and `AppError::Delivery` for any other failure.
    #[tracing::instrument(skip_all)]
    pub async fn send_test(&self, subscription: Option<&StoredSubscription>, message: &str) -> Result<()> {
        let subscription = subscription.ok_or(AppError::NoSubscription)?;
        let credentials = VapidCredentials::resolve(&self.vapid)?;

        let payload = PushPayload::for_message(message, &self.push);
        let body = serde_json::to_vec(&payload).map_err(|e| {
            tracing::error!(error = %e, "Failed to serialize push payload");
            AppError::Internal
        })?;

        match self.provider.send_push(subscription, &credentials, &body).await {
            Ok(()) => {
                tracing::info!(endpoint = %subscription.endpoint, "Push notification sent");
                self.metrics.sent.add(1, &[]);
                Ok(())
            }
            Err(PushError::Gone(status)) => {
                self.metrics.errors.add(1, &[KeyValue::new("reason", "gone")]);
                self.metrics.pruned_subscriptions.add(1, &[]);
                Err(AppError::SubscriptionGone(status))
            }
            Err(e) => {
                let reason = match e {
                    PushError::Rejected { .. } => "rejected",
                    PushError::Encryption(_) => "encryption",
                    _ => "transport",
                };
                self.metrics.errors.add(1, &[KeyValue::new("reason", reason)]);
                Err(AppError::Delivery(e.to_string()))
            }
        }
    }
}
