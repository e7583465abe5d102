use super::{PushError, PushProvider};
use crate::config::PushConfig;
use crate::domain::subscription::StoredSubscription;
use crate::domain::vapid::VapidCredentials;
use async_trait::async_trait;
use std::time::Duration;
use web_push::{ContentEncoding, SubscriptionInfo, VapidSignatureBuilder, WebPushMessageBuilder};

/// Delivers RFC 8030 web push messages with RFC 8291 encryption and VAPID signing.
///
/// `web-push` only builds the message; the HTTP request goes through `reqwest`.
#[derive(Clone, Debug)]
pub struct WebPushProvider {
    client: reqwest::Client,
    ttl_secs: u32,
}

impl WebPushProvider {
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &PushConfig) -> Result<Self, PushError> {
        let client = reqwest::Client::builder().timeout(Duration::from_secs(config.timeout_secs)).build()?;
        Ok(Self { client, ttl_secs: config.ttl_secs })
    }
}

fn encryption_error(e: impl std::fmt::Display) -> PushError {
    PushError::Encryption(e.to_string())
}

#[async_trait]
impl PushProvider for WebPushProvider {
    #[tracing::instrument(level = "debug", skip_all, fields(endpoint = %subscription.endpoint), err)]
    async fn send_push(
        &self,
        subscription: &StoredSubscription,
        credentials: &VapidCredentials,
        payload: &[u8],
    ) -> Result<(), PushError> {
        let sub_info =
            SubscriptionInfo::new(&subscription.endpoint, &subscription.keys.p256dh, &subscription.keys.auth);

        let mut sig_builder =
            VapidSignatureBuilder::from_base64(credentials.private_key(), &sub_info).map_err(encryption_error)?;
        sig_builder.add_claim("sub", credentials.subject());
        let signature = sig_builder.build().map_err(encryption_error)?;

        let mut builder = WebPushMessageBuilder::new(&sub_info);
        builder.set_payload(ContentEncoding::Aes128Gcm, payload);
        builder.set_vapid_signature(signature);
        builder.set_ttl(self.ttl_secs);
        let message = builder.build().map_err(encryption_error)?;

        let mut request = self.client.post(message.endpoint.to_string()).header("TTL", message.ttl.to_string());

        if let Some(urgency) = message.urgency {
            request = request.header("Urgency", urgency.to_string());
        }

        if let Some(topic) = message.topic {
            request = request.header("Topic", topic);
        }

        if let Some(push_payload) = message.payload {
            request = request
                .header("Content-Encoding", push_payload.content_encoding.to_str())
                .header("Content-Type", "application/octet-stream");

            for (key, value) in &push_payload.crypto_headers {
                request = request.header(*key, value.as_str());
            }

            request = request.body(push_payload.content);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();

        match status {
            200..=299 => Ok(()),
            404 | 410 => Err(PushError::Gone(status)),
            _ => {
                let body = response.text().await.unwrap_or_default();
                Err(PushError::Rejected { status, body })
            }
        }
    }
}
