use crate::domain::subscription::StoredSubscription;
use crate::domain::vapid::VapidCredentials;
use async_trait::async_trait;
use thiserror::Error;

pub mod webpush;

pub use webpush::WebPushProvider;

#[derive(Error, Debug)]
pub enum PushError {
    #[error("Subscription is no longer valid (HTTP {0})")]
    Gone(u16),
    #[error("Push service rejected the message (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("Failed to sign or encrypt the message: {0}")]
    Encryption(String),
    #[error("Push service request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[async_trait]
pub trait PushProvider: Send + Sync + std::fmt::Debug {
    /// Signs, encrypts and delivers one push message to the subscription's endpoint.
    ///
    /// # Errors
    /// Returns `PushError::Gone` if the push service reports the subscription as expired or
    /// unknown; the caller should forget it.
    async fn send_push(
        &self,
        subscription: &StoredSubscription,
        credentials: &VapidCredentials,
        payload: &[u8],
    ) -> Result<(), PushError>;
}
