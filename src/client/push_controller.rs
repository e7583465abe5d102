use super::{PlatformError, Toast, Toaster};
use crate::api::schemas::push::ActionResponse;
use crate::domain::subscription::RawSubscription;
use crate::domain::vapid::BASE64URL_LENIENT;
use async_trait::async_trait;
use base64::Engine;
use std::cell::Cell;
use std::rc::Rc;

pub const SERVICE_WORKER_URL: &str = "/sw.js";
pub const DEFAULT_MESSAGE: &str = "Hello from your PWA!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateViaCache {
    Imports,
    All,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationOptions {
    pub scope: &'static str,
    pub update_via_cache: UpdateViaCache,
}

pub const REGISTRATION: RegistrationOptions = RegistrationOptions { scope: "/", update_via_cache: UpdateViaCache::None };

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscribeOptions {
    pub user_visible_only: bool,
    pub application_server_key: Vec<u8>,
}

/// Service worker and Push API access.
#[async_trait(?Send)]
pub trait PushPlatform {
    /// Whether both service workers and the Push API are available.
    fn supports_push(&self) -> bool;

    async fn register_service_worker(&self, script_url: &str, options: &RegistrationOptions)
    -> Result<(), PlatformError>;

    async fn existing_subscription(&self) -> Result<Option<RawSubscription>, PlatformError>;

    async fn subscribe(&self, options: &SubscribeOptions) -> Result<RawSubscription, PlatformError>;

    /// Drops the browser's current subscription, if any.
    async fn unsubscribe(&self) -> Result<(), PlatformError>;
}

/// The server's push actions (`/api/push/*`).
#[async_trait(?Send)]
pub trait ServerActions {
    async fn subscribe_user(&self, subscription: &RawSubscription) -> Result<ActionResponse, PlatformError>;
    async fn unsubscribe_user(&self) -> Result<ActionResponse, PlatformError>;
    async fn send_notification(&self, message: &str) -> Result<ActionResponse, PlatformError>;
}

/// Decodes a URL-safe base64 VAPID public key, with or without padding, into the raw bytes
/// expected as `applicationServerKey`. Standard-alphabet input is accepted too.
///
/// # Errors
/// Returns an error if the key is not valid base64.
pub fn decode_application_server_key(key: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let normalized: String = key.trim().chars().map(|c| match c {
        '+' => '-',
        '/' => '_',
        other => other,
    }).collect();
    BASE64URL_LENIENT.decode(normalized)
}

/// Flips to inactive when the owning view goes away; late results are then discarded.
#[derive(Debug, Clone)]
pub struct MountGuard(Rc<Cell<bool>>);

impl MountGuard {
    pub fn unmount(&self) {
        self.0.set(false);
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.0.get()
    }
}

/// Drives the subscribe / unsubscribe / send-test flow for one page.
#[derive(Debug)]
pub struct PushController<P, S, T> {
    platform: P,
    server: S,
    toaster: T,
    vapid_public_key: Option<String>,
    subscription: Option<RawSubscription>,
    message: String,
    guard: MountGuard,
}

impl<P: PushPlatform, S: ServerActions, T: Toaster> PushController<P, S, T> {
    pub fn new(platform: P, server: S, toaster: T, vapid_public_key: Option<String>) -> Self {
        Self {
            platform,
            server,
            toaster,
            vapid_public_key: vapid_public_key.filter(|k| !k.trim().is_empty()),
            subscription: None,
            message: DEFAULT_MESSAGE.to_string(),
            guard: MountGuard(Rc::new(Cell::new(true))),
        }
    }

    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.platform.supports_push()
    }

    #[must_use]
    pub const fn subscription(&self) -> Option<&RawSubscription> {
        self.subscription.as_ref()
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    #[must_use]
    pub fn mount_guard(&self) -> MountGuard {
        self.guard.clone()
    }

    /// Registers the service worker and picks up an existing subscription.
    pub async fn mount(&mut self) {
        if !self.is_supported() {
            return;
        }

        let result = async {
            self.platform.register_service_worker(SERVICE_WORKER_URL, &REGISTRATION).await?;
            self.platform.existing_subscription().await
        }
        .await;

        if !self.guard.is_active() {
            return;
        }

        match result {
            Ok(existing) => self.subscription = existing,
            Err(_) => self.toaster.show(Toast::Error("Could not register the service worker.".into())),
        }
    }

    pub async fn subscribe(&mut self) {
        let Some(key) = self.vapid_public_key.as_deref() else {
            self.toaster.show(Toast::Warning("Set VAPID_PUBLIC_KEY on the server before subscribing.".into()));
            return;
        };

        let result = async {
            let application_server_key =
                decode_application_server_key(key).map_err(|e| PlatformError(e.to_string()))?;
            let subscription = self
                .platform
                .subscribe(&SubscribeOptions { user_visible_only: true, application_server_key })
                .await?;
            let response = self.server.subscribe_user(&subscription).await?;
            Ok::<_, PlatformError>((subscription, response))
        }
        .await;

        match result {
            Ok((subscription, ActionResponse { success: true, .. })) => {
                self.subscription = Some(subscription);
                self.toaster.show(Toast::Success("Push subscription created.".into()));
            }
            Ok((_, response)) => self.toaster.show(Toast::Error(response.error.unwrap_or_default())),
            Err(_) => self
                .toaster
                .show(Toast::Error("Subscription failed. Verify permissions and your VAPID key.".into())),
        }
    }

    pub async fn unsubscribe(&mut self) {
        let result = async {
            if self.subscription.is_some() {
                self.platform.unsubscribe().await?;
            }
            self.server.unsubscribe_user().await
        }
        .await;

        match result {
            Ok(ActionResponse { success: true, .. }) => {
                self.subscription = None;
                self.toaster.show(Toast::Success("Push subscription removed.".into()));
            }
            Ok(response) => self.toaster.show(Toast::Error(response.error.unwrap_or_default())),
            Err(_) => self.toaster.show(Toast::Error("Could not unsubscribe from push notifications.".into())),
        }
    }

    pub async fn send_test(&self) {
        match self.server.send_notification(&self.message).await {
            Ok(ActionResponse { success: true, .. }) => self.toaster.show(Toast::Success("Notification sent.".into())),
            Ok(response) => self.toaster.show(Toast::Error(response.error.unwrap_or_default())),
            Err(_) => self.toaster.show(Toast::Error("Could not reach the server.".into())),
        }
    }
}
