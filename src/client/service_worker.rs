use super::PlatformError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_TITLE: &str = "Notification";
pub const DEFAULT_ICON: &str = "/icon-192x192.png";
pub const DEFAULT_BADGE: &str = "/badge-72x72.png";
pub const DEFAULT_URL: &str = "/";
pub const VIBRATION_PATTERN: [u32; 3] = [100, 50, 100];

/// Data attached to a shown notification and read back on click.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationData {
    pub url: String,
    pub received_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationOptions {
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub data: NotificationData,
    pub vibrate: [u32; 3],
}

/// Registration-level notification API (`self.registration.showNotification`).
#[async_trait(?Send)]
pub trait NotificationHost {
    async fn show_notification(&self, title: &str, options: &NotificationOptions) -> Result<(), PlatformError>;
}

/// A notification the user clicked.
pub trait ClickedNotification {
    fn close(&self);
    fn data(&self) -> Option<NotificationData>;
}

/// One open window client.
#[async_trait(?Send)]
pub trait WindowClient {
    async fn navigate(&self, url: &str) -> Result<(), PlatformError>;
    async fn focus(&self) -> Result<(), PlatformError>;
}

/// `self.clients`, restricted to windows.
#[async_trait(?Send)]
pub trait WindowClients {
    type Client: WindowClient;

    /// Open windows, including ones this worker does not control yet.
    async fn match_all(&self) -> Vec<Self::Client>;
    async fn open_window(&self, url: &str) -> Result<(), PlatformError>;
}

fn string_field(push: &Value, key: &str, default: &str) -> String {
    push.get(key).and_then(Value::as_str).filter(|v| !v.is_empty()).unwrap_or(default).to_string()
}

/// Turns a push message body into the notification to show. Fields that are missing, empty or
/// not strings fall back to their defaults one by one. Returns `None` when the push carried no
/// data, the data is not JSON, or it is JSON `null`.
#[must_use]
pub fn notification_for_push(data: Option<&[u8]>, received_at: i64) -> Option<(String, NotificationOptions)> {
    let push: Value = match serde_json::from_slice(data?) {
        Ok(Value::Null) => return None,
        Ok(push) => push,
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring push with a non-JSON body");
            return None;
        }
    };

    let options = NotificationOptions {
        body: string_field(&push, "body", ""),
        icon: string_field(&push, "icon", DEFAULT_ICON),
        badge: string_field(&push, "badge", DEFAULT_BADGE),
        data: NotificationData { url: string_field(&push, "url", DEFAULT_URL), received_at },
        vibrate: VIBRATION_PATTERN,
    };

    Some((string_field(&push, "title", DEFAULT_TITLE), options))
}

/// `push` event handler.
///
/// # Errors
/// Returns an error if the host refuses to show the notification.
pub async fn on_push(
    host: &impl NotificationHost,
    data: Option<&[u8]>,
    received_at: i64,
) -> Result<Option<String>, PlatformError> {
    let Some((title, options)) = notification_for_push(data, received_at) else {
        return Ok(None);
    };
    host.show_notification(&title, &options).await?;
    Ok(Some(title))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickAction {
    FocusedExisting(String),
    OpenedWindow(String),
}

/// `notificationclick` event handler: reuse the first open window, otherwise open one.
///
/// # Errors
/// Returns an error if the window cannot be focused or opened.
pub async fn on_notification_click<C: WindowClients>(
    notification: &impl ClickedNotification,
    clients: &C,
) -> Result<ClickAction, PlatformError> {
    notification.close();
    let url = notification.data().map_or_else(|| DEFAULT_URL.to_string(), |data| data.url);

    if let Some(client) = clients.match_all().await.into_iter().next() {
        // Windows this worker does not control yet refuse to navigate; focus them anyway.
        if let Err(e) = client.navigate(&url).await {
            tracing::debug!(error = %e, url = %url, "Could not navigate the open window");
        }
        client.focus().await?;
        return Ok(ClickAction::FocusedExisting(url));
    }

    clients.open_window(&url).await?;
    Ok(ClickAction::OpenedWindow(url))
}
