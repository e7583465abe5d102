use crate::config::PushConfig;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BODY: &str = "Push notifications are configured correctly.";

/// JSON body of a push message, as read by the service worker.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct PushPayload {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub url: String,
}

impl PushPayload {
    /// Builds the test notification for `message`, falling back to [`DEFAULT_BODY`] when
    /// the message is empty or whitespace.
    #[must_use]
    pub fn for_message(message: &str, config: &PushConfig) -> Self {
        let trimmed = message.trim();
        let body = if trimmed.is_empty() { DEFAULT_BODY } else { trimmed };

        Self {
            title: config.title.clone(),
            body: body.to_string(),
            icon: config.icon.clone(),
            badge: config.badge.clone(),
            url: config.url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_is_trimmed() {
        let payload = PushPayload::for_message("  hello  ", &PushConfig::default());
        assert_eq!(payload.body, "hello");
        assert_eq!(payload.title, "PWA Push Starter");
        assert_eq!(payload.icon, "/icon-192x192.png");
        assert_eq!(payload.badge, "/badge-72x72.png");
        assert_eq!(payload.url, "/");
    }

    #[test]
    fn test_blank_message_uses_default_body() {
        for message in ["", "   ", "\n\t"] {
            let payload = PushPayload::for_message(message, &PushConfig::default());
            assert_eq!(payload.body, DEFAULT_BODY);
        }
    }
}
