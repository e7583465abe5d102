use crate::config::Environment;
use crate::domain::subscription::StoredSubscription;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

pub const SUBSCRIPTION_COOKIE: &str = "pwa-subscription";
pub const SUBSCRIPTION_TTL_DAYS: i64 = 30;

/// Characters left alone by `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Persists the client's single push subscription in a cookie.
#[derive(Clone, Copy, Debug)]
pub struct SubscriptionStore {
    secure: bool,
}

impl SubscriptionStore {
    #[must_use]
    pub const fn new(environment: Environment) -> Self {
        Self { secure: environment.is_production() }
    }

    /// Writes `subscription` into the jar, replacing any previous one.
    ///
    /// # Errors
    /// Returns an error if the subscription cannot be serialized.
    pub fn save(&self, jar: CookieJar, subscription: &StoredSubscription) -> serde_json::Result<CookieJar> {
        let json = serde_json::to_string(subscription)?;
        let value = utf8_percent_encode(&json, URI_COMPONENT).to_string();

        let cookie = Cookie::build((SUBSCRIPTION_COOKIE, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(time::Duration::days(SUBSCRIPTION_TTL_DAYS));

        Ok(jar.add(cookie))
    }

    /// Removes the stored subscription. Succeeds even when there is none.
    #[must_use]
    pub fn clear(&self, jar: CookieJar) -> CookieJar {
        jar.remove(Cookie::build(SUBSCRIPTION_COOKIE).path("/"))
    }

    /// Reads the stored subscription. Anything undecodable or incomplete reads as `None`.
    #[must_use]
    pub fn read(&self, jar: &CookieJar) -> Option<StoredSubscription> {
        let raw = jar.get(SUBSCRIPTION_COOKIE)?;
        let decoded = match percent_decode_str(raw.value()).decode_utf8() {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::debug!(error = %e, "Subscription cookie is not valid UTF-8");
                return None;
            }
        };

        match serde_json::from_str::<StoredSubscription>(&decoded) {
            Ok(subscription) if subscription.is_complete() => Some(subscription),
            Ok(_) => {
                tracing::debug!("Subscription cookie is missing required fields");
                None
            }
            Err(e) => {
                tracing::debug!(error = %e, "Subscription cookie is not valid JSON");
                None
            }
        }
    }
}
