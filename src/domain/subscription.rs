use serde::{Deserialize, Serialize};

/// Subscription keys exactly as the browser reports them in `PushSubscriptionJSON`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RawSubscriptionKeys {
    pub p256dh: Option<String>,
    pub auth: Option<String>,
}

/// Untrusted subscription payload posted by the browser. Every field is optional here;
/// [`RawSubscription::normalize`] decides whether it is usable.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSubscription {
    pub endpoint: Option<String>,
    pub expiration_time: Option<f64>,
    pub keys: Option<RawSubscriptionKeys>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SubscriptionKeys {
    pub p256dh: String,
    pub auth: String,
}

/// The one push subscription tracked per client.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSubscription {
    pub endpoint: String,
    pub expiration_time: Option<f64>,
    pub keys: SubscriptionKeys,
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).cloned()
}

impl RawSubscription {
    /// Trims the browser payload down to the fields needed for delivery.
    ///
    /// Returns `None` if the endpoint or either key is missing or empty.
    #[must_use]
    pub fn normalize(&self) -> Option<StoredSubscription> {
        let endpoint = non_empty(self.endpoint.as_ref())?;
        let keys = self.keys.as_ref()?;

        Some(StoredSubscription {
            endpoint,
            expiration_time: self.expiration_time,
            keys: SubscriptionKeys {
                p256dh: non_empty(keys.p256dh.as_ref())?,
                auth: non_empty(keys.auth.as_ref())?,
            },
        })
    }
}

impl StoredSubscription {
    /// Whether every required field is populated. Deserialized values may still be blank.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.endpoint.is_empty() && !self.keys.p256dh.is_empty() && !self.keys.auth.is_empty()
    }
}
