use serde::{Deserialize, Serialize};

/// Result shape shared by every push action: `{"success": true}` on success. Failures are
/// rendered by [`crate::error::AppError`] as `{"success": false, "error": "..."}`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionResponse {
    #[must_use]
    pub const fn ok() -> Self {
        Self { success: true, error: None }
    }
}

#[derive(Debug, Deserialize)]
pub struct SendNotificationRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushConfigResponse {
    pub public_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_response_omits_error() {
        assert_eq!(serde_json::to_string(&ActionResponse::ok()).unwrap(), r#"{"success":true}"#);
    }

    #[test]
    fn test_missing_message_defaults_to_empty() {
        let req: SendNotificationRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.message, "");
    }
}
