//! Backend send-endpoint envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::JsonMap;

/// Base URL used when the server client is not given one.
pub const DEFAULT_SERVER_BASE_URL: &str = "https://vibemessage.umangsailor.com/api";
/// Path of the send endpoint relative to the base URL.
pub const SEND_PATH: &str = "/push/send";

/// Notification submitted to the send endpoint.
///
/// A notification carrying only `data` is delivered as a silent push.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutgoingNotification {
    /// Notification title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Body text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Icon URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Click target URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub click_action: Option<String>,
    /// Free-form application data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonMap>,
}

impl OutgoingNotification {
    /// Builds a data-only notification.
    pub fn silent(data: JsonMap) -> Self {
        Self {
            data: Some(data),
            ..Self::default()
        }
    }
}

/// Delivery targets for a send request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendTargets {
    /// Application-level user ids; omitted to let the backend apply its default audience.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_user_ids: Option<Vec<String>>,
}

/// Request body of `POST {base}/push/send`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequest {
    /// Application id.
    pub app_id: String,
    /// Application secret.
    pub secret_key: String,
    /// Notification to deliver.
    pub notification: OutgoingNotification,
    /// Delivery targets.
    pub targets: SendTargets,
}

/// Response body of the send endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SendResponse {
    /// Whether the backend accepted the request.
    #[serde(default)]
    pub success: bool,
    /// Failure description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Endpoint-specific result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}
