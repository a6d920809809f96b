//! System notification display options and retained click data.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{JsonMap, NotificationPayload};

/// Title used when a visible push carries none.
pub const DEFAULT_TITLE: &str = "Notification";
/// Icon used when a visible push carries none.
pub const DEFAULT_ICON: &str = "/icon.png";
/// Badge attached to every displayed notification.
pub const DEFAULT_BADGE: &str = "/badge.png";
/// Click target used when a push carries no `click_action`.
pub const DEFAULT_CLICK_TARGET: &str = "/";
/// Tag grouping notifications shown by the SDK.
pub const NOTIFICATION_TAG: &str = "vibe-push-notification";

/// Options handed to the host notification display service.
///
/// Serialized in the `showNotification` dictionary shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationOptions {
    /// Body text.
    pub body: String,
    /// Icon URL.
    pub icon: String,
    /// Optional large image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Badge URL.
    pub badge: String,
    /// Data retained on the notification and read back on click.
    pub data: JsonMap,
    /// Tag grouping related notifications.
    pub tag: String,
    /// Whether the notification stays until the user interacts with it.
    pub require_interaction: bool,
}

impl NotificationOptions {
    /// Returns the retained click target, if any.
    pub fn click_action(&self) -> Option<&str> {
        self.data.get("click_action").and_then(Value::as_str)
    }
}

/// Builds the data retained on a displayed notification.
///
/// The click target comes first and the payload's `data` fields are spread after it, so a `data`
/// key named `click_action` takes precedence.
pub fn retained_data(payload: &NotificationPayload, default_click_target: &str) -> JsonMap {
    let mut retained = JsonMap::new();
    retained.insert(
        "click_action".to_string(),
        Value::String(payload.click_target_or(default_click_target).to_string()),
    );
    if let Some(data) = &payload.data {
        for (key, value) in data {
            retained.insert(key.clone(), value.clone());
        }
    }
    retained
}
