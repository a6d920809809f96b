//! Inbound push payload models and boundary validation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON object used for free-form `data` fields.
pub type JsonMap = serde_json::Map<String, Value>;

/// Notification payload as produced by the remote server.
///
/// Every field is optional on the wire. Keys the SDK does not model are kept in
/// [`NotificationPayload::extra`] so a forwarded payload matches what the server sent.
///
/// Deserialization goes through [`NotificationPayload::from_map`], so a payload always decodes
/// the same way it was routed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "JsonMap")]
pub struct NotificationPayload {
    /// Notification title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Notification body text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Icon URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Large image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// URL opened or focused when the notification is clicked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub click_action: Option<String>,
    /// Free-form application data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonMap>,
    /// Marks a data-only push that must not display anything.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub silent: Option<bool>,
    /// Unmodelled top-level keys, forwarded untouched.
    #[serde(flatten)]
    pub extra: JsonMap,
}

impl NotificationPayload {
    /// Builds a payload from a decoded JSON object.
    ///
    /// Modelled keys are only taken when they carry the expected JSON type; anything else is kept
    /// in `extra` under its original key so nothing is lost on re-serialization.
    pub fn from_map(mut map: JsonMap) -> Self {
        let title = take_string(&mut map, "title");
        let body = take_string(&mut map, "body");
        let icon = take_string(&mut map, "icon");
        let image = take_string(&mut map, "image");
        let click_action = take_string(&mut map, "click_action");
        let data = match map.remove("data") {
            Some(Value::Object(data)) => Some(data),
            Some(other) => {
                map.insert("data".to_string(), other);
                None
            }
            None => None,
        };
        let silent = match map.remove("silent") {
            Some(Value::Bool(flag)) => Some(flag),
            Some(other) => {
                map.insert("silent".to_string(), other);
                None
            }
            None => None,
        };
        Self {
            title,
            body,
            icon,
            image,
            click_action,
            data,
            silent,
            extra: map,
        }
    }

    /// Returns the title, or `fallback` when absent or empty.
    pub fn title_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        non_empty(self.title.as_deref()).unwrap_or(fallback)
    }

    /// Returns the click target, or `fallback` when absent or empty.
    pub fn click_target_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        non_empty(self.click_action.as_deref()).unwrap_or(fallback)
    }
}

impl From<JsonMap> for NotificationPayload {
    fn from(map: JsonMap) -> Self {
        Self::from_map(map)
    }
}

/// Inbound push validated at the background-context boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundPush {
    /// User-visible push, routed to a focused context or shown as a notification.
    Visible(NotificationPayload),
    /// Data-only push, fanned out to every open context.
    Silent {
        /// The payload's `data` object (`{}` when absent).
        data: JsonMap,
    },
}

impl InboundPush {
    /// Decodes a raw push body.
    ///
    /// Absent, empty, or malformed bodies decode as an empty mapping and never fail.
    pub fn from_bytes(raw: Option<&[u8]>) -> Self {
        let value = raw
            .filter(|bytes| !bytes.is_empty())
            .and_then(|bytes| serde_json::from_slice::<Value>(bytes).ok())
            .unwrap_or(Value::Null);
        Self::from_value(value)
    }

    /// Decodes a push body delivered as text.
    pub fn from_text(raw: Option<&str>) -> Self {
        Self::from_bytes(raw.map(str::as_bytes))
    }

    /// Classifies an already-decoded JSON value. Non-object values count as an empty mapping.
    pub fn from_value(value: Value) -> Self {
        let mut map = match value {
            Value::Object(map) => map,
            _ => JsonMap::new(),
        };

        if map.get("silent").is_some_and(is_truthy) {
            let data = match map.remove("data") {
                Some(Value::Object(data)) => data,
                _ => JsonMap::new(),
            };
            return Self::Silent { data };
        }

        Self::Visible(NotificationPayload::from_map(map))
    }

    /// Returns whether this push is data-only.
    pub const fn is_silent(&self) -> bool {
        matches!(self, Self::Silent { .. })
    }
}

fn take_string(map: &mut JsonMap, key: &str) -> Option<String> {
    match map.remove(key) {
        Some(Value::String(value)) => Some(value),
        Some(other) => {
            map.insert(key.to_string(), other);
            None
        }
        None => None,
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

// Push bodies come from loosely typed senders, so `silent` follows JSON truthiness.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
