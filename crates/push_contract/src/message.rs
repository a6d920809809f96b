//! Cross-context message contract between the background router and open application contexts.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{JsonMap, NotificationPayload};

/// `type` tag of [`RoutedMessage::Foreground`].
pub const FOREGROUND_MESSAGE: &str = "FOREGROUND_MESSAGE";
/// `type` tag of [`RoutedMessage::Background`].
pub const BACKGROUND_MESSAGE: &str = "BACKGROUND_MESSAGE";
/// `type` tag of [`RoutedMessage::Silent`].
pub const SILENT_MESSAGE: &str = "SILENT_MESSAGE";

/// Message posted from the background context to an open application context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RoutedMessage {
    /// Push received while the application had input focus.
    #[serde(rename = "FOREGROUND_MESSAGE")]
    Foreground {
        /// The payload exactly as received.
        payload: NotificationPayload,
    },
    /// A shown notification was clicked; carries the notification's retained data.
    #[serde(rename = "BACKGROUND_MESSAGE")]
    Background {
        /// Retained notification data (`click_action` plus the push's `data` fields).
        payload: JsonMap,
    },
    /// Data-only push.
    #[serde(rename = "SILENT_MESSAGE")]
    Silent {
        /// The push's `data` object.
        data: JsonMap,
    },
}

impl RoutedMessage {
    /// Returns the wire `type` tag for diagnostics.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Foreground { .. } => FOREGROUND_MESSAGE,
            Self::Background { .. } => BACKGROUND_MESSAGE,
            Self::Silent { .. } => SILENT_MESSAGE,
        }
    }

    /// Encodes the message as a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error when serialization fails.
    pub fn to_value(&self) -> Result<Value, String> {
        serde_json::to_value(self).map_err(|e| e.to_string())
    }

    /// Decodes a JSON value posted to a context.
    ///
    /// Returns `None` for values that are not SDK messages, since contexts may receive unrelated
    /// messages on the same channel.
    pub fn from_value(value: &Value) -> Option<Self> {
        let tag = value.get("type")?.as_str()?;
        if !matches!(tag, FOREGROUND_MESSAGE | BACKGROUND_MESSAGE | SILENT_MESSAGE) {
            return None;
        }
        Self::deserialize(value).ok()
    }
}
