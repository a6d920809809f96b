//! Router display defaults.

use push_contract::{
    DEFAULT_BADGE, DEFAULT_CLICK_TARGET, DEFAULT_ICON, DEFAULT_TITLE, NOTIFICATION_TAG,
};
use serde::{Deserialize, Serialize};

/// Defaults applied when a visible push leaves a display field empty.
///
/// Hosts may supply overrides as JSON; missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RouterConfig {
    /// Title used when the push has none.
    pub default_title: String,
    /// Icon used when the push has none.
    pub fallback_icon: String,
    /// Badge attached to every notification.
    pub badge: String,
    /// Tag attached to every notification.
    pub tag: String,
    /// Click target used when the push has none.
    pub default_click_target: String,
    /// Whether notifications stay until the user interacts with them.
    pub require_interaction: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            default_title: DEFAULT_TITLE.to_string(),
            fallback_icon: DEFAULT_ICON.to_string(),
            badge: DEFAULT_BADGE.to_string(),
            tag: NOTIFICATION_TAG.to_string(),
            default_click_target: DEFAULT_CLICK_TARGET.to_string(),
            require_interaction: false,
        }
    }
}

impl RouterConfig {
    /// Parses a JSON override document.
    ///
    /// # Errors
    ///
    /// Returns an error when `raw` is not a valid config object.
    pub fn from_json(raw: &str) -> Result<Self, String> {
        serde_json::from_str(raw).map_err(|e| format!("invalid router config: {e}"))
    }
}
