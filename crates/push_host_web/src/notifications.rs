//! Notification adapters backed by the worker registration's `showNotification`.

use push_contract::NotificationOptions;
use push_host::{NotificationDisplay, NotificationFuture};

use crate::bridge;

#[derive(Debug, Clone, Copy, Default)]
/// Notification display adapter over `self.registration.showNotification`.
pub struct WebNotificationDisplay;

impl NotificationDisplay for WebNotificationDisplay {
    fn show_notification<'a>(
        &'a self,
        title: &'a str,
        options: &'a NotificationOptions,
    ) -> NotificationFuture<'a, Result<(), String>> {
        Box::pin(async move { bridge::show_notification(title, options).await })
    }
}

#[cfg(target_arch = "wasm32")]
/// Shown notification delivered with `notificationclick`/`notificationclose` events.
#[derive(Debug, Clone)]
pub struct WebNotificationHandle {
    inner: web_sys::Notification,
}

#[cfg(target_arch = "wasm32")]
impl WebNotificationHandle {
    /// Wraps a platform notification.
    pub fn new(inner: web_sys::Notification) -> Self {
        Self { inner }
    }
}

#[cfg(target_arch = "wasm32")]
impl push_host::NotificationHandle for WebNotificationHandle {
    fn title(&self) -> String {
        self.inner.title()
    }

    fn data(&self) -> serde_json::Value {
        serde_wasm_bindgen::from_value(self.inner.data()).unwrap_or(serde_json::Value::Null)
    }

    fn close(&self) {
        self.inner.close();
    }
}
