//! Notification display service contracts and no-op adapter.

use std::{future::Future, pin::Pin};

use push_contract::NotificationOptions;
use serde_json::Value;

/// Object-safe boxed future used by [`NotificationDisplay`].
pub type NotificationFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service for system-level notifications.
pub trait NotificationDisplay {
    /// Displays a notification and resolves once the host has accepted it.
    fn show_notification<'a>(
        &'a self,
        title: &'a str,
        options: &'a NotificationOptions,
    ) -> NotificationFuture<'a, Result<(), String>>;
}

/// A displayed notification as delivered with click and close events.
pub trait NotificationHandle: std::fmt::Debug {
    /// Title the notification was shown with.
    fn title(&self) -> String;

    /// Data retained on the notification when it was shown.
    fn data(&self) -> Value;

    /// Dismisses the notification.
    fn close(&self);
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op notification display for unsupported targets.
pub struct NoopNotificationDisplay;

impl NotificationDisplay for NoopNotificationDisplay {
    fn show_notification<'a>(
        &'a self,
        _title: &'a str,
        _options: &'a NotificationOptions,
    ) -> NotificationFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}
