//! In-memory notification adapters for headless hosts and tests.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use push_contract::NotificationOptions;
use serde_json::Value;

use super::{NotificationDisplay, NotificationFuture, NotificationHandle};

/// A notification recorded by [`MemoryNotificationDisplay`].
#[derive(Debug, Clone, PartialEq)]
pub struct ShownNotification {
    /// Title passed to the display service.
    pub title: String,
    /// Options passed to the display service.
    pub options: NotificationOptions,
}

#[derive(Debug, Clone, Default)]
/// Notification display that records every shown notification.
pub struct MemoryNotificationDisplay {
    shown: Rc<RefCell<Vec<ShownNotification>>>,
    fail_with: Rc<RefCell<Option<String>>>,
}

impl MemoryNotificationDisplay {
    /// Makes [`NotificationDisplay::show_notification`] fail with `reason`.
    pub fn fail_show(&self, reason: &str) {
        *self.fail_with.borrow_mut() = Some(reason.to_string());
    }

    /// Returns every notification shown so far.
    pub fn shown(&self) -> Vec<ShownNotification> {
        self.shown.borrow().clone()
    }

    /// Returns a clickable handle for the `index`-th shown notification.
    pub fn handle(&self, index: usize) -> Option<MemoryNotification> {
        self.shown
            .borrow()
            .get(index)
            .map(|shown| {
                MemoryNotification::new(&shown.title, Value::Object(shown.options.data.clone()))
            })
    }
}

impl NotificationDisplay for MemoryNotificationDisplay {
    fn show_notification<'a>(
        &'a self,
        title: &'a str,
        options: &'a NotificationOptions,
    ) -> NotificationFuture<'a, Result<(), String>> {
        Box::pin(async move {
            if let Some(reason) = self.fail_with.borrow().clone() {
                return Err(reason);
            }
            self.shown.borrow_mut().push(ShownNotification {
                title: title.to_string(),
                options: options.clone(),
            });
            Ok(())
        })
    }
}

#[derive(Debug, Clone)]
/// Notification handle that tracks whether it was closed.
pub struct MemoryNotification {
    title: String,
    data: Value,
    closed: Rc<Cell<bool>>,
}

impl MemoryNotification {
    /// Creates a handle with the given retained data.
    pub fn new(title: &str, data: Value) -> Self {
        Self {
            title: title.to_string(),
            data,
            closed: Rc::new(Cell::new(false)),
        }
    }

    /// Returns whether [`NotificationHandle::close`] was called on this handle or a clone.
    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }
}

impl NotificationHandle for MemoryNotification {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn data(&self) -> Value {
        self.data.clone()
    }

    fn close(&self) {
        self.closed.set(true);
    }
}
