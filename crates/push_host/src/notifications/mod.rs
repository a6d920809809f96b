//! System notification display contracts and adapters.

mod memory;
mod service;

pub use memory::{MemoryNotification, MemoryNotificationDisplay, ShownNotification};
pub use service::{
    NoopNotificationDisplay, NotificationDisplay, NotificationFuture, NotificationHandle,
};
