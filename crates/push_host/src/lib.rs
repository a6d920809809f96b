//! Typed host-service contracts for the push background context.
//!
//! This crate is the API-first boundary between the push router and the platform it runs on. It
//! exposes object-safe service traits for context enumeration/messaging, notification display,
//! and event registration, plus no-op adapters for unsupported targets and in-memory adapters for
//! headless hosts and tests. Concrete browser adapters live in `push_host_web`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod clients;
pub mod events;
pub mod notifications;

pub use clients::{
    ClientId, ClientRegistry, ClientWindow, ClientsFuture, MemoryClientRegistry,
    NoopClientRegistry,
};
pub use events::{
    MemoryEventDispatch, WorkerEvent, WorkerEventDispatch, WorkerEventKind, WorkerFuture,
    WorkerHandler,
};
pub use notifications::{
    MemoryNotification, MemoryNotificationDisplay, NoopNotificationDisplay, NotificationDisplay,
    NotificationFuture, NotificationHandle, ShownNotification,
};
