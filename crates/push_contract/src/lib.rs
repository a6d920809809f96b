//! Typed wire contracts shared across the push SDK.
//!
//! This crate is the API-first boundary between the background push router, the browser adapters,
//! page-side listeners, and the backend dispatcher. It owns the inbound push payload shape, the
//! cross-context [`RoutedMessage`] contract, notification display options, and the server send
//! envelope.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod message;
pub mod options;
pub mod payload;
pub mod server;

pub use message::{RoutedMessage, BACKGROUND_MESSAGE, FOREGROUND_MESSAGE, SILENT_MESSAGE};
pub use options::{
    retained_data, NotificationOptions, DEFAULT_BADGE, DEFAULT_CLICK_TARGET, DEFAULT_ICON,
    DEFAULT_TITLE, NOTIFICATION_TAG,
};
pub use payload::{InboundPush, JsonMap, NotificationPayload};
pub use server::{
    OutgoingNotification, SendRequest, SendResponse, SendTargets, DEFAULT_SERVER_BASE_URL,
    SEND_PATH,
};
