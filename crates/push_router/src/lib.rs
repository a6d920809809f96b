//! Push and notification-click routing for the background context.
//!
//! [`PushWorker`] decides where an inbound push goes (every context for silent pushes, the focused
//! context, or a system notification) and where a notification click lands (an open context at
//! the click target, or a newly opened one). All platform access goes through the
//! [`push_host`] service traits, so the same routing runs in the browser and in tests.
//!
//! [`ForegroundMessenger`] is the page-side counterpart that hands routed messages to application
//! callbacks.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod messenger;
pub mod worker;

pub use config::RouterConfig;
pub use messenger::{ForegroundMessenger, ListenerId};
pub use worker::{ClickOutcome, PushOutcome, PushWorker};
