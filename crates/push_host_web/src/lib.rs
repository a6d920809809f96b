//! Service Worker (`wasm32`) implementations of [`push_host`] service contracts.
//!
//! This crate is the concrete browser-side wiring layer for context enumeration/messaging,
//! notification display, worker event registration, and the page-side message listener. The
//! [`worker`] module exports the entrypoint the service-worker script calls.
//!
//! All JS interop lives under `bridge::interop`, split into a `wasm32` implementation and a
//! non-wasm shim so the crate builds and tests on native targets.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod bridge;
pub mod clients;
pub mod events;
pub mod listener;
pub mod notifications;
pub mod worker;

pub use clients::WebClientRegistry;
pub use events::WebWorkerEventDispatch;
pub use listener::WebMessageListener;
#[cfg(target_arch = "wasm32")]
pub use notifications::WebNotificationHandle;
pub use notifications::WebNotificationDisplay;
pub use worker::{build_push_worker, install};
