//! Backend client for the push send endpoint.
//!
//! Holds the application secret, so it belongs in server processes only. Each call is a single
//! request with no retry; callers own their retry policy.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod client;
pub mod config;
pub mod error;

pub use client::{interpret_response, NotificationServerClient};
pub use config::ServerClientConfig;
pub use error::DispatchError;
