//! Shared transport interop for the browser bridge.
//!
//! This module routes calls to target-specific implementations while preserving a uniform API
//! for the bridge.

use push_contract::{NotificationOptions, RoutedMessage};
use push_host::{ClientWindow, WorkerEventKind, WorkerHandler};
use push_router::ForegroundMessenger;

#[cfg(not(target_arch = "wasm32"))]
mod non_wasm;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(not(target_arch = "wasm32"))]
use non_wasm as imp;
#[cfg(target_arch = "wasm32")]
use wasm as imp;

pub use imp::MessageBinding;

pub async fn match_all_clients(include_uncontrolled: bool) -> Result<Vec<ClientWindow>, String> {
    imp::match_all_clients(include_uncontrolled).await
}

pub async fn post_to_client(client_id: &str, message: &RoutedMessage) -> Result<(), String> {
    imp::post_to_client(client_id, message).await
}

pub async fn focus_client(client_id: &str) -> Result<(), String> {
    imp::focus_client(client_id).await
}

pub async fn open_client_window(url: &str) -> Result<Option<ClientWindow>, String> {
    imp::open_client_window(url).await
}

pub async fn claim_clients() -> Result<(), String> {
    imp::claim_clients().await
}

pub async fn show_notification(title: &str, options: &NotificationOptions) -> Result<(), String> {
    imp::show_notification(title, options).await
}

pub fn add_worker_listener(kind: WorkerEventKind, handler: WorkerHandler) -> Result<(), String> {
    imp::add_worker_listener(kind, handler)
}

pub fn bind_page_messages(messenger: ForegroundMessenger) -> Result<MessageBinding, String> {
    imp::bind_page_messages(messenger)
}
