//! Browser capability bridge for `push_host_web` service adapters.
//!
//! Adapters call these functions instead of touching `web_sys` directly, which keeps them
//! identical across wasm and non-wasm builds.

mod interop;

use push_contract::{NotificationOptions, RoutedMessage};
use push_host::{ClientWindow, WorkerEventKind, WorkerHandler};
use push_router::ForegroundMessenger;

pub use interop::MessageBinding;

pub async fn match_all_clients(include_uncontrolled: bool) -> Result<Vec<ClientWindow>, String> {
    interop::match_all_clients(include_uncontrolled).await
}

pub async fn post_to_client(client_id: &str, message: &RoutedMessage) -> Result<(), String> {
    interop::post_to_client(client_id, message).await
}

pub async fn focus_client(client_id: &str) -> Result<(), String> {
    interop::focus_client(client_id).await
}

pub async fn open_client_window(url: &str) -> Result<Option<ClientWindow>, String> {
    interop::open_client_window(url).await
}

pub async fn claim_clients() -> Result<(), String> {
    interop::claim_clients().await
}

pub async fn show_notification(title: &str, options: &NotificationOptions) -> Result<(), String> {
    interop::show_notification(title, options).await
}

pub fn add_worker_listener(kind: WorkerEventKind, handler: WorkerHandler) -> Result<(), String> {
    interop::add_worker_listener(kind, handler)
}

pub fn bind_page_messages(messenger: ForegroundMessenger) -> Result<MessageBinding, String> {
    interop::bind_page_messages(messenger)
}
