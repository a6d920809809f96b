use super::*;

fn unsupported() -> String {
    "Service Worker APIs are only available when compiled for wasm32".to_string()
}

/// Placeholder for the page-side `message` listener binding.
#[derive(Debug)]
pub struct MessageBinding;

pub async fn match_all_clients(_include_uncontrolled: bool) -> Result<Vec<ClientWindow>, String> {
    Ok(Vec::new())
}

pub async fn post_to_client(_client_id: &str, _message: &RoutedMessage) -> Result<(), String> {
    Err(unsupported())
}

pub async fn focus_client(_client_id: &str) -> Result<(), String> {
    Err(unsupported())
}

pub async fn open_client_window(_url: &str) -> Result<Option<ClientWindow>, String> {
    Ok(None)
}

pub async fn claim_clients() -> Result<(), String> {
    Ok(())
}

pub async fn show_notification(_title: &str, _options: &NotificationOptions) -> Result<(), String> {
    Err(unsupported())
}

pub fn add_worker_listener(_kind: WorkerEventKind, _handler: WorkerHandler) -> Result<(), String> {
    Err(unsupported())
}

pub fn bind_page_messages(_messenger: ForegroundMessenger) -> Result<MessageBinding, String> {
    Err(unsupported())
}
