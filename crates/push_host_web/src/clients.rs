//! Window-context adapter backed by the Service Worker Clients API.

use push_contract::RoutedMessage;
use push_host::{ClientId, ClientRegistry, ClientWindow, ClientsFuture};

use crate::bridge;

#[derive(Debug, Clone, Copy, Default)]
/// Client registry adapter over `self.clients` in the worker global scope.
pub struct WebClientRegistry;

impl ClientRegistry for WebClientRegistry {
    fn match_all<'a>(
        &'a self,
        include_uncontrolled: bool,
    ) -> ClientsFuture<'a, Result<Vec<ClientWindow>, String>> {
        Box::pin(async move { bridge::match_all_clients(include_uncontrolled).await })
    }

    fn post_message<'a>(
        &'a self,
        client: &'a ClientId,
        message: &'a RoutedMessage,
    ) -> ClientsFuture<'a, Result<(), String>> {
        Box::pin(async move { bridge::post_to_client(client.as_str(), message).await })
    }

    fn focus<'a>(&'a self, client: &'a ClientId) -> ClientsFuture<'a, Result<(), String>> {
        Box::pin(async move { bridge::focus_client(client.as_str()).await })
    }

    fn open_window<'a>(
        &'a self,
        url: &'a str,
    ) -> ClientsFuture<'a, Result<Option<ClientWindow>, String>> {
        Box::pin(async move { bridge::open_client_window(url).await })
    }

    fn claim<'a>(&'a self) -> ClientsFuture<'a, Result<(), String>> {
        Box::pin(async move { bridge::claim_clients().await })
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use futures::executor::block_on;
    use push_contract::{JsonMap, RoutedMessage};

    use super::*;

    #[test]
    fn native_build_sees_no_contexts_and_opens_nothing() {
        let registry = WebClientRegistry;

        assert!(block_on(registry.match_all(true)).expect("match").is_empty());
        assert_eq!(block_on(registry.open_window("/")).expect("open"), None);
        assert!(block_on(registry.claim()).is_ok());
    }

    #[test]
    fn native_build_rejects_messaging() {
        let registry = WebClientRegistry;
        let id = ClientId::new("c-1");
        let message = RoutedMessage::Silent {
            data: JsonMap::new(),
        };

        let err = block_on(registry.post_message(&id, &message)).expect_err("unsupported");
        assert!(err.contains("wasm32"));
        assert!(block_on(registry.focus(&id)).is_err());
    }
}
