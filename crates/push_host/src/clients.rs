//! Open-context enumeration and messaging contracts.

use std::{cell::RefCell, collections::HashSet, future::Future, pin::Pin, rc::Rc};

use push_contract::RoutedMessage;

/// Object-safe boxed future used by [`ClientRegistry`].
pub type ClientsFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host-assigned identifier of an open application context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(String);

impl ClientId {
    /// Wraps a host identifier.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the string form of the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot of an open window context at enumeration time.
///
/// The router only keeps snapshots and ids; window lifetime belongs to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientWindow {
    /// Host identifier used to address the context.
    pub id: ClientId,
    /// Current URL of the context.
    pub url: String,
    /// Whether the context had input focus when enumerated.
    pub focused: bool,
}

/// Host service for enumerating, messaging, focusing, and opening window contexts.
pub trait ClientRegistry {
    /// Lists open window contexts in host enumeration order.
    ///
    /// With `include_uncontrolled`, contexts not yet controlled by the background context are
    /// included.
    fn match_all<'a>(
        &'a self,
        include_uncontrolled: bool,
    ) -> ClientsFuture<'a, Result<Vec<ClientWindow>, String>>;

    /// Posts a routed message to one context.
    fn post_message<'a>(
        &'a self,
        client: &'a ClientId,
        message: &'a RoutedMessage,
    ) -> ClientsFuture<'a, Result<(), String>>;

    /// Gives input focus to one context.
    fn focus<'a>(&'a self, client: &'a ClientId) -> ClientsFuture<'a, Result<(), String>>;

    /// Opens a new window context at `url` and resolves once it is ready.
    ///
    /// Resolves to `None` when the host declines to open a context.
    fn open_window<'a>(
        &'a self,
        url: &'a str,
    ) -> ClientsFuture<'a, Result<Option<ClientWindow>, String>>;

    /// Takes control of every open context in scope.
    fn claim<'a>(&'a self) -> ClientsFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op registry for unsupported targets: no contexts, nothing opens.
pub struct NoopClientRegistry;

impl ClientRegistry for NoopClientRegistry {
    fn match_all<'a>(
        &'a self,
        _include_uncontrolled: bool,
    ) -> ClientsFuture<'a, Result<Vec<ClientWindow>, String>> {
        Box::pin(async { Ok(Vec::new()) })
    }

    fn post_message<'a>(
        &'a self,
        _client: &'a ClientId,
        _message: &'a RoutedMessage,
    ) -> ClientsFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn focus<'a>(&'a self, _client: &'a ClientId) -> ClientsFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn open_window<'a>(
        &'a self,
        _url: &'a str,
    ) -> ClientsFuture<'a, Result<Option<ClientWindow>, String>> {
        Box::pin(async { Ok(None) })
    }

    fn claim<'a>(&'a self) -> ClientsFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Clone)]
struct MemoryClient {
    window: ClientWindow,
    controlled: bool,
    inbox: Vec<RoutedMessage>,
}

#[derive(Debug, Default)]
struct MemoryClientsState {
    clients: Vec<MemoryClient>,
    next_id: u64,
    deny_open_window: bool,
    fail_match_all: Option<String>,
    failing_posts: HashSet<ClientId>,
    opened_urls: Vec<String>,
    focus_calls: Vec<ClientId>,
    claims: usize,
}

impl MemoryClientsState {
    fn insert(&mut self, url: &str, focused: bool, controlled: bool) -> ClientWindow {
        self.next_id += 1;
        let window = ClientWindow {
            id: ClientId::new(format!("client-{}", self.next_id)),
            url: url.to_string(),
            focused,
        };
        self.clients.push(MemoryClient {
            window: window.clone(),
            controlled,
            inbox: Vec::new(),
        });
        window
    }

    fn client_mut(&mut self, id: &ClientId) -> Result<&mut MemoryClient, String> {
        self.clients
            .iter_mut()
            .find(|client| &client.window.id == id)
            .ok_or_else(|| format!("client not found: {id}"))
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory registry that records every delivery, focus, and opened window.
///
/// Clones share state, so a test can hand one clone to the router and inspect another.
pub struct MemoryClientRegistry {
    inner: Rc<RefCell<MemoryClientsState>>,
}

impl MemoryClientRegistry {
    /// Adds a controlled window context and returns its id.
    pub fn add_client(&self, url: &str, focused: bool) -> ClientId {
        self.inner.borrow_mut().insert(url, focused, true).id
    }

    /// Adds a window context that is not yet controlled by the background context.
    pub fn add_uncontrolled_client(&self, url: &str, focused: bool) -> ClientId {
        self.inner.borrow_mut().insert(url, focused, false).id
    }

    /// Makes [`ClientRegistry::open_window`] resolve to `None`.
    pub fn set_deny_open_window(&self, deny: bool) {
        self.inner.borrow_mut().deny_open_window = deny;
    }

    /// Makes [`ClientRegistry::match_all`] fail with `reason`.
    pub fn fail_match_all(&self, reason: &str) {
        self.inner.borrow_mut().fail_match_all = Some(reason.to_string());
    }

    /// Makes [`ClientRegistry::post_message`] fail for one context.
    pub fn fail_posts_to(&self, client: &ClientId) {
        self.inner.borrow_mut().failing_posts.insert(client.clone());
    }

    /// Returns the messages delivered to one context, in delivery order.
    pub fn messages_for(&self, client: &ClientId) -> Vec<RoutedMessage> {
        self.inner
            .borrow()
            .clients
            .iter()
            .find(|c| &c.window.id == client)
            .map(|c| c.inbox.clone())
            .unwrap_or_default()
    }

    /// Returns the total number of delivered messages across all contexts.
    pub fn delivered_count(&self) -> usize {
        self.inner
            .borrow()
            .clients
            .iter()
            .map(|c| c.inbox.len())
            .sum()
    }

    /// Returns the URLs passed to successful [`ClientRegistry::open_window`] calls.
    pub fn opened_urls(&self) -> Vec<String> {
        self.inner.borrow().opened_urls.clone()
    }

    /// Returns the contexts passed to [`ClientRegistry::focus`], in call order.
    pub fn focus_calls(&self) -> Vec<ClientId> {
        self.inner.borrow().focus_calls.clone()
    }

    /// Returns how many times [`ClientRegistry::claim`] ran.
    pub fn claim_count(&self) -> usize {
        self.inner.borrow().claims
    }

    /// Returns whether a context is currently controlled.
    pub fn is_controlled(&self, client: &ClientId) -> bool {
        self.inner
            .borrow()
            .clients
            .iter()
            .any(|c| &c.window.id == client && c.controlled)
    }
}

impl ClientRegistry for MemoryClientRegistry {
    fn match_all<'a>(
        &'a self,
        include_uncontrolled: bool,
    ) -> ClientsFuture<'a, Result<Vec<ClientWindow>, String>> {
        Box::pin(async move {
            let state = self.inner.borrow();
            if let Some(reason) = &state.fail_match_all {
                return Err(reason.clone());
            }
            Ok(state
                .clients
                .iter()
                .filter(|c| include_uncontrolled || c.controlled)
                .map(|c| c.window.clone())
                .collect())
        })
    }

    fn post_message<'a>(
        &'a self,
        client: &'a ClientId,
        message: &'a RoutedMessage,
    ) -> ClientsFuture<'a, Result<(), String>> {
        Box::pin(async move {
            let mut state = self.inner.borrow_mut();
            if state.failing_posts.contains(client) {
                return Err(format!("postMessage rejected by {client}"));
            }
            state.client_mut(client)?.inbox.push(message.clone());
            Ok(())
        })
    }

    fn focus<'a>(&'a self, client: &'a ClientId) -> ClientsFuture<'a, Result<(), String>> {
        Box::pin(async move {
            let mut state = self.inner.borrow_mut();
            state.client_mut(client)?;
            for c in &mut state.clients {
                c.window.focused = &c.window.id == client;
            }
            state.focus_calls.push(client.clone());
            Ok(())
        })
    }

    fn open_window<'a>(
        &'a self,
        url: &'a str,
    ) -> ClientsFuture<'a, Result<Option<ClientWindow>, String>> {
        Box::pin(async move {
            let mut state = self.inner.borrow_mut();
            if state.deny_open_window {
                return Ok(None);
            }
            state.opened_urls.push(url.to_string());
            Ok(Some(state.insert(url, true, true)))
        })
    }

    fn claim<'a>(&'a self) -> ClientsFuture<'a, Result<(), String>> {
        Box::pin(async move {
            let mut state = self.inner.borrow_mut();
            for c in &mut state.clients {
                c.controlled = true;
            }
            state.claims += 1;
            Ok(())
        })
    }
}
