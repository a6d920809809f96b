//! Page-side delivery of worker messages to foreground listeners.

use push_router::ForegroundMessenger;

use crate::bridge::{self, MessageBinding};

/// Forwards `message` events from `navigator.serviceWorker` into a [`ForegroundMessenger`].
///
/// Messages that are not routed push messages are ignored. Dropping the listener detaches it
/// from the page.
#[derive(Debug)]
pub struct WebMessageListener {
    messenger: ForegroundMessenger,
    _binding: MessageBinding,
}

impl WebMessageListener {
    /// Attaches to the page's service worker container.
    ///
    /// Fails outside a window context or when the page cannot reach `navigator.serviceWorker`.
    pub fn attach(messenger: ForegroundMessenger) -> Result<Self, String> {
        let binding = bridge::bind_page_messages(messenger.clone())?;
        Ok(Self {
            messenger,
            _binding: binding,
        })
    }

    /// Messenger receiving the forwarded messages.
    pub fn messenger(&self) -> &ForegroundMessenger {
        &self.messenger
    }
}
