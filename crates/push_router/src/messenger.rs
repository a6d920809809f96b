//! Page-side dispatch of routed messages to application callbacks.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use push_contract::{JsonMap, NotificationPayload, RoutedMessage};
use serde_json::Value;

/// Handle returned by a subscription, used to remove it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type PayloadCallback = Rc<dyn Fn(&NotificationPayload)>;
type DataCallback = Rc<dyn Fn(&JsonMap)>;

#[derive(Clone)]
enum Listener {
    Foreground(PayloadCallback),
    Background(DataCallback),
    Silent(DataCallback),
}

/// Fans routed messages out to callbacks registered by the application.
///
/// Messages are handled as they arrive; nothing is buffered for callbacks registered later.
#[derive(Clone, Default)]
pub struct ForegroundMessenger {
    listeners: Rc<RefCell<Vec<(ListenerId, Listener)>>>,
    next_id: Rc<Cell<u64>>,
}

impl std::fmt::Debug for ForegroundMessenger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForegroundMessenger")
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}

impl ForegroundMessenger {
    /// Creates a messenger with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `callback` for every push received while the application had focus.
    pub fn on_message(&self, callback: impl Fn(&NotificationPayload) + 'static) -> ListenerId {
        self.insert(Listener::Foreground(Rc::new(callback)))
    }

    /// Runs `callback` with the retained data of every clicked notification.
    pub fn on_background_message(&self, callback: impl Fn(&JsonMap) + 'static) -> ListenerId {
        self.insert(Listener::Background(Rc::new(callback)))
    }

    /// Runs `callback` with the data of every silent push.
    pub fn on_silent_message(&self, callback: impl Fn(&JsonMap) + 'static) -> ListenerId {
        self.insert(Listener::Silent(Rc::new(callback)))
    }

    /// Removes a listener. Returns `false` when it was already gone.
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    /// Returns the number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Delivers a message to every matching listener and returns how many ran.
    pub fn dispatch(&self, message: &RoutedMessage) -> usize {
        // Snapshot first so callbacks may subscribe or unsubscribe while running.
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        let mut ran = 0;
        for listener in listeners {
            match (&listener, message) {
                (Listener::Foreground(callback), RoutedMessage::Foreground { payload }) => {
                    callback(payload);
                }
                (Listener::Background(callback), RoutedMessage::Background { payload }) => {
                    callback(payload);
                }
                (Listener::Silent(callback), RoutedMessage::Silent { data }) => callback(data),
                _ => continue,
            }
            ran += 1;
        }
        log::debug!("Dispatched {} to {} listeners", message.kind(), ran);
        ran
    }

    /// Decodes a raw posted value and dispatches it. Values that are not SDK messages are ignored.
    pub fn dispatch_json(&self, value: &Value) -> usize {
        match RoutedMessage::from_value(value) {
            Some(message) => self.dispatch(&message),
            None => 0,
        }
    }

    fn insert(&self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, listener));
        id
    }
}
