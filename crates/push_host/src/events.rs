//! Background-context event model and handler registration.
//!
//! Handlers are registered against an injected [`WorkerEventDispatch`] instead of ambient global
//! listeners. The host keeps the background task alive until the future returned by a handler
//! resolves.

use std::{cell::RefCell, collections::HashMap, future::Future, pin::Pin, rc::Rc};

use crate::NotificationHandle;

/// Future returned by a [`WorkerHandler`]; the host waits on it before finishing the event.
pub type WorkerFuture = Pin<Box<dyn Future<Output = ()> + 'static>>;

/// Handler invoked once per dispatched event.
pub type WorkerHandler = Rc<dyn Fn(WorkerEvent) -> WorkerFuture>;

/// Event categories a handler can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerEventKind {
    /// Background context installed.
    Install,
    /// Background context activated.
    Activate,
    /// Push message received.
    Push,
    /// User activated a shown notification.
    NotificationClick,
    /// User dismissed a shown notification.
    NotificationClose,
}

impl WorkerEventKind {
    /// Every kind, in registration order.
    pub const ALL: [Self; 5] = [
        Self::Install,
        Self::Activate,
        Self::Push,
        Self::NotificationClick,
        Self::NotificationClose,
    ];

    /// Returns the platform event name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::Activate => "activate",
            Self::Push => "push",
            Self::NotificationClick => "notificationclick",
            Self::NotificationClose => "notificationclose",
        }
    }
}

/// Event delivered to the background context.
#[derive(Debug, Clone)]
pub enum WorkerEvent {
    /// Background context installed.
    Install,
    /// Background context activated.
    Activate,
    /// Push message with its raw body, if any.
    Push {
        /// Raw push body.
        data: Option<Vec<u8>>,
    },
    /// A shown notification was activated.
    NotificationClick(Rc<dyn NotificationHandle>),
    /// A shown notification was dismissed.
    NotificationClose(Rc<dyn NotificationHandle>),
}

impl WorkerEvent {
    /// Returns the category of this event.
    pub fn kind(&self) -> WorkerEventKind {
        match self {
            Self::Install => WorkerEventKind::Install,
            Self::Activate => WorkerEventKind::Activate,
            Self::Push { .. } => WorkerEventKind::Push,
            Self::NotificationClick(_) => WorkerEventKind::NotificationClick,
            Self::NotificationClose(_) => WorkerEventKind::NotificationClose,
        }
    }
}

/// Host event source that handlers are registered against.
pub trait WorkerEventDispatch {
    /// Registers `handler` for every event of `kind`.
    fn register(&self, kind: WorkerEventKind, handler: WorkerHandler) -> Result<(), String>;
}

#[derive(Clone, Default)]
/// In-memory event source: stores one handler per kind and dispatches on demand.
pub struct MemoryEventDispatch {
    handlers: Rc<RefCell<HashMap<WorkerEventKind, WorkerHandler>>>,
}

impl std::fmt::Debug for MemoryEventDispatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryEventDispatch")
            .field("registered", &self.handlers.borrow().keys().collect::<Vec<_>>())
            .finish()
    }
}

impl MemoryEventDispatch {
    /// Returns whether a handler is registered for `kind`.
    pub fn is_registered(&self, kind: WorkerEventKind) -> bool {
        self.handlers.borrow().contains_key(&kind)
    }

    /// Invokes the handler for the event's kind and returns the future the host would wait on.
    ///
    /// Returns `None` when nothing is registered for that kind.
    pub fn dispatch(&self, event: WorkerEvent) -> Option<WorkerFuture> {
        let handler = self.handlers.borrow().get(&event.kind()).cloned()?;
        Some(handler(event))
    }
}

impl WorkerEventDispatch for MemoryEventDispatch {
    fn register(&self, kind: WorkerEventKind, handler: WorkerHandler) -> Result<(), String> {
        self.handlers.borrow_mut().insert(kind, handler);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use futures::executor::block_on;

    use super::*;

    #[test]
    fn dispatch_runs_registered_handler_only() {
        let dispatch = MemoryEventDispatch::default();
        let seen = Rc::new(Cell::new(0));
        let counter = Rc::clone(&seen);
        dispatch
            .register(
                WorkerEventKind::Push,
                Rc::new(move |event: WorkerEvent| -> WorkerFuture {
                    let counter = Rc::clone(&counter);
                    Box::pin(async move {
                        if let WorkerEvent::Push { data } = event {
                            counter.set(counter.get() + data.map_or(0, |d| d.len()));
                        }
                    })
                }),
            )
            .expect("register");

        assert!(dispatch.is_registered(WorkerEventKind::Push));
        assert!(dispatch.dispatch(WorkerEvent::Install).is_none());

        let future = dispatch
            .dispatch(WorkerEvent::Push {
                data: Some(b"abc".to_vec()),
            })
            .expect("handler");
        assert_eq!(seen.get(), 0);
        block_on(future);
        assert_eq!(seen.get(), 3);
    }

    #[test]
    fn event_kinds_use_platform_names() {
        let names: Vec<_> = WorkerEventKind::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "install",
                "activate",
                "push",
                "notificationclick",
                "notificationclose"
            ]
        );
    }
}
