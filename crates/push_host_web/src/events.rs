//! Worker event registration against the Service Worker global scope.

use push_host::{WorkerEventDispatch, WorkerEventKind, WorkerHandler};

use crate::bridge;

#[derive(Debug, Clone, Copy, Default)]
/// Registers handlers as `self.addEventListener` callbacks.
///
/// Each callback converts the platform event, runs the handler, and passes the handler's future
/// to `event.waitUntil` so the worker stays alive until it settles. `install` callbacks also call
/// `skipWaiting()` so a new worker activates without waiting for old pages to close.
pub struct WebWorkerEventDispatch;

impl WorkerEventDispatch for WebWorkerEventDispatch {
    fn register(&self, kind: WorkerEventKind, handler: WorkerHandler) -> Result<(), String> {
        bridge::add_worker_listener(kind, handler)?;
        log::debug!("Bound {} listener", kind.as_str());
        Ok(())
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use std::rc::Rc;

    use push_host::{WorkerEvent, WorkerFuture};

    use super::*;

    #[test]
    fn native_build_cannot_register_listeners() {
        let handler: WorkerHandler =
            Rc::new(|_event: WorkerEvent| -> WorkerFuture { Box::pin(async {}) });

        let err = WebWorkerEventDispatch
            .register(WorkerEventKind::Push, handler)
            .expect_err("unsupported");

        assert!(err.contains("wasm32"));
    }
}
