use std::rc::Rc;

use js_sys::Array;
use push_host::{ClientId, WorkerEvent};
use serde::Serialize;
use serde_json::Value;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::{future_to_promise, JsFuture};
use web_sys::{
    Client, ClientQueryOptions, ClientType, ExtendableEvent, MessageEvent, NotificationEvent,
    PushEvent, ServiceWorkerContainer, ServiceWorkerGlobalScope, WindowClient,
};

use super::*;
use crate::notifications::WebNotificationHandle;

fn worker_scope() -> Result<ServiceWorkerGlobalScope, String> {
    js_sys::global()
        .dyn_into::<ServiceWorkerGlobalScope>()
        .map_err(|_| "not running inside a service worker".to_string())
}

fn js_error(operation: &str, err: JsValue) -> String {
    let detail = err.as_string().unwrap_or_else(|| format!("{err:?}"));
    format!("{operation} failed: {detail}")
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, String> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(|e| e.to_string())
}

fn snapshot(client: &WindowClient) -> ClientWindow {
    ClientWindow {
        id: ClientId::new(client.id()),
        url: client.url(),
        focused: client.focused(),
    }
}

async fn lookup(client_id: &str) -> Result<Client, String> {
    let found = JsFuture::from(worker_scope()?.clients().get(client_id))
        .await
        .map_err(|e| js_error("clients.get", e))?;
    if found.is_undefined() || found.is_null() {
        return Err(format!("client not found: {client_id}"));
    }
    found
        .dyn_into::<Client>()
        .map_err(|_| format!("clients.get returned a non-client for {client_id}"))
}

pub async fn match_all_clients(include_uncontrolled: bool) -> Result<Vec<ClientWindow>, String> {
    let options = ClientQueryOptions::new();
    options.set_include_uncontrolled(include_uncontrolled);
    options.set_type(ClientType::Window);

    let found = JsFuture::from(worker_scope()?.clients().match_all_with_options(&options))
        .await
        .map_err(|e| js_error("clients.matchAll", e))?;
    let found: Array = found
        .dyn_into()
        .map_err(|_| "clients.matchAll resolved to a non-array".to_string())?;

    Ok(found
        .iter()
        .filter_map(|value| value.dyn_into::<WindowClient>().ok())
        .map(|client| snapshot(&client))
        .collect())
}

pub async fn post_to_client(client_id: &str, message: &RoutedMessage) -> Result<(), String> {
    let client = lookup(client_id).await?;
    let message = message.to_value()?;
    client
        .post_message(&to_js(&message)?)
        .map_err(|e| js_error("client.postMessage", e))
}

pub async fn focus_client(client_id: &str) -> Result<(), String> {
    let client: WindowClient = lookup(client_id)
        .await?
        .dyn_into()
        .map_err(|_| format!("client {client_id} is not a window"))?;
    let promise = client.focus().map_err(|e| js_error("client.focus", e))?;
    JsFuture::from(promise)
        .await
        .map(|_| ())
        .map_err(|e| js_error("client.focus", e))
}

pub async fn open_client_window(url: &str) -> Result<Option<ClientWindow>, String> {
    let opened = JsFuture::from(worker_scope()?.clients().open_window(url))
        .await
        .map_err(|e| js_error("clients.openWindow", e))?;
    Ok(opened
        .dyn_into::<WindowClient>()
        .ok()
        .map(|client| snapshot(&client)))
}

pub async fn claim_clients() -> Result<(), String> {
    JsFuture::from(worker_scope()?.clients().claim())
        .await
        .map(|_| ())
        .map_err(|e| js_error("clients.claim", e))
}

pub async fn show_notification(title: &str, options: &NotificationOptions) -> Result<(), String> {
    let options = to_js(options)?.unchecked_into::<web_sys::NotificationOptions>();
    let promise = worker_scope()?
        .registration()
        .show_notification_with_options(title, &options)
        .map_err(|e| js_error("registration.showNotification", e))?;
    JsFuture::from(promise)
        .await
        .map(|_| ())
        .map_err(|e| js_error("registration.showNotification", e))
}

fn skip_waiting(scope: &ServiceWorkerGlobalScope) {
    // Not awaited: it settles only after activation.
    if let Err(err) = scope.skip_waiting() {
        log::warn!("{}", js_error("skipWaiting", err));
    }
}

fn decode_event(kind: WorkerEventKind, event: &JsValue) -> Option<WorkerEvent> {
    match kind {
        WorkerEventKind::Install => Some(WorkerEvent::Install),
        WorkerEventKind::Activate => Some(WorkerEvent::Activate),
        WorkerEventKind::Push => {
            let push = event.dyn_ref::<PushEvent>()?;
            Some(WorkerEvent::Push {
                data: push.data().map(|data| data.text().into_bytes()),
            })
        }
        WorkerEventKind::NotificationClick => {
            let event = event.dyn_ref::<NotificationEvent>()?;
            let handle = WebNotificationHandle::new(event.notification());
            Some(WorkerEvent::NotificationClick(Rc::new(handle)))
        }
        WorkerEventKind::NotificationClose => {
            let event = event.dyn_ref::<NotificationEvent>()?;
            let handle = WebNotificationHandle::new(event.notification());
            Some(WorkerEvent::NotificationClose(Rc::new(handle)))
        }
    }
}

pub fn add_worker_listener(kind: WorkerEventKind, handler: WorkerHandler) -> Result<(), String> {
    let scope = worker_scope()?;
    let scope_for_install = scope.clone();

    let callback = Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
        if kind == WorkerEventKind::Install {
            skip_waiting(&scope_for_install);
        }
        let Some(worker_event) = decode_event(kind, &event) else {
            log::warn!("Ignoring {} event with unexpected shape", kind.as_str());
            return;
        };
        let task = handler(worker_event);
        let promise = future_to_promise(async move {
            task.await;
            Ok(JsValue::UNDEFINED)
        });
        match event.dyn_ref::<ExtendableEvent>() {
            Some(extendable) => {
                if let Err(err) = extendable.wait_until(&promise) {
                    log::warn!("{}", js_error("event.waitUntil", err));
                }
            }
            None => log::debug!("{} event is not extendable", kind.as_str()),
        }
    });

    scope
        .add_event_listener_with_callback(kind.as_str(), callback.as_ref().unchecked_ref())
        .map_err(|e| js_error("addEventListener", e))?;
    // Worker listeners live for the lifetime of the worker global.
    callback.forget();
    Ok(())
}

/// Page-side `message` listener attached to `navigator.serviceWorker`.
///
/// Dropping the binding detaches the listener.
pub struct MessageBinding {
    container: ServiceWorkerContainer,
    callback: Closure<dyn FnMut(MessageEvent)>,
}

impl std::fmt::Debug for MessageBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageBinding").finish_non_exhaustive()
    }
}

impl Drop for MessageBinding {
    fn drop(&mut self) {
        let _ = self
            .container
            .remove_event_listener_with_callback("message", self.callback.as_ref().unchecked_ref());
    }
}

pub fn bind_page_messages(messenger: ForegroundMessenger) -> Result<MessageBinding, String> {
    let window = web_sys::window().ok_or_else(|| "window is unavailable".to_string())?;
    let container = window.navigator().service_worker();

    let callback = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
        match serde_wasm_bindgen::from_value::<Value>(event.data()) {
            Ok(value) => {
                let delivered = messenger.dispatch_json(&value);
                log::debug!("Worker message delivered to {} listeners", delivered);
            }
            Err(err) => log::debug!("Ignoring undecodable worker message: {}", err),
        }
    });

    container
        .add_event_listener_with_callback("message", callback.as_ref().unchecked_ref())
        .map_err(|e| js_error("serviceWorker.addEventListener", e))?;

    Ok(MessageBinding {
        container,
        callback,
    })
}
