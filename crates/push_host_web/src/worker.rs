//! Service-worker entrypoint wiring the router to the web adapters.
//!
//! The worker script loads the wasm bundle and calls `installPushWorker(configJson?)` once at
//! top level, before any event fires:
//!
//! ```js
//! importScripts("./push_host_web.js");
//! wasm_bindgen("./push_host_web_bg.wasm").then(() => wasm_bindgen.installPushWorker());
//! ```

use std::rc::Rc;

use push_router::{PushWorker, RouterConfig};

use crate::{WebClientRegistry, WebNotificationDisplay, WebWorkerEventDispatch};

/// Builds a router over the Clients API and `registration.showNotification`.
pub fn build_push_worker(config: RouterConfig) -> Rc<PushWorker> {
    Rc::new(PushWorker::new(
        Rc::new(WebClientRegistry),
        Rc::new(WebNotificationDisplay),
        config,
    ))
}

/// Builds the router and registers its handlers on the worker global scope.
///
/// `config_json` is an optional [`RouterConfig`] document; `None` keeps the defaults.
pub fn install(config_json: Option<&str>) -> Result<Rc<PushWorker>, String> {
    let config = match config_json {
        Some(raw) => RouterConfig::from_json(raw)?,
        None => RouterConfig::default(),
    };
    let worker = build_push_worker(config);
    worker.register(&WebWorkerEventDispatch)?;
    log::info!("Push worker handlers registered");
    Ok(worker)
}

#[cfg(target_arch = "wasm32")]
/// JS entrypoint: installs the push worker in the current service-worker global.
#[wasm_bindgen::prelude::wasm_bindgen(js_name = installPushWorker)]
pub fn install_push_worker(config_json: Option<String>) -> Result<(), wasm_bindgen::JsValue> {
    console_error_panic_hook::set_once();
    install(config_json.as_deref())
        .map(|_| ())
        .map_err(|err| wasm_bindgen::JsValue::from_str(&err))
}
