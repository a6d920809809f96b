//! Background-context push and click routing.

use std::rc::Rc;

use push_contract::{
    retained_data, InboundPush, JsonMap, NotificationOptions, NotificationPayload, RoutedMessage,
};
use push_host::{
    ClientId, ClientRegistry, ClientWindow, NotificationDisplay, NotificationHandle, WorkerEvent,
    WorkerEventDispatch, WorkerEventKind, WorkerFuture,
};
use serde_json::Value;

use crate::RouterConfig;

/// Route taken by an inbound push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    /// Silent push fanned out; `delivered` counts successful posts.
    Silent {
        /// Contexts that accepted the message.
        delivered: usize,
    },
    /// Visible push forwarded to the focused context.
    Foreground {
        /// The focused context.
        client: ClientId,
    },
    /// Visible push shown as a system notification.
    Displayed {
        /// Title the notification was shown with.
        title: String,
    },
    /// The host rejected the final delivery step.
    Dropped {
        /// Host error.
        reason: String,
    },
}

/// Route taken by a notification click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// An open context already showed the click target; it was messaged and focused.
    FocusedExisting {
        /// The matching context.
        client: ClientId,
    },
    /// A new context was opened at the click target and messaged once ready.
    OpenedNew {
        /// The new context.
        client: ClientId,
    },
    /// The host declined to open a context; nothing was delivered.
    OpenDenied,
}

/// Routes background-context events through injected host services.
///
/// The worker holds no mutable state; concurrent events may interleave freely.
pub struct PushWorker {
    clients: Rc<dyn ClientRegistry>,
    notifications: Rc<dyn NotificationDisplay>,
    config: RouterConfig,
}

impl std::fmt::Debug for PushWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushWorker")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PushWorker {
    /// Creates a worker over the given host services.
    pub fn new(
        clients: Rc<dyn ClientRegistry>,
        notifications: Rc<dyn NotificationDisplay>,
        config: RouterConfig,
    ) -> Self {
        Self {
            clients,
            notifications,
            config,
        }
    }

    /// Returns the display defaults in use.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Registers this worker's handlers for every event kind.
    ///
    /// # Errors
    ///
    /// Returns the first registration error reported by the host.
    pub fn register(self: &Rc<Self>, dispatch: &dyn WorkerEventDispatch) -> Result<(), String> {
        for kind in WorkerEventKind::ALL {
            let worker = Rc::clone(self);
            dispatch.register(
                kind,
                Rc::new(move |event: WorkerEvent| -> WorkerFuture { worker.handle_event(event) }),
            )?;
            log::debug!("Registered {} handler", kind.as_str());
        }
        Ok(())
    }

    /// Handles one event; the returned future completes once every side effect has happened.
    pub fn handle_event(self: &Rc<Self>, event: WorkerEvent) -> WorkerFuture {
        let worker = Rc::clone(self);
        Box::pin(async move {
            match event {
                WorkerEvent::Install => worker.handle_install(),
                WorkerEvent::Activate => worker.handle_activate().await,
                WorkerEvent::Push { data } => {
                    worker.handle_push(data.as_deref()).await;
                }
                WorkerEvent::NotificationClick(notification) => {
                    worker.handle_notification_click(notification.as_ref()).await;
                }
                WorkerEvent::NotificationClose(notification) => {
                    worker.handle_notification_close(notification.as_ref());
                }
            }
        })
    }

    /// Decodes a raw push body and routes it.
    pub async fn handle_push(&self, data: Option<&[u8]>) -> PushOutcome {
        self.route(InboundPush::from_bytes(data)).await
    }

    /// Routes an already-validated push.
    pub async fn route(&self, push: InboundPush) -> PushOutcome {
        match push {
            InboundPush::Silent { data } => self.fan_out_silent(data).await,
            InboundPush::Visible(payload) => self.route_visible(payload).await,
        }
    }

    async fn fan_out_silent(&self, data: JsonMap) -> PushOutcome {
        let clients = self.open_clients().await;
        log::debug!("Silent push for {} open contexts", clients.len());

        let message = RoutedMessage::Silent { data };
        let mut delivered = 0;
        for client in &clients {
            match self.clients.post_message(&client.id, &message).await {
                Ok(()) => delivered += 1,
                Err(err) => log::warn!("Silent message to {} failed: {}", client.id, err),
            }
        }
        PushOutcome::Silent { delivered }
    }

    async fn route_visible(&self, payload: NotificationPayload) -> PushOutcome {
        let clients = self.open_clients().await;

        if let Some(focused) = clients.into_iter().find(|client| client.focused) {
            log::debug!("Context {} is focused, forwarding foreground message", focused.id);
            let message = RoutedMessage::Foreground { payload };
            return match self.clients.post_message(&focused.id, &message).await {
                Ok(()) => PushOutcome::Foreground { client: focused.id },
                Err(err) => {
                    log::warn!("Foreground message to {} failed: {}", focused.id, err);
                    PushOutcome::Dropped { reason: err }
                }
            };
        }

        let title = payload.title_or(&self.config.default_title).to_string();
        let options = self.notification_options(&payload);
        log::debug!("No focused context, showing notification {:?}", title);
        match self.notifications.show_notification(&title, &options).await {
            Ok(()) => PushOutcome::Displayed { title },
            Err(err) => {
                log::warn!("Showing notification failed: {}", err);
                PushOutcome::Dropped { reason: err }
            }
        }
    }

    /// Builds the system notification options for a visible payload.
    pub fn notification_options(&self, payload: &NotificationPayload) -> NotificationOptions {
        NotificationOptions {
            body: payload.body.clone().unwrap_or_default(),
            icon: payload
                .icon
                .clone()
                .filter(|icon| !icon.is_empty())
                .unwrap_or_else(|| self.config.fallback_icon.clone()),
            image: payload.image.clone(),
            badge: self.config.badge.clone(),
            data: retained_data(payload, &self.config.default_click_target),
            tag: self.config.tag.clone(),
            require_interaction: self.config.require_interaction,
        }
    }

    /// Closes a clicked notification and brings its click target to the user.
    pub async fn handle_notification_click(
        &self,
        notification: &dyn NotificationHandle,
    ) -> ClickOutcome {
        notification.close();

        let payload = match notification.data() {
            Value::Object(data) => data,
            _ => JsonMap::new(),
        };
        let target = payload
            .get("click_action")
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .unwrap_or(self.config.default_click_target.as_str())
            .to_string();
        let message = RoutedMessage::Background { payload };

        let clients = self.open_clients().await;
        if let Some(existing) = clients.into_iter().find(|client| client.url == target) {
            log::debug!("Click target {} already open in {}", target, existing.id);
            self.post_or_warn(&existing.id, &message).await;
            if let Err(err) = self.clients.focus(&existing.id).await {
                log::warn!("Focusing {} failed: {}", existing.id, err);
            }
            return ClickOutcome::FocusedExisting {
                client: existing.id,
            };
        }

        match self.clients.open_window(&target).await {
            Ok(Some(opened)) => {
                log::debug!("Opened {} for click target {}", opened.id, target);
                self.post_or_warn(&opened.id, &message).await;
                ClickOutcome::OpenedNew { client: opened.id }
            }
            Ok(None) => {
                log::debug!("Host declined to open {}", target);
                ClickOutcome::OpenDenied
            }
            Err(err) => {
                log::warn!("Opening {} failed: {}", target, err);
                ClickOutcome::OpenDenied
            }
        }
    }

    /// Records a dismissed notification.
    pub fn handle_notification_close(&self, notification: &dyn NotificationHandle) {
        log::debug!("Notification {:?} closed", notification.title());
    }

    /// Takes control of already-open contexts once activated.
    pub async fn handle_activate(&self) {
        log::info!("Push worker activated");
        if let Err(err) = self.clients.claim().await {
            log::warn!("Claiming open contexts failed: {}", err);
        }
    }

    /// Records installation.
    pub fn handle_install(&self) {
        log::info!("Push worker installed");
    }

    async fn open_clients(&self) -> Vec<ClientWindow> {
        self.clients.match_all(true).await.unwrap_or_else(|err| {
            log::warn!("Enumerating open contexts failed: {}", err);
            Vec::new()
        })
    }

    async fn post_or_warn(&self, client: &ClientId, message: &RoutedMessage) {
        if let Err(err) = self.clients.post_message(client, message).await {
            log::warn!("{} to {} failed: {}", message.kind(), client, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use push_host::{
        MemoryClientRegistry, MemoryEventDispatch, MemoryNotification, MemoryNotificationDisplay,
    };
    use serde_json::json;

    use super::*;

    struct Harness {
        clients: MemoryClientRegistry,
        display: MemoryNotificationDisplay,
        worker: Rc<PushWorker>,
    }

    fn harness() -> Harness {
        let clients = MemoryClientRegistry::default();
        let display = MemoryNotificationDisplay::default();
        let worker = Rc::new(PushWorker::new(
            Rc::new(clients.clone()),
            Rc::new(display.clone()),
            RouterConfig::default(),
        ));
        Harness {
            clients,
            display,
            worker,
        }
    }

    fn push(h: &Harness, body: Value) -> PushOutcome {
        let raw = serde_json::to_vec(&body).expect("encode");
        block_on(h.worker.handle_push(Some(raw.as_slice())))
    }

    fn map(value: Value) -> JsonMap {
        serde_json::from_value(value).expect("object")
    }

    #[test]
    fn silent_push_reaches_every_context_and_shows_nothing() {
        let h = harness();
        let focused = h.clients.add_client("/a", true);
        let background = h.clients.add_client("/b", false);
        let uncontrolled = h.clients.add_uncontrolled_client("/c", false);

        let outcome = push(&h, json!({ "silent": true, "data": { "sync": "inbox" } }));

        assert_eq!(outcome, PushOutcome::Silent { delivered: 3 });
        let expected = RoutedMessage::Silent {
            data: map(json!({ "sync": "inbox" })),
        };
        for id in [&focused, &background, &uncontrolled] {
            assert_eq!(h.clients.messages_for(id), vec![expected.clone()]);
        }
        assert!(h.display.shown().is_empty());
    }

    #[test]
    fn silent_push_without_contexts_is_a_no_op() {
        let h = harness();
        let outcome = push(&h, json!({ "silent": true }));
        assert_eq!(outcome, PushOutcome::Silent { delivered: 0 });
        assert!(h.display.shown().is_empty());
    }

    #[test]
    fn silent_push_continues_past_a_failing_context() {
        let h = harness();
        let broken = h.clients.add_client("/a", false);
        let healthy = h.clients.add_client("/b", false);
        h.clients.fail_posts_to(&broken);

        let outcome = push(&h, json!({ "silent": true, "data": {} }));

        assert_eq!(outcome, PushOutcome::Silent { delivered: 1 });
        assert_eq!(h.clients.messages_for(&healthy).len(), 1);
    }

    #[test]
    fn focused_context_gets_foreground_message_only() {
        let h = harness();
        let other = h.clients.add_client("/other", false);
        let focused = h.clients.add_client("/chat", true);
        let body = json!({ "title": "New message", "body": "hi", "campaign": "x" });

        let outcome = push(&h, body.clone());

        assert_eq!(
            outcome,
            PushOutcome::Foreground {
                client: focused.clone()
            }
        );
        let messages = h.clients.messages_for(&focused);
        assert_eq!(messages.len(), 1);
        assert_eq!(
            messages[0].to_value().expect("encode"),
            json!({ "type": "FOREGROUND_MESSAGE", "payload": body })
        );
        assert!(h.clients.messages_for(&other).is_empty());
        assert!(h.display.shown().is_empty());
    }

    #[test]
    fn first_focused_context_wins() {
        let h = harness();
        let first = h.clients.add_client("/a", true);
        let second = h.clients.add_client("/b", true);

        push(&h, json!({ "title": "t" }));

        assert_eq!(h.clients.messages_for(&first).len(), 1);
        assert!(h.clients.messages_for(&second).is_empty());
    }

    #[test]
    fn unfocused_contexts_get_a_notification_instead() {
        let h = harness();
        let id = h.clients.add_client("/", false);

        let outcome = push(
            &h,
            json!({
                "title": "Order shipped",
                "body": "Arrives Tuesday",
                "icon": "/truck.png",
                "image": "/map.png",
                "click_action": "/orders/7",
                "data": { "order": 7 }
            }),
        );

        assert_eq!(
            outcome,
            PushOutcome::Displayed {
                title: "Order shipped".to_string()
            }
        );
        assert!(h.clients.messages_for(&id).is_empty());
        let shown = h.display.shown();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].title, "Order shipped");
        assert_eq!(
            shown[0].options,
            NotificationOptions {
                body: "Arrives Tuesday".to_string(),
                icon: "/truck.png".to_string(),
                image: Some("/map.png".to_string()),
                badge: "/badge.png".to_string(),
                data: map(json!({ "click_action": "/orders/7", "order": 7 })),
                tag: push_contract::NOTIFICATION_TAG.to_string(),
                require_interaction: false,
            }
        );
    }

    #[test]
    fn empty_push_shows_default_notification() {
        let h = harness();
        let outcome = block_on(h.worker.handle_push(None));

        assert_eq!(
            outcome,
            PushOutcome::Displayed {
                title: "Notification".to_string()
            }
        );
        let shown = h.display.shown();
        assert_eq!(shown[0].options.body, "");
        assert_eq!(shown[0].options.icon, "/icon.png");
        assert_eq!(shown[0].options.click_action(), Some("/"));
    }

    #[test]
    fn mistyped_fields_still_reach_foreground_listeners() {
        for body in [
            json!({ "title": "Hi", "silent": 0 }),
            json!({ "title": 42, "body": "x" }),
            json!({ "title": "Hi", "data": [1] }),
        ] {
            let h = harness();
            let focused = h.clients.add_client("/", true);
            let messenger = crate::ForegroundMessenger::new();
            let ran = Rc::new(std::cell::Cell::new(0));
            let counter = Rc::clone(&ran);
            messenger.on_message(move |_| counter.set(counter.get() + 1));

            let outcome = push(&h, body.clone());

            assert_eq!(
                outcome,
                PushOutcome::Foreground {
                    client: focused.clone()
                }
            );
            let posted = h.clients.messages_for(&focused)[0]
                .to_value()
                .expect("encode");
            assert_eq!(posted["payload"], body);
            assert_eq!(messenger.dispatch_json(&posted), 1, "body {body}");
            assert_eq!(ran.get(), 1);
        }
    }

    #[test]
    fn failed_foreground_post_drops_the_push() {
        let h = harness();
        let focused = h.clients.add_client("/", true);
        h.clients.fail_posts_to(&focused);

        let outcome = push(&h, json!({ "title": "Hi" }));

        assert_eq!(
            outcome,
            PushOutcome::Dropped {
                reason: format!("postMessage rejected by {focused}")
            }
        );
        assert!(h.display.shown().is_empty());
    }

    #[test]
    fn failed_display_drops_the_push() {
        let h = harness();
        h.clients.add_client("/", false);
        h.display.fail_show("permission denied");

        let outcome = push(&h, json!({ "title": "Hi" }));

        assert_eq!(
            outcome,
            PushOutcome::Dropped {
                reason: "permission denied".to_string()
            }
        );
    }

    #[test]
    fn failed_enumeration_falls_back_to_a_notification() {
        let h = harness();
        let focused = h.clients.add_client("/", true);
        h.clients.fail_match_all("clients unavailable");

        let outcome = push(&h, json!({ "title": "Hi" }));

        assert_eq!(
            outcome,
            PushOutcome::Displayed {
                title: "Hi".to_string()
            }
        );
        assert!(h.clients.messages_for(&focused).is_empty());
        assert_eq!(h.display.shown().len(), 1);
    }

    #[test]
    fn failed_enumeration_delivers_no_silent_messages() {
        let h = harness();
        h.clients.add_client("/", false);
        h.clients.fail_match_all("clients unavailable");

        let outcome = push(&h, json!({ "silent": true, "data": { "n": 1 } }));

        assert_eq!(outcome, PushOutcome::Silent { delivered: 0 });
        assert_eq!(h.clients.delivered_count(), 0);
    }

    #[test]
    fn click_on_open_target_focuses_and_messages_it() {
        let h = harness();
        let elsewhere = h.clients.add_client("/", false);
        let target = h.clients.add_client("/orders/7", false);
        let duplicate = h.clients.add_client("/orders/7", false);
        let notification =
            MemoryNotification::new("t", json!({ "click_action": "/orders/7", "order": 7 }));

        let outcome = block_on(h.worker.handle_notification_click(&notification));

        assert_eq!(
            outcome,
            ClickOutcome::FocusedExisting {
                client: target.clone()
            }
        );
        assert!(notification.is_closed());
        assert_eq!(
            h.clients.messages_for(&target),
            vec![RoutedMessage::Background {
                payload: map(json!({ "click_action": "/orders/7", "order": 7 })),
            }]
        );
        assert!(h.clients.messages_for(&duplicate).is_empty());
        assert!(h.clients.messages_for(&elsewhere).is_empty());
        assert_eq!(h.clients.focus_calls(), vec![target]);
        assert!(h.clients.opened_urls().is_empty());
    }

    #[test]
    fn click_without_match_opens_one_context_and_messages_it() {
        let h = harness();
        h.clients.add_client("/", false);
        let notification = MemoryNotification::new("t", json!({ "click_action": "/inbox" }));

        let outcome = block_on(h.worker.handle_notification_click(&notification));

        let ClickOutcome::OpenedNew { client } = outcome else {
            panic!("expected a new context, got {outcome:?}");
        };
        assert_eq!(h.clients.opened_urls(), vec!["/inbox".to_string()]);
        assert_eq!(
            h.clients.messages_for(&client),
            vec![RoutedMessage::Background {
                payload: map(json!({ "click_action": "/inbox" })),
            }]
        );
        assert_eq!(h.clients.delivered_count(), 1);
    }

    #[test]
    fn click_without_retained_target_uses_root() {
        let h = harness();
        let root = h.clients.add_client("/", false);
        let notification = MemoryNotification::new("t", Value::Null);

        let outcome = block_on(h.worker.handle_notification_click(&notification));

        assert_eq!(
            outcome,
            ClickOutcome::FocusedExisting {
                client: root.clone()
            }
        );
        assert_eq!(
            h.clients.messages_for(&root),
            vec![RoutedMessage::Background {
                payload: JsonMap::new()
            }]
        );
    }

    #[test]
    fn denied_open_window_is_a_no_op() {
        let h = harness();
        h.clients.set_deny_open_window(true);
        let notification = MemoryNotification::new("t", json!({ "click_action": "/x" }));

        let outcome = block_on(h.worker.handle_notification_click(&notification));

        assert_eq!(outcome, ClickOutcome::OpenDenied);
        assert!(notification.is_closed());
        assert_eq!(h.clients.delivered_count(), 0);
    }

    #[test]
    fn displayed_notification_click_round_trips_through_router() {
        let h = harness();
        push(&h, json!({ "title": "Hi", "click_action": "/thread/1" }));
        let handle = h.display.handle(0).expect("shown notification");

        let outcome = block_on(h.worker.handle_notification_click(&handle));

        assert!(matches!(outcome, ClickOutcome::OpenedNew { .. }));
        assert_eq!(h.clients.opened_urls(), vec!["/thread/1".to_string()]);
    }

    #[test]
    fn registered_handlers_route_dispatched_events() {
        let h = harness();
        let dispatch = MemoryEventDispatch::default();
        h.worker.register(&dispatch).expect("register");
        for kind in WorkerEventKind::ALL {
            assert!(dispatch.is_registered(kind));
        }

        let uncontrolled = h.clients.add_uncontrolled_client("/", false);
        block_on(dispatch.dispatch(WorkerEvent::Activate).expect("activate handler"));
        assert!(h.clients.is_controlled(&uncontrolled));

        let body =
            serde_json::to_vec(&json!({ "silent": true, "data": { "n": 1 } })).expect("body");
        block_on(
            dispatch
                .dispatch(WorkerEvent::Push { data: Some(body) })
                .expect("push handler"),
        );
        assert_eq!(h.clients.messages_for(&uncontrolled).len(), 1);

        let notification = Rc::new(MemoryNotification::new("t", json!({ "click_action": "/" })));
        block_on(
            dispatch
                .dispatch(WorkerEvent::NotificationClick(notification.clone()))
                .expect("click handler"),
        );
        assert!(notification.is_closed());
        assert_eq!(h.clients.focus_calls(), vec![uncontrolled]);
    }

    #[test]
    fn custom_config_changes_notification_defaults() {
        let clients = MemoryClientRegistry::default();
        let display = MemoryNotificationDisplay::default();
        let config = RouterConfig {
            default_title: "Acme".to_string(),
            fallback_icon: "/acme.png".to_string(),
            require_interaction: true,
            ..RouterConfig::default()
        };
        let worker = PushWorker::new(Rc::new(clients), Rc::new(display.clone()), config);

        block_on(worker.handle_push(Some(b"{}".as_slice())));

        let shown = display.shown();
        assert_eq!(shown[0].title, "Acme");
        assert_eq!(shown[0].options.icon, "/acme.png");
        assert!(shown[0].options.require_interaction);
    }
}
