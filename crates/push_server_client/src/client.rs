//! HTTP client for `POST {base}/push/send`.

use push_contract::{
    JsonMap, OutgoingNotification, SendRequest, SendResponse, SendTargets, SEND_PATH,
};
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::{DispatchError, ServerClientConfig};

const USER_AGENT: &str = concat!("push_server_client/", env!("CARGO_PKG_VERSION"));
const NOTIFICATION_FALLBACK: &str = "Failed to send notification via Vibe Message Server";
const SILENT_FALLBACK: &str = "Failed to send silent notification via Vibe Message Server";

/// Backend client that triggers pushes for one application.
///
/// Stateless across calls: concurrent calls are independent requests.
#[derive(Debug, Clone)]
pub struct NotificationServerClient {
    http: Client,
    send_url: String,
    app_id: String,
    secret_key: String,
}

impl NotificationServerClient {
    /// Creates a client with its own HTTP connection pool.
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL is invalid or the HTTP client cannot be built.
    pub fn new(config: ServerClientConfig) -> Result<Self, DispatchError> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Self::with_http_client(config, http)
    }

    /// Creates a client that shares an existing HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error when the base URL is not an absolute URL.
    pub fn with_http_client(
        config: ServerClientConfig,
        http: Client,
    ) -> Result<Self, DispatchError> {
        let base_url = config.base_url().trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| DispatchError::InvalidBaseUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            http,
            send_url: format!("{base_url}{SEND_PATH}"),
            app_id: config.app_id,
            secret_key: config.secret_key,
        })
    }

    /// Returns the full send endpoint URL.
    pub fn send_url(&self) -> &str {
        &self.send_url
    }

    /// Sends a visible notification and returns the response's `data` field.
    ///
    /// `target_user_ids` of `None` lets the backend pick the audience.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Rejected`] with the server's message (or a fixed fallback) when
    /// the status is not successful or `success` is false.
    pub async fn notification(
        &self,
        notification: OutgoingNotification,
        target_user_ids: Option<Vec<String>>,
    ) -> Result<Value, DispatchError> {
        let request = self.send_request(notification, target_user_ids);
        self.send(&request, NOTIFICATION_FALLBACK).await
    }

    /// Sends a data-only push; the submitted notification carries no `title` or `body`.
    ///
    /// # Errors
    ///
    /// Same contract as [`NotificationServerClient::notification`].
    pub async fn silent_notification(
        &self,
        data: JsonMap,
        target_user_ids: Option<Vec<String>>,
    ) -> Result<Value, DispatchError> {
        let request = self.send_request(OutgoingNotification::silent(data), target_user_ids);
        self.send(&request, SILENT_FALLBACK).await
    }

    /// Builds the request envelope for a notification.
    pub fn send_request(
        &self,
        notification: OutgoingNotification,
        target_user_ids: Option<Vec<String>>,
    ) -> SendRequest {
        SendRequest {
            app_id: self.app_id.clone(),
            secret_key: self.secret_key.clone(),
            notification,
            targets: SendTargets {
                external_user_ids: target_user_ids,
            },
        }
    }

    async fn send(
        &self,
        request: &SendRequest,
        fallback: &'static str,
    ) -> Result<Value, DispatchError> {
        log::debug!("Sending push for app {} to {}", request.app_id, self.send_url);
        let response = self.http.post(&self.send_url).json(request).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        let result = interpret_response(status.is_success(), &body, fallback);
        if let Err(err) = &result {
            log::warn!("Push send failed with status {}: {}", status, err);
        }
        result
    }
}

/// Maps a send-endpoint response to the call result.
///
/// Non-success statuses and `success: false` bodies become [`DispatchError::Rejected`] carrying
/// the body's non-empty `message`, else `fallback`.
///
/// # Errors
///
/// Returns [`DispatchError::Decode`] when a success status carries a body that is not a send
/// response.
pub fn interpret_response(
    status_ok: bool,
    body: &[u8],
    fallback: &str,
) -> Result<Value, DispatchError> {
    let parsed = match serde_json::from_slice::<SendResponse>(body) {
        Ok(parsed) => parsed,
        Err(_) if !status_ok => return Err(DispatchError::Rejected(fallback.to_string())),
        Err(err) => return Err(DispatchError::Decode(err)),
    };

    if !status_ok || !parsed.success {
        let message = parsed
            .message
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| fallback.to_string());
        return Err(DispatchError::Rejected(message));
    }

    Ok(parsed.data.unwrap_or(Value::Null))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn client(base_url: &str) -> NotificationServerClient {
        NotificationServerClient::with_http_client(
            ServerClientConfig::new("app-1", "s3cret").with_base_url(base_url),
            Client::new(),
        )
        .expect("client")
    }

    #[test]
    fn send_url_joins_base_and_path() {
        assert_eq!(
            client("https://push.example.com/api/").send_url(),
            "https://push.example.com/api/push/send"
        );
        let default = NotificationServerClient::with_http_client(
            ServerClientConfig::new("a", "b"),
            Client::new(),
        )
        .expect("client");
        assert_eq!(
            default.send_url(),
            "https://vibemessage.umangsailor.com/api/push/send"
        );
    }

    #[test]
    fn relative_base_url_is_rejected() {
        let err = NotificationServerClient::with_http_client(
            ServerClientConfig::new("a", "b").with_base_url("/api"),
            Client::new(),
        )
        .expect_err("relative url");
        assert!(matches!(err, DispatchError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn send_request_carries_credentials_and_targets() {
        let request = client("https://push.example.com").send_request(
            OutgoingNotification {
                title: Some("Hi".to_string()),
                body: Some("There".to_string()),
                ..OutgoingNotification::default()
            },
            Some(vec!["user-7".to_string()]),
        );
        assert_eq!(
            serde_json::to_value(&request).expect("encode"),
            json!({
                "appId": "app-1",
                "secretKey": "s3cret",
                "notification": { "title": "Hi", "body": "There" },
                "targets": { "externalUserIds": ["user-7"] }
            })
        );
    }

    #[test]
    fn missing_targets_are_omitted() {
        let request = client("https://push.example.com")
            .send_request(OutgoingNotification::default(), None);
        assert_eq!(
            serde_json::to_value(&request.targets).expect("encode"),
            json!({})
        );
    }

    #[test]
    fn rejected_response_uses_server_message_verbatim() {
        let err = interpret_response(
            true,
            br#"{"success": false, "message": "bad key"}"#,
            NOTIFICATION_FALLBACK,
        )
        .expect_err("rejected");
        assert_eq!(err.to_string(), "bad key");
    }

    #[test]
    fn rejected_response_without_message_uses_fallback() {
        let err = interpret_response(
            true,
            br#"{"success": false, "message": ""}"#,
            SILENT_FALLBACK,
        )
        .expect_err("rejected");
        assert_eq!(err.to_string(), SILENT_FALLBACK);
    }

    #[test]
    fn error_status_overrides_success_flag() {
        let err = interpret_response(false, br#"{"success": true}"#, NOTIFICATION_FALLBACK)
            .expect_err("status 500");
        assert_eq!(err.to_string(), NOTIFICATION_FALLBACK);

        let err = interpret_response(false, b"<html>bad gateway</html>", NOTIFICATION_FALLBACK)
            .expect_err("non-json error page");
        assert!(matches!(err, DispatchError::Rejected(_)));
    }

    #[test]
    fn successful_response_returns_data_field() {
        let data = interpret_response(
            true,
            br#"{"success": true, "data": {"sent": 3}}"#,
            NOTIFICATION_FALLBACK,
        )
        .expect("ok");
        assert_eq!(data, json!({ "sent": 3 }));

        let data = interpret_response(true, br#"{"success": true}"#, NOTIFICATION_FALLBACK)
            .expect("ok");
        assert_eq!(data, Value::Null);
    }

    #[test]
    fn unreadable_success_body_is_a_decode_error() {
        let err = interpret_response(true, b"not json", NOTIFICATION_FALLBACK).expect_err("decode");
        assert!(matches!(err, DispatchError::Decode(_)));
    }
}
