//! Server client configuration.

use push_contract::DEFAULT_SERVER_BASE_URL;
use serde::Deserialize;

use crate::DispatchError;

/// Environment variable holding the base URL override.
pub const ENV_BASE_URL: &str = "PUSH_SERVER_BASE_URL";
/// Environment variable holding the application id.
pub const ENV_APP_ID: &str = "PUSH_APP_ID";
/// Environment variable holding the application secret.
pub const ENV_SECRET_KEY: &str = "PUSH_SECRET_KEY";

/// Credentials and endpoint for [`crate::NotificationServerClient`].
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerClientConfig {
    /// API base URL; the public service is used when absent.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Application id.
    pub app_id: String,
    /// Application secret. Never expose this to browsers.
    pub secret_key: String,
}

impl std::fmt::Debug for ServerClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerClientConfig")
            .field("base_url", &self.base_url)
            .field("app_id", &self.app_id)
            .field("secret_key", &"***")
            .finish()
    }
}

impl ServerClientConfig {
    /// Creates a config against the default base URL.
    pub fn new(app_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            base_url: None,
            app_id: app_id.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Overrides the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Returns the effective base URL.
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_SERVER_BASE_URL)
    }

    /// Reads `PUSH_APP_ID`, `PUSH_SECRET_KEY`, and optionally `PUSH_SERVER_BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::MissingConfig`] when the id or secret is unset or empty.
    pub fn from_env() -> Result<Self, DispatchError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup using the environment variable names.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::MissingConfig`] when the id or secret is absent or empty.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DispatchError> {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or(DispatchError::MissingConfig(key))
        };
        Ok(Self {
            base_url: lookup(ENV_BASE_URL).filter(|value| !value.trim().is_empty()),
            app_id: required(ENV_APP_ID)?,
            secret_key: required(ENV_SECRET_KEY)?,
        })
    }
}
