use reqwest::Response;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use zeroize::Zeroize;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("API key cannot be empty")]
    EmptyApiKey,

    #[error("API secret cannot be empty")]
    EmptyApiSecret,

    #[error("REST URL cannot be empty")]
    EmptyRestUrl,
}

/// Controls whether the Stream maintains concurrent connections to every
/// discovered origin, or a single connection to the first one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebSocketHighAvailability {
    Disabled,
    Enabled,
}

type InspectHttpResponseFn = Arc<dyn Fn(&Response) + Send + Sync>;
type ConnectionStatusCallback = Arc<dyn Fn(&str, crate::metrics::ConnectionState) + Send + Sync>;

/// Config specifies the client configuration and dependencies.
///
/// Built through [`ConfigBuilder`], obtained from [`Config::new`].
#[derive(Clone)]
pub struct Config {
    /// Client API key
    pub api_key: String,

    /// Client API secret
    pub api_secret: String,

    /// REST API URL
    pub rest_url: String,

    /// WebSocket API URL. May contain a comma-separated list of origins.
    pub ws_url: String,

    /// Use concurrent connections to every discovered origin.
    pub ws_ha: WebSocketHighAvailability,

    /// Maximum number of reconnection attempts for underlying WebSocket connections.
    pub ws_max_reconnect: u32,

    /// Timeout budget applied to individual origin-discovery/connect attempts.
    pub ha_connection_timeout: Duration,

    /// Skip server certificate chain and host name verification.
    pub insecure_skip_verify: bool,

    /// Overall timeout for a single REST request.
    pub timeout: Duration,

    /// Number of retries performed for a failed REST request (5xx/timeout only).
    pub retry_attempts: u32,

    /// Base delay between REST retries, backed off exponentially with jitter.
    pub retry_delay: Duration,

    /// Function to inspect HTTP responses for REST requests.
    /// The response object must not be modified.
    pub inspect_http_response: Option<InspectHttpResponseFn>,

    /// Callback invoked whenever a connection's lifecycle state changes.
    /// Called with the origin URL and the new state.
    pub connection_status_callback: Option<ConnectionStatusCallback>,
}

impl Config {
    const DEFAULT_WS_MAX_RECONNECT: u32 = 5;
    const DEFAULT_HA_CONNECTION_TIMEOUT: Duration = Duration::from_secs(10);
    const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
    const DEFAULT_RETRY_ATTEMPTS: u32 = 1;
    const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

    /// Starts building a `Config` with the required fields. Call `.build()`
    /// once any optional `.with_*` overrides have been applied.
    ///
    /// # Errors
    ///
    /// `build()` returns `ConfigError` if `api_key`, `api_secret` or
    /// `rest_url` are empty.
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        rest_url: impl Into<String>,
        ws_url: impl Into<String>,
    ) -> ConfigBuilder {
        ConfigBuilder {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            rest_url: rest_url.into(),
            ws_url: ws_url.into(),
            ws_ha: WebSocketHighAvailability::Disabled,
            ws_max_reconnect: Self::DEFAULT_WS_MAX_RECONNECT,
            ha_connection_timeout: Self::DEFAULT_HA_CONNECTION_TIMEOUT,
            insecure_skip_verify: false,
            timeout: Self::DEFAULT_TIMEOUT,
            retry_attempts: Self::DEFAULT_RETRY_ATTEMPTS,
            retry_delay: Self::DEFAULT_RETRY_DELAY,
            inspect_http_response: None,
            connection_status_callback: None,
        }
    }
}

/// Builder for [`Config`]. Obtained via [`Config::new`].
pub struct ConfigBuilder {
    api_key: String,
    api_secret: String,
    rest_url: String,
    ws_url: String,
    ws_ha: WebSocketHighAvailability,
    ws_max_reconnect: u32,
    ha_connection_timeout: Duration,
    insecure_skip_verify: bool,
    timeout: Duration,
    retry_attempts: u32,
    retry_delay: Duration,
    inspect_http_response: Option<InspectHttpResponseFn>,
    connection_status_callback: Option<ConnectionStatusCallback>,
}

impl ConfigBuilder {
    pub fn with_ws_ha(mut self, ws_ha: WebSocketHighAvailability) -> Self {
        self.ws_ha = ws_ha;
        self
    }

    pub fn with_ws_max_reconnect(mut self, ws_max_reconnect: u32) -> Self {
        self.ws_max_reconnect = ws_max_reconnect;
        self
    }

    pub fn with_ha_connection_timeout(mut self, timeout: Duration) -> Self {
        self.ha_connection_timeout = timeout;
        self
    }

    pub fn with_insecure_skip_verify(mut self, insecure_skip_verify: bool) -> Self {
        self.insecure_skip_verify = insecure_skip_verify;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry_attempts(mut self, retry_attempts: u32) -> Self {
        self.retry_attempts = retry_attempts;
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn with_inspect_http_response(
        mut self,
        inspect_http_response: impl Fn(&Response) + Send + Sync + 'static,
    ) -> Self {
        self.inspect_http_response = Some(Arc::new(inspect_http_response));
        self
    }

    pub fn with_connection_status_callback(
        mut self,
        callback: impl Fn(&str, crate::metrics::ConnectionState) + Send + Sync + 'static,
    ) -> Self {
        self.connection_status_callback = Some(Arc::new(callback));
        self
    }

    /// Validates and finalizes the `Config`.
    pub fn build(self) -> Result<Config, ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }

        if self.api_secret.trim().is_empty() {
            return Err(ConfigError::EmptyApiSecret);
        }

        if self.rest_url.trim().is_empty() {
            return Err(ConfigError::EmptyRestUrl);
        }

        Ok(Config {
            api_key: self.api_key,
            api_secret: self.api_secret,
            rest_url: self.rest_url,
            ws_url: self.ws_url,
            ws_ha: self.ws_ha,
            ws_max_reconnect: self.ws_max_reconnect,
            ha_connection_timeout: self.ha_connection_timeout,
            insecure_skip_verify: self.insecure_skip_verify,
            timeout: self.timeout,
            retry_attempts: self.retry_attempts,
            retry_delay: self.retry_delay,
            inspect_http_response: self.inspect_http_response,
            connection_status_callback: self.connection_status_callback,
        })
    }
}

impl Zeroize for Config {
    fn zeroize(&mut self) {
        self.api_key.zeroize();
        self.api_secret.zeroize();
    }
}

impl Drop for Config {
    fn drop(&mut self) {
        self.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_requires_api_key() {
        let err = Config::new("", "secret", "https://rest", "wss://ws")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyApiKey));
    }

    #[test]
    fn build_requires_api_secret() {
        let err = Config::new("key", "", "https://rest", "wss://ws")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyApiSecret));
    }

    #[test]
    fn build_applies_defaults() {
        let config = Config::new("key", "secret", "https://rest", "wss://ws")
            .build()
            .unwrap();

        assert_eq!(config.ws_ha, WebSocketHighAvailability::Disabled);
        assert_eq!(config.ws_max_reconnect, 5);
        assert_eq!(config.retry_attempts, 1);
    }

    #[test]
    fn build_honors_overrides() {
        let config = Config::new("key", "secret", "https://rest", "wss://ws")
            .with_ws_ha(WebSocketHighAvailability::Enabled)
            .with_ws_max_reconnect(10)
            .with_retry_attempts(3)
            .build()
            .unwrap();

        assert_eq!(config.ws_ha, WebSocketHighAvailability::Enabled);
        assert_eq!(config.ws_max_reconnect, 10);
        assert_eq!(config.retry_attempts, 3);
    }
}
