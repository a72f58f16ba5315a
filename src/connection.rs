use crate::auth::generate_auth_headers;
use crate::config::Config;
use crate::endpoints::API_V1_WS;
use crate::feed::ID;
use crate::metrics::ConnectionState;

use futures_util::{SinkExt, StreamExt};
use rand::Rng;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::mpsc;
use tokio::time::{interval, timeout, Instant};
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, error, info, warn};

/// Base delay before the first reconnection attempt.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(1);
/// Ceiling applied to the exponential backoff before jitter.
pub const MAX_RECONNECT_INTERVAL: Duration = Duration::from_secs(10);
/// Default number of reconnection attempts before a connection is Failed.
pub const DEFAULT_MAX_RECONNECTS: u32 = 5;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const PING_INTERVAL: Duration = Duration::from_secs(30);
const PONG_TIMEOUT: Duration = Duration::from_secs(5);

/// A lifecycle event raised by a single origin [`Connection`], consumed by
/// the [`crate::connection_manager::ConnectionManager`].
#[derive(Debug, Clone)]
pub enum ConnectionEvent {
    Connected { origin: String },
    Lost { origin: String },
    Reconnecting { origin: String, attempt: u32 },
    Failed { origin: String },
    Error { origin: String, message: String },
    Message { origin: String, payload: Vec<u8> },
}

/// Computes the jittered reconnect delay for the `n`th attempt (0-indexed):
/// `min(MAX_RECONNECT_INTERVAL, RECONNECT_DELAY * 2^n) * (0.5 + rand[0, 0.5))`.
pub fn reconnect_delay(attempt: u32) -> Duration {
    let exp = RECONNECT_DELAY.saturating_mul(1u32.checked_shl(attempt).unwrap_or(u32::MAX));
    let capped = exp.min(MAX_RECONNECT_INTERVAL);
    let jitter = 0.5 + rand::thread_rng().gen_range(0.0..0.5);
    capped.mul_f64(jitter)
}

/// A single WebSocket connection to one discovered origin, with its own
/// reconnection backoff and liveness tracking. Spawned and supervised by a
/// [`crate::connection_manager::ConnectionManager`].
pub struct Connection {
    origin: String,
    config: Arc<Config>,
    feed_ids: Arc<Vec<ID>>,
    events: mpsc::Sender<ConnectionEvent>,
    max_reconnects: u32,
}

impl Connection {
    pub fn new(
        origin: String,
        config: Arc<Config>,
        feed_ids: Arc<Vec<ID>>,
        events: mpsc::Sender<ConnectionEvent>,
    ) -> Self {
        let max_reconnects = if config.ws_max_reconnect == 0 {
            DEFAULT_MAX_RECONNECTS
        } else {
            config.ws_max_reconnect
        };

        Self {
            origin,
            config,
            feed_ids,
            events,
            max_reconnects,
        }
    }

    /// Drives the connection's full lifecycle until reconnection attempts
    /// are exhausted or `shutdown` fires. Disconnected -> Connecting ->
    /// Connected is the happy path; on loss, Connected -> Reconnecting loops
    /// with jittered backoff up to `max_reconnects`, then -> Failed.
    pub async fn run(self, mut shutdown: mpsc::Receiver<()>) {
        let mut attempt = 0u32;

        loop {
            if shutdown.try_recv().is_ok() {
                return;
            }

            match self.connect_once().await {
                Ok(stream) => {
                    attempt = 0;
                    let _ = self
                        .events
                        .send(ConnectionEvent::Connected {
                            origin: self.origin.clone(),
                        })
                        .await;

                    self.serve(stream, &mut shutdown).await;

                    let _ = self
                        .events
                        .send(ConnectionEvent::Lost {
                            origin: self.origin.clone(),
                        })
                        .await;
                }
                Err(ConnectFailure::Fatal(message)) => {
                    let _ = self
                        .events
                        .send(ConnectionEvent::Error {
                            origin: self.origin.clone(),
                            message,
                        })
                        .await;
                    let _ = self
                        .events
                        .send(ConnectionEvent::Failed {
                            origin: self.origin.clone(),
                        })
                        .await;
                    return;
                }
                Err(ConnectFailure::Transient(message)) => {
                    let _ = self
                        .events
                        .send(ConnectionEvent::Error {
                            origin: self.origin.clone(),
                            message,
                        })
                        .await;
                }
            }

            if attempt >= self.max_reconnects {
                let _ = self
                    .events
                    .send(ConnectionEvent::Failed {
                        origin: self.origin.clone(),
                    })
                    .await;
                return;
            }

            let _ = self
                .events
                .send(ConnectionEvent::Reconnecting {
                    origin: self.origin.clone(),
                    attempt,
                })
                .await;

            let delay = reconnect_delay(attempt);
            attempt += 1;

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = shutdown.recv() => return,
            }
        }
    }

    async fn connect_once(
        &self,
    ) -> Result<
        tokio_tungstenite::WebSocketStream<
            tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
        >,
        ConnectFailure,
    > {
        let feed_ids: Vec<String> = self.feed_ids.iter().map(ID::to_hex_string).collect();
        let path = format!("{}?feedIDs={}", API_V1_WS, feed_ids.join(","));

        let timestamp: i64 = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock is before the Unix epoch")
            .as_millis()
            .try_into()
            .expect("timestamp overflows i64");

        let headers = generate_auth_headers(
            "GET",
            &path,
            b"",
            &self.config.api_key,
            &self.config.api_secret,
            timestamp,
        )
        .map_err(|e| ConnectFailure::Fatal(e.to_string()))?;

        let url = format!("{}{}", self.origin.split('#').next().unwrap_or(&self.origin), path);
        let mut request = url.into_client_request().map_err(|e| {
            ConnectFailure::Fatal(format!("failed to build WebSocket request: {e}"))
        })?;
        request.headers_mut().extend(headers);

        let connect_future = tokio_tungstenite::connect_async(request);
        let (stream, response) = timeout(DEFAULT_CONNECT_TIMEOUT, connect_future)
            .await
            .map_err(|_| ConnectFailure::Transient("WebSocket connect timed out".to_string()))?
            .map_err(classify_connect_error)?;

        debug!(origin = %self.origin, ?response, "connected to origin");
        Ok(stream)
    }

    /// Services one live connection: forwards inbound frames (both text and
    /// binary are accepted) as [`ConnectionEvent::Message`], and drives
    /// ping/pong liveness. Returns once the socket closes, a pong is
    /// overdue, or `shutdown` fires.
    async fn serve<S>(&self, mut stream: tokio_tungstenite::WebSocketStream<S>, shutdown: &mut mpsc::Receiver<()>)
    where
        S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin,
    {
        let mut ping_timer = interval(PING_INTERVAL);
        let mut awaiting_pong: Option<Instant> = None;

        loop {
            tokio::select! {
                _ = shutdown.recv() => return,

                _ = ping_timer.tick() => {
                    if let Some(since) = awaiting_pong {
                        if since.elapsed() >= PONG_TIMEOUT {
                            warn!(origin = %self.origin, "pong timeout, dropping connection");
                            return;
                        }
                    }
                    if stream.send(WsMessage::Ping(Vec::new())).await.is_err() {
                        return;
                    }
                    awaiting_pong = Some(Instant::now());
                }

                msg = stream.next() => {
                    match msg {
                        Some(Ok(WsMessage::Text(text))) => {
                            let _ = self.events.send(ConnectionEvent::Message {
                                origin: self.origin.clone(),
                                payload: text.into_bytes(),
                            }).await;
                        }
                        Some(Ok(WsMessage::Binary(bytes))) => {
                            let _ = self.events.send(ConnectionEvent::Message {
                                origin: self.origin.clone(),
                                payload: bytes,
                            }).await;
                        }
                        Some(Ok(WsMessage::Pong(_))) => {
                            awaiting_pong = None;
                        }
                        Some(Ok(WsMessage::Ping(payload))) => {
                            if stream.send(WsMessage::Pong(payload)).await.is_err() {
                                return;
                            }
                        }
                        Some(Ok(WsMessage::Close(_))) | None => {
                            info!(origin = %self.origin, "connection closed");
                            return;
                        }
                        Some(Ok(WsMessage::Frame(_))) => {}
                        Some(Err(e)) => {
                            error!(origin = %self.origin, error = %e, "WebSocket read error");
                            return;
                        }
                    }
                }
            }
        }
    }
}

/// Outcome of a failed handshake attempt: `Fatal` (auth/4xx — the server
/// rejected us outright, no point retrying) versus `Transient` (network
/// error, timeout, or 5xx — eligible for the reconnect loop).
enum ConnectFailure {
    Fatal(String),
    Transient(String),
}

fn classify_connect_error(
    err: tokio_tungstenite::tungstenite::Error,
) -> ConnectFailure {
    use tokio_tungstenite::tungstenite::Error as WsError;

    if let WsError::Http(response) = &err {
        let status = response.status();
        if status.is_client_error() {
            return ConnectFailure::Fatal(format!("handshake rejected: {status}"));
        }
    }

    ConnectFailure::Transient(format!("failed to connect: {err}"))
}

/// Maps a [`ConnectionEvent`] variant to the [`ConnectionState`] it implies,
/// for metrics reporting.
pub fn state_for_event(event: &ConnectionEvent) -> Option<ConnectionState> {
    match event {
        ConnectionEvent::Connected { .. } => Some(ConnectionState::Connected),
        ConnectionEvent::Lost { .. } => Some(ConnectionState::Disconnected),
        ConnectionEvent::Reconnecting { .. } => Some(ConnectionState::Reconnecting),
        ConnectionEvent::Failed { .. } => Some(ConnectionState::Failed),
        ConnectionEvent::Error { .. } | ConnectionEvent::Message { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_connect_error_treats_4xx_as_fatal() {
        use tokio_tungstenite::tungstenite::http::{Response, StatusCode};
        use tokio_tungstenite::tungstenite::Error as WsError;

        let response = Response::builder()
            .status(StatusCode::UNAUTHORIZED)
            .body(None)
            .unwrap();
        let err = WsError::Http(response);

        assert!(matches!(classify_connect_error(err), ConnectFailure::Fatal(_)));
    }

    #[test]
    fn classify_connect_error_treats_other_errors_as_transient() {
        let err = tokio_tungstenite::tungstenite::Error::ConnectionClosed;
        assert!(matches!(
            classify_connect_error(err),
            ConnectFailure::Transient(_)
        ));
    }

    #[test]
    fn reconnect_delay_is_bounded_and_jittered() {
        for attempt in 0..10 {
            let delay = reconnect_delay(attempt);
            assert!(delay >= Duration::from_millis(1));
            assert!(delay <= MAX_RECONNECT_INTERVAL);
        }
    }

    #[test]
    fn reconnect_delay_caps_at_max_interval() {
        let delay = reconnect_delay(10);
        assert!(delay <= MAX_RECONNECT_INTERVAL);
    }

    #[test]
    fn state_for_event_maps_lifecycle_events() {
        assert_eq!(
            state_for_event(&ConnectionEvent::Connected {
                origin: "a".into()
            }),
            Some(ConnectionState::Connected)
        );
        assert_eq!(
            state_for_event(&ConnectionEvent::Failed { origin: "a".into() }),
            Some(ConnectionState::Failed)
        );
        assert_eq!(
            state_for_event(&ConnectionEvent::Message {
                origin: "a".into(),
                payload: vec![]
            }),
            None
        );
    }
}
