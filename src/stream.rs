use crate::config::Config;
use crate::connection::ConnectionEvent;
use crate::connection_manager::{ConnectionManager, ConnectionManagerError};
use crate::dedup::{fingerprint, Deduplicator};
use crate::feed::ID;
use crate::metrics::{ConnectionState, Metrics, MetricsSnapshot};
use crate::report::Report;

use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("connection manager error: {0}")]
    ConnectionManager(#[from] ConnectionManagerError),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("stream closed")]
    StreamClosed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSocketReport {
    pub report: Report,
}

/// Events delivered to push-style listeners registered via [`Stream::on`].
#[derive(Debug, Clone)]
pub enum StreamEvent {
    Report(WebSocketReport),
    ConnectionStateChanged { origin: String, state: ConnectionState },
    Error { origin: String, message: String },
}

type Handler = Arc<dyn Fn(StreamEvent) + Send + Sync>;

/// Realtime report stream over one or more origin WebSocket connections.
/// Safe for concurrent usage. When HA mode is enabled and more than one
/// origin is discovered, the Stream maintains a concurrent connection to
/// every origin to minimize the risk of report gaps, deduplicating reports
/// delivered redundantly by more than one origin.
///
/// Supports both pull (`read`) and push (`on`) consumption; every accepted
/// report is delivered to both at most once.
pub struct Stream {
    report_receiver: Mutex<mpsc::Receiver<WebSocketReport>>,
    handlers: Arc<Mutex<Vec<Handler>>>,
    manager: Arc<Mutex<Option<ConnectionManager>>>,
    pump: Option<JoinHandle<()>>,
}

impl Stream {
    /// Establishes a streaming WebSocket connection that delivers verified
    /// reports for the given feed IDs.
    ///
    /// Endpoint: /api/v1/ws
    /// Type: WebSocket
    /// Sample request: `GET /api/v1/ws?feedIDs=<feedID1>,<feedID2>,...`
    pub async fn connect(config: Config, feed_ids: Vec<ID>) -> Result<Stream, StreamError> {
        let config = Arc::new(config);
        let feed_ids = Arc::new(feed_ids);

        let http = HttpClient::builder()
            .danger_accept_invalid_certs(config.insecure_skip_verify)
            .timeout(config.ha_connection_timeout)
            .build()?;

        let manager =
            ConnectionManager::connect(&http, Arc::clone(&config), Arc::clone(&feed_ids)).await?;

        let metrics = manager.metrics();
        let (report_tx, report_rx) = mpsc::channel(256);
        let handlers: Arc<Mutex<Vec<Handler>>> = Arc::new(Mutex::new(Vec::new()));
        let manager = Arc::new(Mutex::new(Some(manager)));

        let pump = tokio::spawn(pump_events(
            Arc::clone(&manager),
            Arc::clone(&handlers),
            report_tx,
            Arc::clone(&config),
            metrics,
        ));

        Ok(Stream {
            report_receiver: Mutex::new(report_rx),
            handlers,
            manager,
            pump: Some(pump),
        })
    }

    /// Registers a push-style handler invoked for every [`StreamEvent`].
    /// Multiple handlers may be registered; each receives every event.
    pub async fn on<F>(&self, handler: F)
    where
        F: Fn(StreamEvent) + Send + Sync + 'static,
    {
        self.handlers.lock().await.push(Arc::new(handler));
    }

    /// Reads the next available report. Blocks until a report is received,
    /// or returns `StreamError::StreamClosed` once the stream has shut down
    /// and no more reports are queued.
    pub async fn read(&self) -> Result<WebSocketReport, StreamError> {
        self.report_receiver
            .lock()
            .await
            .recv()
            .await
            .ok_or(StreamError::StreamClosed)
    }

    /// Returns a snapshot of current connection and deduplication metrics.
    pub async fn get_metrics(&self) -> MetricsSnapshot {
        let guard = self.manager.lock().await;
        match guard.as_ref() {
            Some(manager) => manager.metrics_snapshot(),
            None => MetricsSnapshot {
                accepted: 0,
                deduplicated: 0,
                total_received: 0,
                partial_reconnects: 0,
                full_reconnects: 0,
                configured_connections: 0,
                active_connections: 0,
                connection_states: Default::default(),
            },
        }
    }

    /// Closes the stream and tears down every underlying connection. It is
    /// the caller's responsibility to call this when the stream is no
    /// longer needed.
    pub async fn close(&mut self) -> Result<(), StreamError> {
        if let Some(pump) = self.pump.take() {
            pump.abort();
            let _ = pump.await;
        }

        if let Some(manager) = self.manager.lock().await.take() {
            manager.shutdown().await;
        }

        Ok(())
    }
}

async fn pump_events(
    manager: Arc<Mutex<Option<ConnectionManager>>>,
    handlers: Arc<Mutex<Vec<Handler>>>,
    report_tx: mpsc::Sender<WebSocketReport>,
    config: Arc<Config>,
    metrics: Arc<Metrics>,
) {
    let mut dedup = Deduplicator::new(crate::dedup::MIN_CAPACITY);

    loop {
        let event = {
            let mut guard = manager.lock().await;
            match guard.as_mut() {
                Some(manager) => manager.poll().await,
                None => return,
            }
        };

        let Some(event) = event else { return };

        match event {
            ConnectionEvent::Message { origin, payload } => match decode_frame(&payload) {
                Ok(report) => {
                    let fp = fingerprint(
                        &report.report.feed_id.0,
                        report.report.observations_timestamp,
                        report.report.full_report.as_bytes(),
                    );

                    if !dedup.observe(fp) {
                        metrics.deduplicated.fetch_add(1, Ordering::SeqCst);
                        continue;
                    }
                    metrics.accepted.fetch_add(1, Ordering::SeqCst);

                    let _ = report_tx.send(report.clone()).await;
                    dispatch(&handlers, StreamEvent::Report(report)).await;
                }
                Err(e) => {
                    warn!(%origin, error = %e, "dropping malformed frame");
                }
            },
            ConnectionEvent::Connected { origin } => {
                notify(&config, &handlers, origin, ConnectionState::Connected).await;
            }
            ConnectionEvent::Lost { origin } => {
                notify(&config, &handlers, origin, ConnectionState::Disconnected).await;
            }
            ConnectionEvent::Reconnecting { origin, .. } => {
                notify(&config, &handlers, origin, ConnectionState::Reconnecting).await;
            }
            ConnectionEvent::Failed { origin } => {
                notify(&config, &handlers, origin, ConnectionState::Failed).await;
            }
            ConnectionEvent::Error { origin, message } => {
                error!(%origin, %message, "connection reported an error");
                dispatch(&handlers, StreamEvent::Error { origin, message }).await;
            }
        }
    }
}

async fn notify(
    config: &Config,
    handlers: &Arc<Mutex<Vec<Handler>>>,
    origin: String,
    state: ConnectionState,
) {
    if let Some(cb) = &config.connection_status_callback {
        cb(&origin, state);
    }

    dispatch(handlers, StreamEvent::ConnectionStateChanged { origin, state }).await;
}

async fn dispatch(handlers: &Arc<Mutex<Vec<Handler>>>, event: StreamEvent) {
    for handler in handlers.lock().await.iter() {
        handler(event.clone());
    }
}

fn decode_frame(payload: &[u8]) -> Result<WebSocketReport, serde_json::Error> {
    serde_json::from_slice::<WebSocketReport>(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::ID;

    fn sample_report(timestamp: u32) -> WebSocketReport {
        WebSocketReport {
            report: Report {
                feed_id: ID([1u8; 32]),
                valid_from_timestamp: timestamp,
                observations_timestamp: timestamp,
                full_report: "0xdeadbeef".to_string(),
            },
        }
    }

    #[test]
    fn decode_frame_accepts_wrapped_json_report() {
        let report = sample_report(100);
        let payload = serde_json::to_vec(&report).unwrap();
        let decoded = decode_frame(&payload).unwrap();
        assert_eq!(decoded, report);
    }

    #[test]
    fn decode_frame_rejects_malformed_payload() {
        assert!(decode_frame(b"not json").is_err());
    }

    #[test]
    fn fingerprint_is_stable_across_identical_reports() {
        let a = sample_report(42);
        let b = sample_report(42);
        let fp = |r: &WebSocketReport| {
            fingerprint(
                &r.report.feed_id.0,
                r.report.observations_timestamp,
                r.report.full_report.as_bytes(),
            )
        };
        assert_eq!(fp(&a), fp(&b));
    }

    #[test]
    fn fingerprint_differs_across_timestamps() {
        let a = sample_report(1);
        let b = sample_report(2);
        let fp = |r: &WebSocketReport| {
            fingerprint(
                &r.report.feed_id.0,
                r.report.observations_timestamp,
                r.report.full_report.as_bytes(),
            )
        };
        assert_ne!(fp(&a), fp(&b));
    }
}
