use crate::config::Config;
use crate::connection::{Connection, ConnectionEvent};
use crate::feed::ID;
use crate::metrics::{ConnectionState, Metrics, MetricsSnapshot};
use crate::origin::{discover_origins, OriginDiscoveryError};

use reqwest::Client as HttpClient;
use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ConnectionManagerError {
    #[error("origin discovery failed: {0}")]
    OriginDiscovery(#[from] OriginDiscoveryError),

    #[error("no origins available")]
    NoOrigins,

    #[error("all connections failed during startup")]
    AllConnectionsFailed,
}

/// Aggregates one [`Connection`] per discovered origin, fans their events
/// into a single stream, and tracks per-origin lifecycle state plus
/// partial/full reconnect counters.
///
/// Single-writer with respect to `Metrics`/state updates: only the task
/// draining `events` mutates them, mirroring the deduplicator's
/// single-writer discipline.
pub struct ConnectionManager {
    states: Arc<Mutex<HashMap<String, ConnectionState>>>,
    metrics: Arc<Metrics>,
    events: mpsc::Receiver<ConnectionEvent>,
    shutdown_handles: Vec<mpsc::Sender<()>>,
    join_handles: Vec<JoinHandle<()>>,
}

impl ConnectionManager {
    /// Discovers origins from `config.ws_url`, spawns one [`Connection`] per
    /// origin (or just the first one when HA is disabled), and blocks until
    /// either at least one connection reaches `Connected` or every
    /// connection reaches `Failed`.
    pub async fn connect(
        http: &HttpClient,
        config: Arc<Config>,
        feed_ids: Arc<Vec<ID>>,
    ) -> Result<Self, ConnectionManagerError> {
        let mut origins = discover_origins(http, &config).await?;

        if origins.is_empty() {
            return Err(ConnectionManagerError::NoOrigins);
        }

        if config.ws_ha == crate::config::WebSocketHighAvailability::Disabled {
            origins.truncate(1);
        }

        let metrics = Arc::new(Metrics::default());
        metrics
            .configured_connections
            .store(origins.len() as u64, Ordering::SeqCst);

        let states = Arc::new(Mutex::new(
            origins
                .iter()
                .map(|o| (o.clone(), ConnectionState::Disconnected))
                .collect::<HashMap<_, _>>(),
        ));

        let (tx, rx) = mpsc::channel(256 * origins.len().max(1));
        let mut shutdown_handles = Vec::with_capacity(origins.len());
        let mut join_handles = Vec::with_capacity(origins.len());

        for origin in &origins {
            let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
            let connection = Connection::new(
                origin.clone(),
                Arc::clone(&config),
                Arc::clone(&feed_ids),
                tx.clone(),
            );
            join_handles.push(tokio::spawn(connection.run(shutdown_rx)));
            shutdown_handles.push(shutdown_tx);
        }
        drop(tx);

        let mut manager = Self {
            states,
            metrics,
            events: rx,
            shutdown_handles,
            join_handles,
        };

        manager.await_initial_connection(origins.len()).await?;

        Ok(manager)
    }

    async fn await_initial_connection(
        &mut self,
        total_origins: usize,
    ) -> Result<(), ConnectionManagerError> {
        let mut failed = 0usize;

        while let Some(event) = self.events.recv().await {
            let connected_now = matches!(event, ConnectionEvent::Connected { .. });
            let failed_now = matches!(event, ConnectionEvent::Failed { .. });

            self.apply(event);

            if connected_now {
                return Ok(());
            }

            if failed_now {
                failed += 1;
                if failed >= total_origins {
                    return Err(ConnectionManagerError::AllConnectionsFailed);
                }
            }
        }

        Err(ConnectionManagerError::AllConnectionsFailed)
    }

    /// Receives the next event from any origin connection, applying
    /// lifecycle bookkeeping before returning it. Returns `None` once every
    /// connection has terminated.
    pub async fn poll(&mut self) -> Option<ConnectionEvent> {
        let event = self.events.recv().await?;
        self.apply(event.clone());
        Some(event)
    }

    fn apply(&mut self, event: ConnectionEvent) {
        if let Some(new_state) = crate::connection::state_for_event(&event) {
            let origin = match &event {
                ConnectionEvent::Connected { origin }
                | ConnectionEvent::Lost { origin }
                | ConnectionEvent::Reconnecting { origin, .. }
                | ConnectionEvent::Failed { origin } => origin.clone(),
                _ => unreachable!(),
            };

            let mut states = self.states.lock().expect("connection state lock poisoned");
            let was_connected = states
                .values()
                .filter(|s| **s == ConnectionState::Connected)
                .count();
            states.insert(origin.clone(), new_state);
            let now_connected = states
                .values()
                .filter(|s| **s == ConnectionState::Connected)
                .count();
            self.metrics
                .active_connections
                .store(now_connected as u64, Ordering::SeqCst);
            drop(states);

            // Classify at the moment a connection drops out of Connected, not
            // later at Reconnecting: by the time Reconnecting arrives, Lost
            // has already removed this origin from the connected tally, so
            // was_connected == now_connected there and the full/partial split
            // would never fire.
            if matches!(event, ConnectionEvent::Lost { .. }) && was_connected > now_connected {
                if now_connected == 0 {
                    self.metrics.full_reconnects.fetch_add(1, Ordering::SeqCst);
                    warn!(%origin, "all connections lost, attempting full reconnect");
                } else {
                    self.metrics.partial_reconnects.fetch_add(1, Ordering::SeqCst);
                    info!(%origin, "connection lost, others remain active");
                }
            }
        }

        match &event {
            ConnectionEvent::Error { origin, message } => {
                warn!(%origin, %message, "connection error");
            }
            ConnectionEvent::Failed { origin } => {
                warn!(%origin, "connection permanently failed");
            }
            _ => {}
        }
    }

    /// Returns a point-in-time snapshot of connection counts and per-origin
    /// state, suitable for `Stream::get_metrics`.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        let states = self.states.lock().expect("connection state lock poisoned").clone();
        self.metrics.snapshot(states)
    }

    pub fn metrics(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }

    /// Signals every connection to stop reconnecting and tears down their
    /// tasks.
    pub async fn shutdown(mut self) {
        for handle in &self.shutdown_handles {
            let _ = handle.send(()).await;
        }
        for handle in self.join_handles.drain(..) {
            let _ = handle.await;
        }
    }
}
