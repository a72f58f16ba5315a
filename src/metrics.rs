use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Lifecycle state of a single origin connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// Not yet connected, no attempt made.
    Disconnected,
    /// Handshake in flight.
    Connecting,
    /// Connected and receiving traffic.
    Connected,
    /// Disconnected, backing off before the next reconnection attempt.
    Reconnecting,
    /// Reconnection attempts exhausted; the connection will not retry further.
    Failed,
    /// Closed deliberately by the caller.
    Closed,
}

/// Aggregate counters tracked by a [`crate::connection_manager::ConnectionManager`].
#[derive(Debug, Default)]
pub struct Metrics {
    /// Reports delivered to the consumer after passing deduplication.
    pub accepted: AtomicU64,
    /// Reports discarded because their fingerprint had already been seen.
    pub deduplicated: AtomicU64,
    /// Reconnects where at least one other connection stayed up.
    pub partial_reconnects: AtomicU64,
    /// Reconnects where every connection was lost simultaneously.
    pub full_reconnects: AtomicU64,
    /// Number of origins configured at Stream construction time.
    pub configured_connections: AtomicU64,
    /// Number of origins currently in the `Connected` state.
    pub active_connections: AtomicU64,
}

impl Metrics {
    pub fn snapshot(&self, states: HashMap<String, ConnectionState>) -> MetricsSnapshot {
        let accepted = self.accepted.load(Ordering::SeqCst);
        let deduplicated = self.deduplicated.load(Ordering::SeqCst);

        MetricsSnapshot {
            accepted,
            deduplicated,
            total_received: accepted + deduplicated,
            partial_reconnects: self.partial_reconnects.load(Ordering::SeqCst),
            full_reconnects: self.full_reconnects.load(Ordering::SeqCst),
            configured_connections: self.configured_connections.load(Ordering::SeqCst),
            active_connections: self.active_connections.load(Ordering::SeqCst),
            connection_states: states,
        }
    }
}

/// Point-in-time snapshot of Stream-level statistics, returned by
/// `Stream::get_metrics`.
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    /// Total number of accepted (non-duplicate) reports.
    pub accepted: u64,
    /// Total number of reports discarded as duplicates.
    pub deduplicated: u64,
    /// Total number of reports received across all connections, before dedup.
    pub total_received: u64,
    /// Total number of partial reconnects (some connections stayed up).
    pub partial_reconnects: u64,
    /// Total number of full reconnects (all connections were lost).
    pub full_reconnects: u64,
    /// Number of origins configured for this Stream.
    pub configured_connections: u64,
    /// Number of origins currently connected.
    pub active_connections: u64,
    /// Current lifecycle state of each origin, keyed by origin URL.
    pub connection_states: HashMap<String, ConnectionState>,
}
