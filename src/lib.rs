//! Rust SDK for Chainlink Data Streams: a REST client for historical reports
//! and a high-availability WebSocket stream for realtime reports, backed by
//! a versioned binary report codec and HMAC request signing.

pub mod auth;
pub mod client;
pub mod config;
pub mod connection;
pub mod connection_manager;
pub mod dedup;
pub mod endpoints;
pub mod feed;
pub mod metrics;
pub mod origin;
pub mod report;
pub mod stream;

pub use client::{Client, ClientError};
pub use config::{Config, ConfigError, WebSocketHighAvailability};
pub use feed::{Feed, FeedVersion, IDError, ID};
pub use metrics::{ConnectionState, Metrics, MetricsSnapshot};
pub use report::{FullReport, Payload, Report, ReportError};
pub use stream::{Stream, StreamError, StreamEvent, WebSocketReport};
