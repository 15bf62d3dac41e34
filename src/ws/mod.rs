//! WebSocket layer: stream events, normalization, fan-out.
//!
//! The transport lives in `native.rs` (`ws-native` feature, `tokio-tungstenite`).
//! This module defines the transport-independent pieces: the normalized
//! [`DomainEvent`], outbound [`MessageOut`] commands, connection state and
//! client configuration.

pub mod bus;
pub mod fields;
pub mod normalize;

#[cfg(feature = "ws-native")]
pub mod native;

use crate::domain::equity::EquityPoint;
use crate::domain::market::MarketTick;
use crate::domain::order::OrderEvent;
use crate::domain::orderbook::BookUpdate;
use crate::domain::status::{StatusUpdate, WsStats};
use crate::domain::trade::Trade;
use serde::Serialize;
use serde_json::Value;

pub use bus::{EventBus, EventSubscription};
pub use normalize::normalize;

// ─── Outbound messages ───────────────────────────────────────────────────────

/// Messages sent from client to server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum MessageOut {
    #[serde(rename = "subscribe")]
    Subscribe { topic: String },
    #[serde(rename = "unsubscribe")]
    Unsubscribe { topic: String },
    #[serde(rename = "ping")]
    Ping,
}

impl MessageOut {
    pub fn subscribe(topic: impl Into<String>) -> Self {
        MessageOut::Subscribe {
            topic: topic.into(),
        }
    }

    pub fn unsubscribe(topic: impl Into<String>) -> Self {
        MessageOut::Unsubscribe {
            topic: topic.into(),
        }
    }
}

// ─── Inbound events ──────────────────────────────────────────────────────────

/// A normalized inbound frame.
///
/// Created per frame and published immediately; the normalizer retains nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainEvent {
    OrderEvent(OrderEvent),
    Trade(Trade),
    Fill(Trade),
    Market(MarketTick),
    Status(StatusUpdate),
    Stats(WsStats),
    Diag(String),
    Error(String),
    /// From `equity` and `bank` frames.
    Equity(EquityPoint),
    Book(BookUpdate),
    /// Non-JSON text or a JSON value that is not an object.
    Raw(String),
    /// A well-formed frame of a type this client does not model.
    Other { kind: String, payload: Value },
}

impl DomainEvent {
    /// The wire `type` this event was classified from.
    pub fn kind(&self) -> &str {
        match self {
            DomainEvent::OrderEvent(_) => "order_event",
            DomainEvent::Trade(_) => "trade",
            DomainEvent::Fill(_) => "fill",
            DomainEvent::Market(_) => "market",
            DomainEvent::Status(_) => "status",
            DomainEvent::Stats(_) => "stats",
            DomainEvent::Diag(_) => "diag",
            DomainEvent::Error(_) => "error",
            DomainEvent::Equity(_) => "equity",
            DomainEvent::Book(_) => "book",
            DomainEvent::Raw(_) => "raw",
            DomainEvent::Other { kind, .. } => kind,
        }
    }
}

// ─── Connection state ────────────────────────────────────────────────────────

/// Socket lifecycle as observed by consumers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Error,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Error => "error",
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Config ──────────────────────────────────────────────────────────────────

/// Automatic reconnection after transport failures.
///
/// Delays grow as `base_delay_ms * 2^(attempt-1)` plus jitter, capped at
/// `max_delay_ms`. A normal close or a user `close()` never retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub enabled: bool,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub max_attempts: u32,
}

impl ReconnectPolicy {
    /// Reconnect only on explicit `reconnect()`.
    pub fn manual() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            base_delay_ms: 1_000,
            max_delay_ms: 30_000,
            max_attempts: 10,
        }
    }
}

/// Configuration for the WS client.
#[derive(Debug, Clone)]
pub struct WsConfig {
    /// Stream base URL; a channel sub-path is appended per `connect()`.
    pub url: String,
    pub reconnect: ReconnectPolicy,
    /// Broadcast buffer per subscriber before it starts lagging.
    pub event_capacity: usize,
    pub command_capacity: usize,
}

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            url: crate::network::ws_url_from_http(
                crate::network::DEFAULT_API_URL,
                crate::network::DEFAULT_WS_SUFFIX,
            ),
            reconnect: ReconnectPolicy::default(),
            event_capacity: 1024,
            command_capacity: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_out_wire_shape() {
        let sub = serde_json::to_string(&MessageOut::subscribe("logs")).unwrap();
        assert_eq!(sub, r#"{"type":"subscribe","topic":"logs"}"#);
        let ping = serde_json::to_string(&MessageOut::Ping).unwrap();
        assert_eq!(ping, r#"{"type":"ping"}"#);
    }

    #[test]
    fn test_event_kinds() {
        assert_eq!(DomainEvent::Raw("x".into()).kind(), "raw");
        assert_eq!(DomainEvent::Diag("x".into()).kind(), "diag");
        let other = DomainEvent::Other {
            kind: "hello".into(),
            payload: Value::Null,
        };
        assert_eq!(other.kind(), "hello");
    }

    #[test]
    fn test_default_config() {
        let config = WsConfig::default();
        assert_eq!(config.url, "ws://127.0.0.1:8100/ws");
        assert!(config.reconnect.enabled);
        assert!(!ReconnectPolicy::manual().enabled);
        assert_eq!(ConnectionState::default(), ConnectionState::Disconnected);
    }
}
