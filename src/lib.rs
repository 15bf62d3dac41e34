//! # tradedesk-sync
//!
//! Real-time synchronization client for a trading-bot backend.
//!
//! ## Architecture
//!
//! The crate is organized in layers:
//!
//! 1. **Core**: Shared types, domain models, frame normalizer, bounded view-state reducers
//! 2. **HTTP API**: `DeskHttp` with per-endpoint retry policies
//! 3. **WebSocket**: Connection manager (`tokio-tungstenite`) and fan-out event bus
//! 4. **High-Level Client**: `DeskClient` with nested sub-clients
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tradedesk_sync::prelude::*;
//!
//! let client = DeskClient::builder()
//!     .base_url("http://127.0.0.1:8100")
//!     .token("secret")
//!     .build()?;
//!
//! let status = client.bot().status().await?;
//!
//! let mut ws = client.ws_native();
//! let mut events = ws.subscribe();
//! ws.connect(None).await?;
//!
//! let mut tape = TradeTape::default();
//! while let Some(event) = events.recv().await {
//!     tape.apply(&event);
//! }
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes used across all domains.
pub mod shared;

/// Domain modules (vertical slices): types, reducers, REST sub-clients.
pub mod domain;

/// Unified error types.
pub mod error;

/// Network URL constants and stream endpoint derivation.
pub mod network;

/// Runtime configuration (builder and environment).
pub mod config;

// ── Layer 2: HTTP API ────────────────────────────────────────────────────────

/// HTTP client with retry policies.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 3: WebSocket ───────────────────────────────────────────────────────

/// WebSocket stream: messages, normalization, event bus, connection manager.
pub mod ws;

// ── Layer 4: High-Level Client ───────────────────────────────────────────────

/// `DeskClient`: the primary entry point.
#[cfg(feature = "http")]
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{BoundedSeries, Items, OrderId, Side, Timeframe};

    // Domain types: bot status + dashboard
    pub use crate::domain::status::{BotStatus, DashboardState, RunningFlag, StatusUpdate, WsStats};

    // Domain types: config
    pub use crate::domain::config::{ConfigDraft, ConfigSnapshot};

    // Domain types: orders, trades, fills
    pub use crate::domain::order::{OpenOrders, OrderEvent, OrderRecord, OrderStatus};
    pub use crate::domain::trade::{FillFeed, FillQuery, FillRecord, Trade, TradeTape};

    // Domain types: market, book, equity, logs
    pub use crate::domain::equity::{EquityCurve, EquityPoint, EquityStats};
    pub use crate::domain::log::{LogLine, LogTail};
    pub use crate::domain::market::{Candle, MarketTick, MarketTicker};
    pub use crate::domain::orderbook::{BookLevel, BookThrottle, BookUpdate, BookView};

    // Domain types: REST payloads
    pub use crate::domain::admin::{ApiKeys, AuditEntry, DashboardSummary, KeyStatus};
    pub use crate::domain::history::{HistoryKind, HistoryStats, OrderHistoryItem, TradeHistoryItem};
    pub use crate::domain::portfolio::{Balance, Position};
    pub use crate::domain::risk::{RiskLimits, RiskStatus};
    pub use crate::domain::strategy::{
        BacktestResult, BotInfo, BotLaunch, PairScore, ReportScope, ScanResponse, StrategyInfo,
        StrategyReport,
    };

    // Errors
    pub use crate::error::{HttpError, SdkError, WsError};

    // Config + network
    pub use crate::config::{DeskConfig, Endpoint};
    pub use crate::network::{DEFAULT_API_URL, DEFAULT_WS_SUFFIX};

    // HTTP client + sub-clients
    #[cfg(feature = "http")]
    pub use crate::client::{
        AdminClient, BacktestClient, BotClient, BotsClient, ConfigClient, DeskClient,
        DeskClientBuilder, HistoryClient, MarketClient, OrdersClient, PortfolioClient, RiskClient,
        ScannerClient, StrategiesClient, TradesClient,
    };
    #[cfg(feature = "http")]
    pub use crate::http::retry::{RetryConfig, RetryPolicy};

    // WebSocket types
    pub use crate::ws::{
        normalize, ConnectionState, DomainEvent, EventBus, EventSubscription, MessageOut,
        ReconnectPolicy, WsConfig,
    };
    #[cfg(feature = "ws-native")]
    pub use crate::ws::native::WsClient;
}
