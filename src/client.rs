//! High-level client: `DeskClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`.
//! This module keeps the builder, the shared running flag, the
//! feature-unavailable gate and the accessor methods.

use crate::config::{DeskConfig, Endpoint};
use crate::domain::admin::client::Admin;
use crate::domain::config::client::Config;
use crate::domain::history::client::History;
use crate::domain::market::client::Market;
use crate::domain::order::client::Orders;
use crate::domain::portfolio::client::Portfolio;
use crate::domain::risk::client::Risk;
use crate::domain::status::client::Bot;
use crate::domain::status::RunningFlag;
use crate::domain::strategy::client::{Backtest, Bots, Scanner, Strategies};
use crate::domain::trade::client::Trades;
use crate::error::{HttpError, SdkError};
use crate::http::DeskHttp;
use crate::ws::WsConfig;

use std::collections::HashSet;

// Re-export sub-client types for convenience.
pub use crate::domain::admin::client::Admin as AdminClient;
pub use crate::domain::config::client::Config as ConfigClient;
pub use crate::domain::history::client::History as HistoryClient;
pub use crate::domain::market::client::Market as MarketClient;
pub use crate::domain::order::client::Orders as OrdersClient;
pub use crate::domain::portfolio::client::Portfolio as PortfolioClient;
pub use crate::domain::risk::client::Risk as RiskClient;
pub use crate::domain::status::client::Bot as BotClient;
pub use crate::domain::strategy::client::{
    Backtest as BacktestClient, Bots as BotsClient, Scanner as ScannerClient,
    Strategies as StrategiesClient,
};
pub use crate::domain::trade::client::Trades as TradesClient;

/// The primary entry point: REST command gateway plus stream configuration.
///
/// Provides nested sub-client accessors for each domain:
/// `client.bot()`, `client.config()`, `client.risk()`, etc.
pub struct DeskClient {
    pub(crate) http: DeskHttp,
    pub(crate) ws_config: WsConfig,
    pub(crate) disabled: HashSet<Endpoint>,
    pub(crate) running: RunningFlag,
}

impl DeskClient {
    pub fn builder() -> DeskClientBuilder {
        DeskClientBuilder::default()
    }

    /// Build from `TRADEDESK_*` environment variables.
    pub fn from_env() -> Result<DeskClient, SdkError> {
        DeskClientBuilder::from_config(DeskConfig::from_env()).build()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn bot(&self) -> Bot<'_> {
        Bot { client: self }
    }

    pub fn config(&self) -> Config<'_> {
        Config { client: self }
    }

    pub fn scanner(&self) -> Scanner<'_> {
        Scanner { client: self }
    }

    pub fn history(&self) -> History<'_> {
        History { client: self }
    }

    pub fn risk(&self) -> Risk<'_> {
        Risk { client: self }
    }

    pub fn portfolio(&self) -> Portfolio<'_> {
        Portfolio { client: self }
    }

    pub fn orders(&self) -> Orders<'_> {
        Orders { client: self }
    }

    pub fn trades(&self) -> Trades<'_> {
        Trades { client: self }
    }

    pub fn market(&self) -> Market<'_> {
        Market { client: self }
    }

    pub fn strategies(&self) -> Strategies<'_> {
        Strategies { client: self }
    }

    pub fn bots(&self) -> Bots<'_> {
        Bots { client: self }
    }

    pub fn backtest(&self) -> Backtest<'_> {
        Backtest { client: self }
    }

    /// Keys, audit log and dashboard summary.
    pub fn admin(&self) -> Admin<'_> {
        Admin { client: self }
    }

    // ── Shared state ─────────────────────────────────────────────────────

    /// The shared running flag, updated by bot commands. Feed it stream
    /// events with [`RunningFlag::apply`] to keep it live.
    pub fn running(&self) -> &RunningFlag {
        &self.running
    }

    /// Replace the bearer token for subsequent requests.
    pub async fn set_token(&self, token: Option<String>) {
        self.http.set_auth_token(token).await;
    }

    /// Get a WS config for creating a WebSocket connection.
    ///
    /// The WS client is not embedded in `DeskClient` because stream lifetimes
    /// are managed by the application (e.g. tied to a view's lifecycle).
    pub fn ws_config(&self) -> &WsConfig {
        &self.ws_config
    }

    /// Create a new native WS client from the current config.
    #[cfg(feature = "ws-native")]
    pub fn ws_native(&self) -> crate::ws::native::WsClient {
        crate::ws::native::WsClient::new(self.ws_config.clone())
    }

    pub fn is_available(&self, endpoint: Endpoint) -> bool {
        !self.disabled.contains(&endpoint)
    }

    /// Short-circuit endpoints the backend does not serve yet, without a request.
    pub(crate) fn ensure_available(&self, endpoint: Endpoint) -> Result<(), HttpError> {
        if self.is_available(endpoint) {
            return Ok(());
        }
        tracing::warn!("Endpoint {} is not available on this backend", endpoint);
        Err(HttpError::FeatureUnavailable(endpoint.to_string()))
    }
}

impl Clone for DeskClient {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            ws_config: self.ws_config.clone(),
            disabled: self.disabled.clone(),
            running: self.running.clone(),
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct DeskClientBuilder {
    config: DeskConfig,
    ws_config: WsConfig,
    running: Option<RunningFlag>,
}

impl Default for DeskClientBuilder {
    fn default() -> Self {
        Self::from_config(DeskConfig::default())
    }
}

impl DeskClientBuilder {
    pub fn from_config(config: DeskConfig) -> Self {
        Self {
            config,
            ws_config: WsConfig::default(),
            running: None,
        }
    }

    pub fn base_url(mut self, url: &str) -> Self {
        self.config.api_base = url.trim().trim_end_matches('/').to_string();
        self
    }

    pub fn token(mut self, token: &str) -> Self {
        self.config.token = Some(token.to_string());
        self
    }

    /// Explicit stream URL; replaces the one derived from the base URL.
    pub fn ws_url(mut self, url: &str) -> Self {
        self.config.ws_override = Some(url.to_string());
        self
    }

    /// Report `endpoint` as unavailable instead of calling it.
    pub fn disable(mut self, endpoint: Endpoint) -> Self {
        self.config.disabled_endpoints.insert(endpoint);
        self
    }

    /// Stream settings other than the URL (reconnect policy, capacities).
    pub fn ws_config(mut self, ws_config: WsConfig) -> Self {
        self.ws_config = ws_config;
        self
    }

    /// Share an existing running flag (e.g. one already fed by a stream).
    pub fn running_flag(mut self, running: RunningFlag) -> Self {
        self.running = Some(running);
        self
    }

    pub fn build(self) -> Result<DeskClient, SdkError> {
        if self.config.api_base.is_empty() {
            return Err(SdkError::Validation("API base URL is empty".into()));
        }
        let ws_config = WsConfig {
            url: self.config.ws_base(),
            ..self.ws_config
        };
        Ok(DeskClient {
            http: DeskHttp::new(&self.config.api_base, self.config.token.clone()),
            ws_config,
            disabled: self.config.disabled_endpoints,
            running: self.running.unwrap_or_default(),
        })
    }
}
