//! Runtime configuration: API base, bearer token, stream endpoint.
//!
//! Values are injected at runtime (builder or environment), never hardcoded.
//! Environment variables:
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `TRADEDESK_API` | HTTP base of the backend | `http://127.0.0.1:8100` |
//! | `TRADEDESK_TOKEN` | Bearer token; empty disables the header | empty |
//! | `TRADEDESK_WS` | Full WebSocket base, overrides derivation | unset |
//! | `TRADEDESK_WS_SUFFIX` | Stream path appended to the derived base | `/ws` |
//! | `TRADEDESK_DISABLED` | Comma list of endpoints reported as unavailable | empty |

use std::collections::HashSet;
use std::env;

use crate::network::{ws_url_from_http, DEFAULT_API_URL, DEFAULT_WS_SUFFIX};

/// REST endpoints the gateway can report as deliberately unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    BotStatus,
    BotStart,
    BotStop,
    BotCommand,
    Config,
    Scanner,
    History,
    RiskStatus,
    RiskUnlock,
    RiskLimits,
    RiskPolicies,
    RiskLog,
    Portfolio,
    Orders,
    Backtest,
    Keys,
    Strategies,
    Dashboard,
    Audit,
    Bots,
    Trades,
    Market,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::BotStatus => "bot_status",
            Endpoint::BotStart => "bot_start",
            Endpoint::BotStop => "bot_stop",
            Endpoint::BotCommand => "bot_cmd",
            Endpoint::Config => "config",
            Endpoint::Scanner => "scanner",
            Endpoint::History => "history",
            Endpoint::RiskStatus => "risk_status",
            Endpoint::RiskUnlock => "risk_unlock",
            Endpoint::RiskLimits => "risk_limits",
            Endpoint::RiskPolicies => "risk_policies",
            Endpoint::RiskLog => "risk_log",
            Endpoint::Portfolio => "portfolio",
            Endpoint::Orders => "orders",
            Endpoint::Backtest => "backtest",
            Endpoint::Keys => "keys",
            Endpoint::Strategies => "strategies",
            Endpoint::Dashboard => "dashboard",
            Endpoint::Audit => "audit",
            Endpoint::Bots => "bots",
            Endpoint::Trades => "trades",
            Endpoint::Market => "market",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let all = [
            Endpoint::BotStatus,
            Endpoint::BotStart,
            Endpoint::BotStop,
            Endpoint::BotCommand,
            Endpoint::Config,
            Endpoint::Scanner,
            Endpoint::History,
            Endpoint::RiskStatus,
            Endpoint::RiskUnlock,
            Endpoint::RiskLimits,
            Endpoint::RiskPolicies,
            Endpoint::RiskLog,
            Endpoint::Portfolio,
            Endpoint::Orders,
            Endpoint::Backtest,
            Endpoint::Keys,
            Endpoint::Strategies,
            Endpoint::Dashboard,
            Endpoint::Audit,
            Endpoint::Bots,
            Endpoint::Trades,
            Endpoint::Market,
        ];
        let needle = s.trim().to_ascii_lowercase();
        all.into_iter().find(|e| e.as_str() == needle)
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection settings shared by the REST gateway and the stream client.
#[derive(Debug, Clone)]
pub struct DeskConfig {
    /// HTTP base of the backend, without trailing slash.
    pub api_base: String,
    /// Bearer token. `None` ⇒ no `Authorization` header.
    pub token: Option<String>,
    /// Explicit WebSocket base; replaces the derived one when set.
    pub ws_override: Option<String>,
    /// Path appended to the derived WebSocket base.
    pub ws_suffix: String,
    /// Endpoints answered locally with `FeatureUnavailable`.
    pub disabled_endpoints: HashSet<Endpoint>,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_URL.to_string(),
            token: None,
            ws_override: None,
            ws_suffix: DEFAULT_WS_SUFFIX.to_string(),
            disabled_endpoints: HashSet::new(),
        }
    }
}

fn env_str(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl DeskConfig {
    /// Build a config from `TRADEDESK_*` environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let disabled_endpoints = env_str("TRADEDESK_DISABLED")
            .map(|list| parse_endpoint_list(&list))
            .unwrap_or_default();

        Self {
            api_base: env_str("TRADEDESK_API")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base),
            token: env_str("TRADEDESK_TOKEN"),
            ws_override: env_str("TRADEDESK_WS"),
            ws_suffix: env_str("TRADEDESK_WS_SUFFIX").unwrap_or(defaults.ws_suffix),
            disabled_endpoints,
        }
    }

    /// The WebSocket base URL (without channel).
    pub fn ws_base(&self) -> String {
        match &self.ws_override {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => ws_url_from_http(&self.api_base, &self.ws_suffix),
        }
    }

    pub fn is_disabled(&self, endpoint: Endpoint) -> bool {
        self.disabled_endpoints.contains(&endpoint)
    }
}

fn parse_endpoint_list(list: &str) -> HashSet<Endpoint> {
    list.split(',')
        .filter(|s| !s.trim().is_empty())
        .filter_map(|name| {
            let parsed = Endpoint::parse(name);
            if parsed.is_none() {
                tracing::warn!("Ignoring unknown endpoint in TRADEDESK_DISABLED: {}", name.trim());
            }
            parsed
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ws_base_is_derived() {
        let config = DeskConfig::default();
        assert_eq!(config.ws_base(), "ws://127.0.0.1:8100/ws");
    }

    #[test]
    fn test_ws_override_wins() {
        let config = DeskConfig {
            ws_override: Some("wss://stream.example.com/feed/".into()),
            ..Default::default()
        };
        assert_eq!(config.ws_base(), "wss://stream.example.com/feed");
    }

    #[test]
    fn test_parse_endpoint_list() {
        let set = parse_endpoint_list("risk_status, RISK_UNLOCK,,bogus");
        assert_eq!(set.len(), 2);
        assert!(set.contains(&Endpoint::RiskStatus));
        assert!(set.contains(&Endpoint::RiskUnlock));
    }

    #[test]
    fn test_endpoint_round_trip_names() {
        assert_eq!(Endpoint::parse("bot_cmd"), Some(Endpoint::BotCommand));
        assert_eq!(Endpoint::BotCommand.to_string(), "bot_cmd");
        assert_eq!(Endpoint::parse("risk_log"), Some(Endpoint::RiskLog));
        assert_eq!(Endpoint::RiskLog.to_string(), "risk_log");
        assert_eq!(Endpoint::parse("nope"), None);
    }
}
