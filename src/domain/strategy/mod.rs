//! Strategy domain: pair scanner, strategy registry, ad-hoc bots, backtests.

#[cfg(feature = "http")]
pub mod client;

use crate::shared::serde_util::{loose_decimal, loose_string};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ─── Scanner ─────────────────────────────────────────────────────────────────

/// One scored candidate pair from `POST /api/scanner/scan`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairScore {
    pub symbol: String,
    #[serde(default, deserialize_with = "loose_decimal::deserialize")]
    pub bid: Option<Decimal>,
    #[serde(default, deserialize_with = "loose_decimal::deserialize")]
    pub ask: Option<Decimal>,
    #[serde(default)]
    pub spread_bps: f64,
    #[serde(default)]
    pub vol_usdt_24h: f64,
    #[serde(default)]
    pub vol_bps_1m: f64,
    #[serde(default)]
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResponse {
    pub best: PairScore,
    #[serde(default)]
    pub top: Vec<PairScore>,
}

// ─── Strategies ──────────────────────────────────────────────────────────────

/// Registry entry from `GET /api/strategies`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyInfo {
    #[serde(default, deserialize_with = "loose_string::deserialize")]
    pub id: String,
    #[serde(default)]
    pub running: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Scope of a strategy report or fill listing. Defaults match the backend's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportScope {
    pub symbol: String,
    pub exchange: String,
    pub category: String,
}

impl Default for ReportScope {
    fn default() -> Self {
        Self {
            symbol: "BTCUSDT".to_string(),
            exchange: "binance".to_string(),
            category: "usdt".to_string(),
        }
    }
}

impl ReportScope {
    pub fn new(
        symbol: impl Into<String>,
        exchange: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            exchange: exchange.into(),
            category: category.into(),
        }
    }

    pub fn to_query(&self) -> String {
        format!(
            "symbol={}&exchange={}&category={}",
            urlencoding::encode(&self.symbol),
            urlencoding::encode(&self.exchange),
            urlencoding::encode(&self.category)
        )
    }
}

/// `GET /api/strategy/{sid}/report`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyReport {
    #[serde(default)]
    pub strategy: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub exchange: String,
    #[serde(default)]
    pub category: String,
    /// Metric set computed by the backend; keys vary per strategy.
    #[serde(default)]
    pub report: Value,
}

// ─── Bots ────────────────────────────────────────────────────────────────────

/// Body of `POST /api/bots`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotLaunch {
    pub strategy_id: String,
    pub exchange: String,
    pub symbol: String,
    pub category: String,
    pub side: String,
    pub qty: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_profile: Option<String>,
}

impl BotLaunch {
    pub fn new(
        strategy_id: impl Into<String>,
        exchange: impl Into<String>,
        symbol: impl Into<String>,
    ) -> Self {
        Self {
            strategy_id: strategy_id.into(),
            exchange: exchange.into(),
            symbol: symbol.into(),
            category: "spot".to_string(),
            side: "buy".to_string(),
            qty: Decimal::new(1, 3),
            risk_profile: None,
        }
    }
}

/// A launched bot, as listed by `GET /api/bots`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub strategy_id: String,
    #[serde(default)]
    pub exchange: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub side: String,
    #[serde(default, deserialize_with = "loose_decimal::deserialize")]
    pub qty: Option<Decimal>,
    #[serde(default)]
    pub risk_profile: Option<String>,
}

// ─── Backtest ────────────────────────────────────────────────────────────────

/// Result of `POST /api/backtest/run`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    #[serde(default)]
    pub trades: u64,
    #[serde(default, deserialize_with = "loose_decimal::deserialize")]
    pub pnl: Option<Decimal>,
    /// Final equity, or an equity series for engines that return one.
    #[serde(default)]
    pub equity: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_response() {
        let resp: ScanResponse = serde_json::from_str(
            r#"{"best": {"symbol": "SOLUSDT", "bid": 150.1, "ask": 150.2, "spread_bps": 6.6,
                "vol_usdt_24h": 1.5e9, "vol_bps_1m": 12.0, "score": 0.91},
                "top": [{"symbol": "SOLUSDT", "score": 0.91}, {"symbol": "ETHUSDT", "score": 0.5}]}"#,
        )
        .unwrap();
        assert_eq!(resp.best.symbol, "SOLUSDT");
        assert_eq!(resp.best.bid, Some(Decimal::new(1501, 1)));
        assert_eq!(resp.top.len(), 2);
        assert_eq!(resp.top[1].spread_bps, 0.0);
    }

    #[test]
    fn test_strategy_info_numeric_id() {
        let rows: Vec<StrategyInfo> = serde_json::from_str(
            r#"[{"id": 4, "name": "grid", "running": true}, {"id": "sma"}]"#,
        )
        .unwrap();
        assert_eq!(rows[0].id, "4");
        assert!(rows[0].running);
        assert_eq!(rows[0].extra["name"], "grid");
        assert!(!rows[1].running);
    }

    #[test]
    fn test_report_scope_query() {
        assert_eq!(
            ReportScope::default().to_query(),
            "symbol=BTCUSDT&exchange=binance&category=usdt"
        );
    }

    #[test]
    fn test_bot_launch_defaults() {
        let body = serde_json::to_value(BotLaunch::new("sma", "binance", "BTCUSDT")).unwrap();
        assert_eq!(body["category"], "spot");
        assert_eq!(body["side"], "buy");
        assert!(body.get("risk_profile").is_none());
    }

    #[test]
    fn test_backtest_result() {
        let res: BacktestResult =
            serde_json::from_str(r#"{"trades": 4, "pnl": 12.5, "equity": 112.5}"#).unwrap();
        assert_eq!(res.trades, 4);
        assert_eq!(res.pnl, Some(Decimal::new(125, 1)));
    }
}
