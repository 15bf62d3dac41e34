//! Bot status domain: run state, metrics, stream statistics.

#[cfg(feature = "http")]
pub mod client;
pub mod state;

use crate::shared::serde_util::{loose_decimal, loose_millis};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use state::{DashboardState, RunningFlag};

/// Response of `GET /api/bot/status` and the `bot/start|stop|cmd` commands.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BotStatus {
    #[serde(default)]
    pub running: bool,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default, deserialize_with = "loose_decimal::deserialize")]
    pub equity: Option<Decimal>,
    #[serde(default, deserialize_with = "loose_millis::deserialize")]
    pub ts: Option<i64>,
    #[serde(default)]
    pub metrics: Map<String, Value>,
    #[serde(default)]
    pub cfg: Map<String, Value>,
}

/// A `status` frame from the stream. Every field is optional; absent
/// fields leave the consumer's previous value untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub running: Option<bool>,
    pub symbol: Option<String>,
    pub equity: Option<Decimal>,
    pub metrics: Map<String, Value>,
    pub cfg: Map<String, Value>,
}

impl From<BotStatus> for StatusUpdate {
    fn from(status: BotStatus) -> Self {
        StatusUpdate {
            running: Some(status.running),
            symbol: status.symbol,
            equity: status.equity,
            metrics: status.metrics,
            cfg: status.cfg,
        }
    }
}

/// A `stats` frame: stream server load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WsStats {
    pub ws_clients: u64,
    pub ws_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bot_status_minimal() {
        let s: BotStatus = serde_json::from_str(r#"{"running": true}"#).unwrap();
        assert!(s.running);
        assert!(s.metrics.is_empty());
        assert_eq!(s.symbol, None);
    }

    #[test]
    fn test_bot_status_full() {
        let s: BotStatus = serde_json::from_str(
            r#"{"running": false, "symbol": "BTCUSDT", "equity": 1000.5, "ts": 1700000000.0, "metrics": {"fills": 3}, "cfg": {"api": {"paper": true}}}"#,
        )
        .unwrap();
        assert_eq!(s.equity, Some(Decimal::new(10005, 1)));
        assert_eq!(s.ts, Some(1_700_000_000_000));
        assert_eq!(s.metrics["fills"], 3);
        let update = StatusUpdate::from(s);
        assert_eq!(update.running, Some(false));
    }
}
