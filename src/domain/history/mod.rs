//! History domain: persisted order and trade journals.

#[cfg(feature = "http")]
pub mod client;

use crate::shared::serde_util::{loose_decimal, loose_millis};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use crate::shared::Items as HistoryResponse;

/// Which journal a clear or export targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryKind {
    Orders,
    Trades,
    #[default]
    All,
}

impl HistoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryKind::Orders => "orders",
            HistoryKind::Trades => "trades",
            HistoryKind::All => "all",
        }
    }
}

impl std::fmt::Display for HistoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row counts of both journals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryStats {
    #[serde(default)]
    pub orders: u64,
    #[serde(default)]
    pub trades: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderHistoryItem {
    #[serde(default)]
    pub id: i64,
    #[serde(default, deserialize_with = "loose_millis::deserialize")]
    pub ts: Option<i64>,
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub side: String,
    #[serde(default, rename = "type")]
    pub order_type: String,
    #[serde(default, deserialize_with = "loose_decimal::deserialize")]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "loose_decimal::deserialize")]
    pub qty: Option<Decimal>,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeHistoryItem {
    #[serde(default)]
    pub id: i64,
    #[serde(default, deserialize_with = "loose_millis::deserialize")]
    pub ts: Option<i64>,
    #[serde(default, rename = "type")]
    pub trade_type: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub side: String,
    #[serde(default, deserialize_with = "loose_decimal::deserialize")]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "loose_decimal::deserialize")]
    pub qty: Option<Decimal>,
    #[serde(default, deserialize_with = "loose_decimal::deserialize")]
    pub pnl: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_history_page() {
        let page: HistoryResponse<OrderHistoryItem> = serde_json::from_str(
            r#"{"items": [{"id": 3, "ts": 1700000000.25, "event": "NEW", "symbol": "BTCUSDT",
                "side": "BUY", "type": "LIMIT", "price": 42000.5, "qty": null, "status": "NEW"}]}"#,
        )
        .unwrap();
        let item = &page.items[0];
        assert_eq!(item.order_type, "LIMIT");
        assert_eq!(item.ts, Some(1_700_000_000_250));
        assert_eq!(item.price, Some(Decimal::new(420005, 1)));
        assert_eq!(item.qty, None);
    }

    #[test]
    fn test_trade_history_pnl() {
        let item: TradeHistoryItem = serde_json::from_str(
            r#"{"id": 1, "ts": 1700000000000, "type": "SELL", "symbol": "ETHUSDT", "side": "SELL", "price": "2500", "qty": "0.5", "pnl": -1.5}"#,
        )
        .unwrap();
        assert_eq!(item.pnl, Some(Decimal::new(-15, 1)));
        assert_eq!(item.ts, Some(1_700_000_000_000));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(HistoryKind::default().as_str(), "all");
        assert_eq!(HistoryKind::Trades.to_string(), "trades");
        assert_eq!(serde_json::to_string(&HistoryKind::Orders).unwrap(), r#""orders""#);
    }
}
