//! Trade domain: executions from the stream and fill history.

#[cfg(feature = "http")]
pub mod client;
pub mod state;

use crate::shared::serde_util::{loose_decimal, loose_millis};
use crate::shared::Side;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use state::{FillFeed, TradeTape};

/// A normalized trade execution (`trade` or `fill` frame).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trade {
    /// Trade or order id; empty when the producer sent none.
    pub id: String,
    pub symbol: String,
    pub side: Side,
    pub price: Decimal,
    pub qty: Decimal,
    /// Realized PnL, when the producer reports it.
    pub pnl: Option<Decimal>,
    /// Epoch millis.
    pub ts: i64,
}

impl Trade {
    pub fn notional(&self) -> Decimal {
        self.price * self.qty
    }
}

// ─── REST payloads ───────────────────────────────────────────────────────────

/// One row of `GET /api/trades/fills`, `/api/orders/fills` or `/api/strategy/{sid}/fills`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillRecord {
    #[serde(default, deserialize_with = "loose_millis::deserialize")]
    pub ts: Option<i64>,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub symbol: String,
    #[serde(default, deserialize_with = "loose_decimal::deserialize")]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "loose_decimal::deserialize")]
    pub qty: Option<Decimal>,
    #[serde(default)]
    pub side: Option<String>,
    #[serde(default)]
    pub exchange: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub strategy_id: Option<String>,
}

impl From<FillRecord> for Trade {
    fn from(rec: FillRecord) -> Self {
        Trade {
            id: rec.order_id.unwrap_or_default(),
            symbol: rec.symbol,
            side: rec
                .side
                .as_deref()
                .and_then(Side::parse_loose)
                .unwrap_or_default(),
            price: rec.price.unwrap_or_default(),
            qty: rec.qty.unwrap_or_default(),
            pnl: None,
            ts: rec.ts.unwrap_or_else(crate::shared::now_millis),
        }
    }
}

/// Filters for the fill and realized-PnL endpoints. Unset fields are omitted.
#[derive(Debug, Clone, Default)]
pub struct FillQuery {
    pub symbol: Option<String>,
    pub exchange: Option<String>,
    pub category: Option<String>,
    pub strategy_id: Option<String>,
    pub limit: Option<u32>,
}

impl FillQuery {
    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn strategy(mut self, strategy_id: impl Into<String>) -> Self {
        self.strategy_id = Some(strategy_id.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Render as a query string (`?symbol=..&limit=..`), or empty.
    pub fn to_query(&self) -> String {
        let mut params = Vec::new();
        let pairs = [
            ("symbol", &self.symbol),
            ("exchange", &self.exchange),
            ("category", &self.category),
            ("strategy_id", &self.strategy_id),
        ];
        for (key, value) in pairs {
            if let Some(v) = value {
                params.push(format!("{}={}", key, urlencoding::encode(v)));
            }
        }
        if let Some(l) = self.limit {
            params.push(format!("limit={}", l));
        }
        if params.is_empty() {
            String::new()
        } else {
            format!("?{}", params.join("&"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_query_string() {
        let q = FillQuery::default().symbol("BTC USDT").limit(50);
        assert_eq!(q.to_query(), "?symbol=BTC%20USDT&limit=50");
        assert_eq!(FillQuery::default().to_query(), "");
    }

    #[test]
    fn test_fill_record_into_trade() {
        let rec: FillRecord = serde_json::from_str(
            r#"{"ts": 1700000000.5, "order_id": "abc", "symbol": "BTCUSDT", "price": 42000.5, "qty": 0.01, "side": "SELL"}"#,
        )
        .unwrap();
        let t = Trade::from(rec);
        assert_eq!(t.id, "abc");
        assert_eq!(t.side, Side::Sell);
        assert_eq!(t.ts, 1_700_000_000_500);
        assert_eq!(t.notional(), Decimal::new(420005, 3));
    }
}
