//! Order domain: order lifecycle events, open order tracking.

#[cfg(feature = "http")]
pub mod client;
pub mod state;

use crate::shared::serde_util::{loose_decimal, loose_millis};
use crate::shared::{now_millis, OrderId, Side};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use state::OpenOrders;

// ─── OrderStatus ─────────────────────────────────────────────────────────────

/// Normalized order lifecycle status.
///
/// Exchange, paper and OMS producers spell these differently
/// (`CANCELED`/`CANCELLED`, `PARTIALLY_FILLED`/`PARTIAL`); all map here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    #[default]
    New,
    PartiallyFilled,
    Filled,
    Canceled,
    Rejected,
    Expired,
    Other(String),
}

impl OrderStatus {
    /// An empty status is a freshly placed order.
    pub fn parse(s: &str) -> Self {
        let upper = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        match upper.as_str() {
            "" | "NEW" | "OPEN" | "ACCEPTED" | "PLACED" => OrderStatus::New,
            "PARTIALLY_FILLED" | "PARTIAL" | "PARTIAL_FILL" => OrderStatus::PartiallyFilled,
            "FILLED" | "FILL" | "DONE" => OrderStatus::Filled,
            "CANCELED" | "CANCELLED" | "CANCEL" => OrderStatus::Canceled,
            "REJECTED" | "REJECT" => OrderStatus::Rejected,
            "EXPIRED" | "EXPIRE" => OrderStatus::Expired,
            _ => OrderStatus::Other(upper),
        }
    }

    /// Terminal states remove an order from the open set.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Filled
                | OrderStatus::Canceled
                | OrderStatus::Rejected
                | OrderStatus::Expired
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::New => "NEW",
            OrderStatus::PartiallyFilled => "PARTIALLY_FILLED",
            OrderStatus::Filled => "FILLED",
            OrderStatus::Canceled => "CANCELED",
            OrderStatus::Rejected => "REJECTED",
            OrderStatus::Expired => "EXPIRED",
            OrderStatus::Other(s) => s,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── OrderEvent ──────────────────────────────────────────────────────────────

/// A normalized order lifecycle event from the stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderEvent {
    pub id: OrderId,
    pub symbol: String,
    pub side: Side,
    pub price: Decimal,
    pub qty: Decimal,
    pub status: OrderStatus,
    /// Epoch millis.
    pub ts: i64,
    pub reason: Option<String>,
}

// ─── REST payloads ───────────────────────────────────────────────────────────

/// One row of `GET /api/orders` (live order list from the OMS).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    #[serde(default)]
    pub id: OrderId,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub side: Option<String>,
    #[serde(default, deserialize_with = "loose_decimal::deserialize")]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "loose_decimal::deserialize")]
    pub qty: Option<Decimal>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "loose_millis::deserialize")]
    pub ts: Option<i64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl From<OrderRecord> for OrderEvent {
    fn from(rec: OrderRecord) -> Self {
        let ts = rec.ts.unwrap_or_else(now_millis);
        OrderEvent {
            id: rec.id,
            symbol: rec.symbol,
            side: rec
                .side
                .as_deref()
                .and_then(Side::parse_loose)
                .unwrap_or_default(),
            price: rec.price.unwrap_or_default(),
            qty: rec.qty.unwrap_or_default(),
            status: OrderStatus::parse(rec.status.as_deref().unwrap_or_default()),
            ts,
            reason: None,
        }
    }
}
