//! Market domain: top-of-book ticks and candles.

#[cfg(feature = "http")]
pub mod client;
pub mod state;

use crate::shared::serde_util::loose_decimal;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use state::MarketTicker;

/// Best bid/ask/last for one symbol from a `market` frame.
///
/// Fields the producer omitted are `None`; the ticker keeps the previous value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketTick {
    pub symbol: String,
    pub bid: Option<Decimal>,
    pub ask: Option<Decimal>,
    pub last: Option<Decimal>,
    /// Epoch millis.
    pub ts: i64,
}

impl MarketTick {
    pub fn mid_price(&self) -> Option<Decimal> {
        match (self.bid, self.ask) {
            (Some(bid), Some(ask)) => Some((bid + ask) / Decimal::from(2)),
            _ => None,
        }
    }

    pub fn spread(&self) -> Option<Decimal> {
        match (self.bid, self.ask) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }
}

/// One OHLCV candle from `GET /api/market/ohlcv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Candle open time as sent by the backend (epoch seconds).
    pub ts: i64,
    #[serde(deserialize_with = "required_decimal")]
    pub o: Decimal,
    #[serde(deserialize_with = "required_decimal")]
    pub h: Decimal,
    #[serde(deserialize_with = "required_decimal")]
    pub l: Decimal,
    #[serde(deserialize_with = "required_decimal")]
    pub c: Decimal,
    #[serde(default, deserialize_with = "loose_decimal::deserialize")]
    pub v: Option<Decimal>,
    #[serde(default)]
    pub tf: String,
    #[serde(default)]
    pub symbol: String,
}

fn required_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    loose_decimal::deserialize(deserializer)?
        .ok_or_else(|| serde::de::Error::custom("expected a numeric price"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candle_from_floats() {
        let c: Candle = serde_json::from_str(
            r#"{"ts": 1700000000, "o": 1.5, "h": 2, "l": "1.25", "c": 1.75, "v": 10, "tf": "1m", "symbol": "BTCUSDT"}"#,
        )
        .unwrap();
        assert_eq!(c.o, Decimal::new(15, 1));
        assert_eq!(c.l, Decimal::new(125, 2));
        assert_eq!(c.v, Some(Decimal::from(10)));
    }

    #[test]
    fn test_candle_rejects_missing_price() {
        let r = serde_json::from_str::<Candle>(r#"{"ts": 1, "o": null, "h": 1, "l": 1, "c": 1}"#);
        assert!(r.is_err());
    }

    #[test]
    fn test_tick_mid_and_spread() {
        let tick = MarketTick {
            symbol: "X".into(),
            bid: Some(Decimal::from(99)),
            ask: Some(Decimal::from(101)),
            last: None,
            ts: 0,
        };
        assert_eq!(tick.mid_price(), Some(Decimal::from(100)));
        assert_eq!(tick.spread(), Some(Decimal::from(2)));
    }
}
