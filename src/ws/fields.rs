//! Field extraction rules for loosely-shaped stream frames.
//!
//! The backend emits the same concept under several names depending on the
//! producer (exchange passthrough, paper engine, OMS). Each canonical field
//! has an ordered list of dot paths; the first present-and-coercible value
//! wins. Adding a new producer spelling means appending one path here.

use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// An ordered list of dot paths for one canonical field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub paths: &'static [&'static str],
}

pub const PRICE: FieldRule = FieldRule {
    name: "price",
    paths: &[
        "price",
        "p",
        "avgPrice",
        "stopPrice",
        "limitPrice",
        "order.price",
        "trade.price",
    ],
};

pub const QTY: FieldRule = FieldRule {
    name: "qty",
    paths: &[
        "qty",
        "q",
        "quantity",
        "origQty",
        "executedQty",
        "size",
        "order.qty",
        "order.origQty",
        "order.quantity",
        "trade.qty",
    ],
};

pub const ID: FieldRule = FieldRule {
    name: "id",
    paths: &["id", "orderId", "i", "order.orderId", "order.id", "trade.id"],
};

pub const SYMBOL: FieldRule = FieldRule {
    name: "symbol",
    paths: &["symbol", "s", "order.symbol", "trade.symbol"],
};

pub const ORDER_STATUS: FieldRule = FieldRule {
    name: "status",
    paths: &["evt", "status", "event", "X", "order.status"],
};

pub const TIMESTAMP: FieldRule = FieldRule {
    name: "ts",
    paths: &[
        "ts",
        "time",
        "T",
        "E",
        "updateTime",
        "transactTime",
        "order.updateTime",
        "order.transactTime",
        "trade.ts",
    ],
};

pub const SIDE: FieldRule = FieldRule {
    name: "side",
    paths: &["side", "S", "order.side", "trade.side"],
};

pub const IS_BUYER: FieldRule = FieldRule {
    name: "isBuyer",
    paths: &["isBuyer", "trade.isBuyer"],
};

pub const PNL: FieldRule = FieldRule {
    name: "pnl",
    paths: &["pnl", "realizedPnl", "trade.pnl"],
};

pub const REASON: FieldRule = FieldRule {
    name: "reason",
    paths: &["reason", "msg", "order.reason"],
};

pub const BID: FieldRule = FieldRule {
    name: "bid",
    paths: &["bestBid", "b", "bid", "bp"],
};

pub const ASK: FieldRule = FieldRule {
    name: "ask",
    paths: &["bestAsk", "a", "ask", "ap"],
};

pub const LAST: FieldRule = FieldRule {
    name: "last",
    paths: &["lastPrice", "p", "last"],
};

/// `equity` frames carry `value` first; `bank` frames carry `equity` first.
pub const EQUITY_VALUE: FieldRule = FieldRule {
    name: "equity",
    paths: &["value", "equity"],
};

pub const BANK_VALUE: FieldRule = FieldRule {
    name: "equity",
    paths: &["equity", "value"],
};

pub const TEXT: FieldRule = FieldRule {
    name: "text",
    paths: &["text", "msg", "message", "detail", "error"],
};

impl FieldRule {
    /// First path that resolves to a non-null value.
    pub fn lookup<'a>(&self, frame: &'a Value) -> Option<&'a Value> {
        self.paths
            .iter()
            .filter_map(|path| resolve_path(frame, path))
            .find(|v| !v.is_null())
    }

    pub fn decimal(&self, frame: &Value) -> Option<Decimal> {
        self.paths
            .iter()
            .filter_map(|path| resolve_path(frame, path))
            .find_map(coerce_decimal)
    }

    pub fn string(&self, frame: &Value) -> Option<String> {
        self.paths
            .iter()
            .filter_map(|path| resolve_path(frame, path))
            .find_map(coerce_string)
    }

    pub fn millis(&self, frame: &Value) -> Option<i64> {
        self.paths
            .iter()
            .filter_map(|path| resolve_path(frame, path))
            .find_map(coerce_millis)
    }

    pub fn boolean(&self, frame: &Value) -> Option<bool> {
        self.paths
            .iter()
            .filter_map(|path| resolve_path(frame, path))
            .find_map(Value::as_bool)
    }
}

/// Walk a dot path (`order.price`) into a JSON value.
pub fn resolve_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |current, key| current.as_object()?.get(key))
}

/// Numbers and numeric strings become `Decimal`; everything else is rejected.
pub fn coerce_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else if let Some(u) = n.as_u64() {
                Some(Decimal::from(u))
            } else {
                parse_decimal(&n.to_string())
            }
        }
        Value::String(s) => parse_decimal(s),
        _ => None,
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Non-empty strings pass through; numbers are rendered.
pub fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Anything below this is an epoch in seconds (`time.time()` style).
const SECONDS_THRESHOLD: f64 = 1e11;

/// Epoch numbers, numeric strings or RFC 3339 strings become epoch millis.
pub fn coerce_millis(value: &Value) -> Option<i64> {
    let raw = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let s = s.trim();
            match s.parse::<f64>() {
                Ok(v) => v,
                Err(_) => {
                    return chrono::DateTime::parse_from_rfc3339(s)
                        .ok()
                        .map(|dt| dt.timestamp_millis());
                }
            }
        }
        _ => return None,
    };

    if !raw.is_finite() || raw < 0.0 {
        return None;
    }
    if raw < SECONDS_THRESHOLD {
        Some((raw * 1000.0).round() as i64)
    } else {
        Some(raw.round() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_present_path_wins() {
        let frame = json!({ "p": "101.5", "order": { "price": 99 } });
        assert_eq!(PRICE.decimal(&frame), Some(Decimal::new(1015, 1)));
    }

    #[test]
    fn test_nested_path_fallback() {
        let frame = json!({ "order": { "orderId": 42, "origQty": "0.25" } });
        assert_eq!(ID.string(&frame).as_deref(), Some("42"));
        assert_eq!(QTY.decimal(&frame), Some(Decimal::new(25, 2)));
    }

    #[test]
    fn test_uncoercible_value_falls_through() {
        let frame = json!({ "price": "n/a", "p": 3 });
        assert_eq!(PRICE.decimal(&frame), Some(Decimal::from(3)));
    }

    #[test]
    fn test_null_is_not_present() {
        let frame = json!({ "symbol": null, "s": "BTCUSDT" });
        assert_eq!(SYMBOL.string(&frame).as_deref(), Some("BTCUSDT"));
        assert_eq!(SYMBOL.lookup(&frame), Some(&json!("BTCUSDT")));
    }

    #[test]
    fn test_seconds_are_scaled_to_millis() {
        assert_eq!(coerce_millis(&json!(1_700_000_000.25)), Some(1_700_000_000_250));
        assert_eq!(coerce_millis(&json!(1_700_000_000_123i64)), Some(1_700_000_000_123));
        assert_eq!(coerce_millis(&json!("1700000000")), Some(1_700_000_000_000));
    }

    #[test]
    fn test_rfc3339_timestamp() {
        let ms = coerce_millis(&json!("2024-01-01T00:00:00Z"));
        assert_eq!(ms, Some(1_704_067_200_000));
    }

    #[test]
    fn test_float_price() {
        assert_eq!(coerce_decimal(&json!(0.5)), Some(Decimal::new(5, 1)));
        assert_eq!(coerce_decimal(&json!(true)), None);
        assert_eq!(coerce_decimal(&json!("")), None);
    }

    #[test]
    fn test_resolve_path_through_non_object() {
        let frame = json!({ "order": 5 });
        assert!(resolve_path(&frame, "order.price").is_none());
    }
}
