//! Frame normalization: raw stream text to [`DomainEvent`].
//!
//! Producers disagree on field names, number encodings and timestamp units.
//! Everything is resolved here through the rules in [`super::fields`], so
//! reducers only ever see canonical values.

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use super::fields::{self, coerce_decimal, coerce_string};
use super::DomainEvent;
use crate::domain::equity::EquityPoint;
use crate::domain::market::MarketTick;
use crate::domain::order::{OrderEvent, OrderStatus};
use crate::domain::orderbook::{BookLevel, BookUpdate};
use crate::domain::status::{StatusUpdate, WsStats};
use crate::domain::trade::Trade;
use crate::shared::{now_millis, OrderId, Side};

/// Frame `type` assumed when a JSON object carries none.
pub const DEFAULT_KIND: &str = "msg";

/// Classify one inbound text frame.
///
/// Returns `None` only for empty frames. Text that is not a JSON object is
/// forwarded as [`DomainEvent::Raw`]; unknown `type`s become
/// [`DomainEvent::Other`]. Never panics.
pub fn normalize(text: &str) -> Option<DomainEvent> {
    if text.trim().is_empty() {
        return None;
    }

    let frame = match serde_json::from_str::<Value>(text) {
        Ok(value @ Value::Object(_)) => value,
        Ok(_) | Err(_) => {
            tracing::trace!("Forwarding non-object frame as raw ({} bytes)", text.len());
            return Some(DomainEvent::Raw(text.to_string()));
        }
    };

    let kind = frame
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_KIND)
        .to_string();

    let event = match kind.as_str() {
        "order_event" => DomainEvent::OrderEvent(order_event(&frame)),
        "trade" => DomainEvent::Trade(trade(&frame)),
        "fill" => DomainEvent::Fill(trade(&frame)),
        "market" => DomainEvent::Market(market_tick(&frame)),
        "status" => DomainEvent::Status(status_update(&frame)),
        "stats" => DomainEvent::Stats(ws_stats(&frame)),
        "diag" => DomainEvent::Diag(text_of(&frame)),
        "error" => DomainEvent::Error(text_of(&frame)),
        "equity" => match equity_point(&frame, &fields::EQUITY_VALUE) {
            Some(point) => DomainEvent::Equity(point),
            None => DomainEvent::Other {
                kind,
                payload: frame,
            },
        },
        "bank" => match equity_point(&frame, &fields::BANK_VALUE) {
            Some(point) => DomainEvent::Equity(point),
            None => DomainEvent::Other {
                kind,
                payload: frame,
            },
        },
        "book" => DomainEvent::Book(book_update(&frame)),
        _ => DomainEvent::Other {
            kind,
            payload: frame,
        },
    };
    Some(event)
}

// ─── Per-kind builders ───────────────────────────────────────────────────────

fn order_event(frame: &Value) -> OrderEvent {
    OrderEvent {
        id: OrderId::from(fields::ID.string(frame).unwrap_or_default()),
        symbol: symbol(frame),
        side: side(frame),
        price: fields::PRICE.decimal(frame).unwrap_or(Decimal::ZERO),
        qty: fields::QTY.decimal(frame).unwrap_or(Decimal::ZERO),
        status: OrderStatus::parse(&fields::ORDER_STATUS.string(frame).unwrap_or_default()),
        ts: timestamp(frame),
        reason: fields::REASON.string(frame),
    }
}

fn trade(frame: &Value) -> Trade {
    Trade {
        id: fields::ID.string(frame).unwrap_or_default(),
        symbol: symbol(frame),
        side: side(frame),
        price: fields::PRICE.decimal(frame).unwrap_or(Decimal::ZERO),
        qty: fields::QTY.decimal(frame).unwrap_or(Decimal::ZERO),
        pnl: fields::PNL.decimal(frame),
        ts: timestamp(frame),
    }
}

fn market_tick(frame: &Value) -> MarketTick {
    MarketTick {
        symbol: symbol(frame),
        bid: fields::BID.decimal(frame),
        ask: fields::ASK.decimal(frame),
        last: fields::LAST.decimal(frame),
        ts: timestamp(frame),
    }
}

fn status_update(frame: &Value) -> StatusUpdate {
    StatusUpdate {
        running: frame.get("running").and_then(Value::as_bool),
        symbol: frame.get("symbol").and_then(coerce_string),
        equity: frame.get("equity").and_then(coerce_decimal),
        metrics: object_at(frame, "metrics"),
        cfg: object_at(frame, "cfg"),
    }
}

fn ws_stats(frame: &Value) -> WsStats {
    WsStats {
        ws_clients: frame
            .get("ws_clients")
            .and_then(|v| v.as_u64().or_else(|| v.as_f64().map(|f| f.max(0.0) as u64)))
            .unwrap_or(0),
        ws_rate: frame.get("ws_rate").and_then(Value::as_f64).unwrap_or(0.0),
    }
}

fn equity_point(frame: &Value, rule: &fields::FieldRule) -> Option<EquityPoint> {
    let value = rule.decimal(frame)?;
    Some(EquityPoint {
        ts: timestamp(frame),
        value,
    })
}

fn book_update(frame: &Value) -> BookUpdate {
    BookUpdate {
        symbol: symbol(frame),
        bids: levels(frame.get("bids")),
        asks: levels(frame.get("asks")),
        ts: timestamp(frame),
    }
}

// ─── Field helpers ───────────────────────────────────────────────────────────

fn symbol(frame: &Value) -> String {
    fields::SYMBOL.string(frame).unwrap_or_default()
}

fn timestamp(frame: &Value) -> i64 {
    fields::TIMESTAMP.millis(frame).unwrap_or_else(now_millis)
}

/// Side strings first, then the `isBuyer` flag, then `Buy`.
fn side(frame: &Value) -> Side {
    fields::SIDE
        .string(frame)
        .and_then(|s| Side::parse_loose(&s))
        .or_else(|| fields::IS_BUYER.boolean(frame).map(Side::from_is_buyer))
        .unwrap_or_default()
}

/// Diagnostic text, or the whole frame when no text field is present.
fn text_of(frame: &Value) -> String {
    fields::TEXT
        .string(frame)
        .unwrap_or_else(|| frame.to_string())
}

fn object_at(frame: &Value, key: &str) -> Map<String, Value> {
    frame
        .get(key)
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}

/// Levels arrive as `[price, size]` pairs or `{price, size|qty}` objects.
/// Unparseable entries are skipped.
fn levels(value: Option<&Value>) -> Vec<BookLevel> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items.iter().filter_map(level).collect()
}

fn level(item: &Value) -> Option<BookLevel> {
    let (price, size) = match item {
        Value::Array(pair) if pair.len() >= 2 => (coerce_decimal(&pair[0])?, coerce_decimal(&pair[1])?),
        Value::Object(obj) => {
            let price = obj.get("price").or_else(|| obj.get("p")).and_then(coerce_decimal)?;
            let size = ["size", "qty", "q", "quantity"]
                .iter()
                .filter_map(|k| obj.get(*k))
                .find_map(coerce_decimal)?;
            (price, size)
        }
        _ => return None,
    };
    Some(BookLevel { price, size })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_frame_is_dropped() {
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("  \n"), None);
    }

    #[test]
    fn test_non_json_forwarded_raw() {
        assert_eq!(normalize("hello"), Some(DomainEvent::Raw("hello".into())));
        assert_eq!(normalize("[1,2]"), Some(DomainEvent::Raw("[1,2]".into())));
        assert_eq!(normalize("42"), Some(DomainEvent::Raw("42".into())));
    }

    #[test]
    fn test_missing_type_defaults_to_msg() {
        match normalize(r#"{"text": "hi"}"#) {
            Some(DomainEvent::Other { kind, payload }) => {
                assert_eq!(kind, "msg");
                assert_eq!(payload["text"], "hi");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_order_event_legacy_keys() {
        let ev = normalize(
            r#"{"type":"order_event","evt":"NEW","orderId":"A1","symbol":"BTCUSDT","side":"BUY","p":"100.5","origQty":"2"}"#,
        );
        let Some(DomainEvent::OrderEvent(order)) = ev else {
            panic!("expected order event");
        };
        assert_eq!(order.id.as_str(), "A1");
        assert_eq!(order.status, OrderStatus::New);
        assert_eq!(order.side, Side::Buy);
        assert_eq!(order.price, Decimal::new(1005, 1));
        assert_eq!(order.qty, Decimal::from(2));
    }

    #[test]
    fn test_order_event_nested_order_object() {
        let ev = normalize(
            r#"{"type":"order_event","order":{"orderId":7,"symbol":"ETHUSDT","side":"SELL","price":"2500","origQty":"0.1","status":"CANCELLED","updateTime":1700000000123}}"#,
        );
        let Some(DomainEvent::OrderEvent(order)) = ev else {
            panic!("expected order event");
        };
        assert_eq!(order.id.as_str(), "7");
        assert_eq!(order.symbol, "ETHUSDT");
        assert_eq!(order.side, Side::Sell);
        assert_eq!(order.status, OrderStatus::Canceled);
        assert_eq!(order.ts, 1_700_000_000_123);
    }

    #[test]
    fn test_missing_fields_get_sentinels() {
        let before = now_millis();
        let Some(DomainEvent::Trade(t)) = normalize(r#"{"type":"trade"}"#) else {
            panic!("expected trade");
        };
        assert_eq!(t.price, Decimal::ZERO);
        assert_eq!(t.qty, Decimal::ZERO);
        assert_eq!(t.symbol, "");
        assert_eq!(t.side, Side::Buy);
        assert!(t.ts >= before);
    }

    #[test]
    fn test_trade_side_from_is_buyer() {
        let Some(DomainEvent::Trade(t)) =
            normalize(r#"{"type":"trade","price":1,"qty":1,"isBuyer":false,"ts":1700000000.5,"pnl":"-0.25"}"#)
        else {
            panic!("expected trade");
        };
        assert_eq!(t.side, Side::Sell);
        assert_eq!(t.ts, 1_700_000_000_500);
        assert_eq!(t.pnl, Some(Decimal::new(-25, 2)));
    }

    #[test]
    fn test_trade_legacy_short_keys() {
        let Some(DomainEvent::Trade(t)) =
            normalize(r#"{"type":"trade","p":100,"q":2,"isBuyer":true}"#)
        else {
            panic!("expected trade");
        };
        assert_eq!(t.price, Decimal::from(100));
        assert_eq!(t.qty, Decimal::from(2));
        assert_eq!(t.side, Side::Buy);
    }

    #[test]
    fn test_fill_is_separate_variant() {
        assert!(matches!(
            normalize(r#"{"type":"fill","symbol":"BTCUSDT","price":1,"qty":1}"#),
            Some(DomainEvent::Fill(_))
        ));
    }

    #[test]
    fn test_market_tick_short_keys() {
        let Some(DomainEvent::Market(m)) =
            normalize(r#"{"type":"market","s":"BTCUSDT","b":"100","a":"101"}"#)
        else {
            panic!("expected market");
        };
        assert_eq!(m.symbol, "BTCUSDT");
        assert_eq!(m.bid, Some(Decimal::from(100)));
        assert_eq!(m.ask, Some(Decimal::from(101)));
        assert_eq!(m.last, None);
    }

    #[test]
    fn test_status_frame() {
        let Some(DomainEvent::Status(s)) = normalize(
            r#"{"type":"status","running":true,"equity":null,"symbol":"BTCUSDT","metrics":{"fills":2}}"#,
        ) else {
            panic!("expected status");
        };
        assert_eq!(s.running, Some(true));
        assert_eq!(s.equity, None);
        assert_eq!(s.symbol.as_deref(), Some("BTCUSDT"));
        assert_eq!(s.metrics["fills"], 2);
    }

    #[test]
    fn test_bank_and_equity_frames() {
        let Some(DomainEvent::Equity(p)) = normalize(r#"{"type":"bank","equity":"1000.5","ts":1}"#)
        else {
            panic!("expected equity");
        };
        assert_eq!(p.value, Decimal::new(10005, 1));
        let Some(DomainEvent::Equity(p)) = normalize(r#"{"type":"equity","value":990}"#) else {
            panic!("expected equity");
        };
        assert_eq!(p.value, Decimal::from(990));
        assert!(matches!(
            normalize(r#"{"type":"equity"}"#),
            Some(DomainEvent::Other { .. })
        ));
    }

    #[test]
    fn test_book_levels_pairs_and_objects() {
        let Some(DomainEvent::Book(book)) = normalize(
            r#"{"type":"book","symbol":"BTCUSDT","bids":[["100","1.5"],[99,2],["bad"]],"asks":[{"price":101,"qty":"0.5"}],"ts":1700000000}"#,
        ) else {
            panic!("expected book");
        };
        assert_eq!(book.bids.len(), 2);
        assert_eq!(book.bids[0].size, Decimal::new(15, 1));
        assert_eq!(book.asks[0].price, Decimal::from(101));
        assert_eq!(book.ts, 1_700_000_000_000);
    }

    #[test]
    fn test_diag_and_error_text() {
        assert_eq!(
            normalize(r#"{"type":"diag","text":"MM: quoting"}"#),
            Some(DomainEvent::Diag("MM: quoting".into()))
        );
        assert_eq!(
            normalize(r#"{"type":"error","msg":"boom"}"#),
            Some(DomainEvent::Error("boom".into()))
        );
    }

    #[test]
    fn test_stats_frame() {
        assert_eq!(
            normalize(r#"{"type":"stats","ws_clients":3,"ws_rate":12.5}"#),
            Some(DomainEvent::Stats(WsStats {
                ws_clients: 3,
                ws_rate: 12.5
            }))
        );
    }
}
