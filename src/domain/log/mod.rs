//! Log domain: one formatted line per stream event.

pub mod state;

use crate::shared::now_millis;
use crate::ws::DomainEvent;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use state::LogTail;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogLine {
    /// Local receive time, epoch millis.
    pub ts: i64,
    /// Frame kind (`order_event`, `trade`, `diag`, ...).
    pub kind: String,
    pub text: String,
}

impl LogLine {
    pub fn from_event(event: &DomainEvent) -> Self {
        Self::from_event_at(event, now_millis())
    }

    pub fn from_event_at(event: &DomainEvent, ts: i64) -> Self {
        let kind = match event {
            // Free text renders as a diagnostic line.
            DomainEvent::Raw(_) => "diag".to_string(),
            other => other.kind().to_string(),
        };
        LogLine {
            ts,
            kind,
            text: format_event(event),
        }
    }

    /// Case-insensitive match on kind or text.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        needle.is_empty()
            || self.kind.to_lowercase().contains(&needle)
            || self.text.to_lowercase().contains(&needle)
    }
}

fn opt(value: Option<Decimal>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Render an event the way the log pane shows it.
pub fn format_event(event: &DomainEvent) -> String {
    match event {
        DomainEvent::Status(s) => format!(
            "running={} equity={} symbol={}",
            s.running.map(|r| r.to_string()).unwrap_or_default(),
            opt(s.equity),
            s.symbol.as_deref().unwrap_or_default()
        ),
        DomainEvent::Diag(text) | DomainEvent::Raw(text) => text.clone(),
        DomainEvent::Error(text) => format!("ERROR {}", text),
        DomainEvent::Stats(st) => format!("ws_clients={} ws_rate={}", st.ws_clients, st.ws_rate),
        DomainEvent::OrderEvent(o) => {
            format!("ORDER {} {} @ {} x {}", o.status, o.side, o.price, o.qty)
        }
        DomainEvent::Trade(t) => format!(
            "TRADE {} @ {} x {} pnl={}",
            t.side,
            t.price,
            t.qty,
            opt(t.pnl)
        ),
        DomainEvent::Fill(t) => format!("FILL {} {} @ {} x {}", t.symbol, t.side, t.price, t.qty),
        DomainEvent::Market(m) => format!(
            "MARKET {} bid={} ask={} last={}",
            m.symbol,
            opt(m.bid),
            opt(m.ask),
            opt(m.last)
        ),
        DomainEvent::Equity(p) => format!("equity={}", p.value),
        DomainEvent::Book(b) => format!("BOOK {} bids={} asks={}", b.symbol, b.bids.len(), b.asks.len()),
        DomainEvent::Other { payload, .. } => payload.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{OrderEvent, OrderStatus};
    use crate::domain::status::StatusUpdate;
    use crate::domain::trade::Trade;
    use crate::shared::{OrderId, Side};

    #[test]
    fn test_order_line() {
        let ev = DomainEvent::OrderEvent(OrderEvent {
            id: OrderId::from("1"),
            symbol: "BTCUSDT".into(),
            side: Side::Buy,
            price: Decimal::from(100),
            qty: Decimal::from(2),
            status: OrderStatus::New,
            ts: 0,
            reason: None,
        });
        let line = LogLine::from_event_at(&ev, 5);
        assert_eq!(line.kind, "order_event");
        assert_eq!(line.text, "ORDER NEW BUY @ 100 x 2");
        assert_eq!(line.ts, 5);
    }

    #[test]
    fn test_trade_line_without_pnl() {
        let ev = DomainEvent::Trade(Trade {
            id: String::new(),
            symbol: "X".into(),
            side: Side::Sell,
            price: Decimal::new(15, 1),
            qty: Decimal::ONE,
            pnl: None,
            ts: 0,
        });
        assert_eq!(format_event(&ev), "TRADE SELL @ 1.5 x 1 pnl=");
    }

    #[test]
    fn test_status_line() {
        let ev = DomainEvent::Status(StatusUpdate {
            running: Some(true),
            symbol: Some("ETHUSDT".into()),
            equity: Some(Decimal::from(1000)),
            ..Default::default()
        });
        assert_eq!(format_event(&ev), "running=true equity=1000 symbol=ETHUSDT");
    }

    #[test]
    fn test_raw_is_diag() {
        let line = LogLine::from_event(&DomainEvent::Raw("plain text".into()));
        assert_eq!(line.kind, "diag");
        assert_eq!(line.text, "plain text");
        assert!(line.matches("PLAIN"));
        assert!(line.matches(""));
        assert!(!line.matches("order"));
    }
}
