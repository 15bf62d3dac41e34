//! Dashboard state and the shared running flag.

use super::{BotStatus, StatusUpdate, WsStats};
use crate::domain::market::MarketTick;
use crate::ws::DomainEvent;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::watch;

// ─── RunningFlag ─────────────────────────────────────────────────────────────

/// One shared "is the bot running" value for every view.
///
/// Cloning is cheap; all clones observe the same value. Written from
/// `status` frames and from bot command responses.
#[derive(Debug, Clone)]
pub struct RunningFlag {
    tx: Arc<watch::Sender<bool>>,
}

impl RunningFlag {
    pub fn new(initial: bool) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    pub fn get(&self) -> bool {
        *self.tx.borrow()
    }

    /// Returns `true` when the value changed.
    pub fn set(&self, running: bool) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == running {
                false
            } else {
                *current = running;
                true
            }
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    /// Update from a stream event; only `status` frames carrying `running` count.
    pub fn apply(&self, event: &DomainEvent) {
        if let DomainEvent::Status(StatusUpdate {
            running: Some(running),
            ..
        }) = event
        {
            self.set(*running);
        }
    }
}

impl Default for RunningFlag {
    fn default() -> Self {
        Self::new(false)
    }
}

// ─── DashboardState ──────────────────────────────────────────────────────────

/// Aggregate view behind the dashboard: run state, metrics, stream stats,
/// last diagnostic line, latest market tick and per-kind event counters.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub running: bool,
    pub symbol: String,
    pub metrics: Map<String, Value>,
    pub cfg: Map<String, Value>,
    pub ws: WsStats,
    pub last_diag: String,
    pub market: Option<MarketTick>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset from a REST status snapshot.
    pub fn set_status(&mut self, status: BotStatus) {
        self.running = status.running;
        self.symbol = status.symbol.unwrap_or_default();
        self.metrics = status.metrics;
        self.cfg = status.cfg;
    }

    pub fn apply(&mut self, event: &DomainEvent) {
        match event {
            DomainEvent::Status(update) => self.merge_status(update),
            DomainEvent::Stats(stats) => self.ws = *stats,
            DomainEvent::Diag(text) => self.last_diag = text.clone(),
            DomainEvent::Market(tick) => {
                let mut tick = tick.clone();
                if tick.symbol.is_empty() {
                    tick.symbol = self.symbol.clone();
                }
                self.market = Some(tick);
            }
            DomainEvent::OrderEvent(_) | DomainEvent::Trade(_) | DomainEvent::Fill(_) => {
                self.bump(&format!("{}_count", event.kind()));
            }
            _ => {}
        }
    }

    /// Counter maintained for `order_event`, `trade` and `fill` frames.
    pub fn count(&self, kind: &str) -> u64 {
        self.metrics
            .get(&format!("{}_count", kind))
            .and_then(Value::as_u64)
            .unwrap_or(0)
    }

    fn merge_status(&mut self, update: &StatusUpdate) {
        if let Some(running) = update.running {
            self.running = running;
        }
        if let Some(symbol) = update.symbol.as_ref().filter(|s| !s.is_empty()) {
            self.symbol = symbol.clone();
        }
        for (k, v) in &update.metrics {
            self.metrics.insert(k.clone(), v.clone());
        }
        for (k, v) in &update.cfg {
            self.cfg.insert(k.clone(), v.clone());
        }
    }

    fn bump(&mut self, key: &str) {
        let next = self.metrics.get(key).and_then(Value::as_u64).unwrap_or(0) + 1;
        self.metrics.insert(key.to_string(), Value::from(next));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trade::Trade;
    use crate::shared::Side;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn status(running: Option<bool>, metrics: Value) -> DomainEvent {
        DomainEvent::Status(StatusUpdate {
            running,
            symbol: Some("ETHUSDT".into()),
            equity: None,
            metrics: metrics.as_object().cloned().unwrap_or_default(),
            cfg: Map::new(),
        })
    }

    fn trade() -> Trade {
        Trade {
            id: String::new(),
            symbol: "ETHUSDT".into(),
            side: Side::Buy,
            price: Decimal::ONE,
            qty: Decimal::ONE,
            pnl: None,
            ts: 0,
        }
    }

    #[test]
    fn test_status_merges_metrics() {
        let mut dash = DashboardState::new();
        dash.apply(&status(Some(true), json!({"a": 1})));
        dash.apply(&status(None, json!({"b": 2})));
        assert!(dash.running);
        assert_eq!(dash.symbol, "ETHUSDT");
        assert_eq!(dash.metrics["a"], 1);
        assert_eq!(dash.metrics["b"], 2);
    }

    #[test]
    fn test_explicit_running_false_is_honored() {
        let mut dash = DashboardState::new();
        dash.apply(&status(Some(true), json!({})));
        dash.apply(&status(Some(false), json!({})));
        assert!(!dash.running);
    }

    #[test]
    fn test_counts_trading_events() {
        let mut dash = DashboardState::new();
        dash.apply(&DomainEvent::Trade(trade()));
        dash.apply(&DomainEvent::Trade(trade()));
        dash.apply(&DomainEvent::Fill(trade()));
        assert_eq!(dash.count("trade"), 2);
        assert_eq!(dash.count("fill"), 1);
        assert_eq!(dash.count("order_event"), 0);
    }

    #[test]
    fn test_stats_diag_and_market() {
        let mut dash = DashboardState::new();
        dash.symbol = "BTCUSDT".into();
        dash.apply(&DomainEvent::Stats(WsStats { ws_clients: 3, ws_rate: 1.5 }));
        dash.apply(&DomainEvent::Diag("warming up".into()));
        dash.apply(&DomainEvent::Market(MarketTick {
            symbol: String::new(),
            bid: Some(Decimal::from(1)),
            ask: None,
            last: None,
            ts: 0,
        }));
        assert_eq!(dash.ws.ws_clients, 3);
        assert_eq!(dash.last_diag, "warming up");
        assert_eq!(dash.market.as_ref().unwrap().symbol, "BTCUSDT");
    }

    #[test]
    fn test_running_flag_shared_between_clones() {
        let flag = RunningFlag::default();
        let other = flag.clone();
        let mut rx = other.subscribe();
        assert!(flag.set(true));
        assert!(!flag.set(true));
        assert!(other.get());
        assert!(rx.has_changed().unwrap());
        assert!(*rx.borrow_and_update());
    }

    #[test]
    fn test_running_flag_from_status_event() {
        let flag = RunningFlag::default();
        flag.apply(&status(Some(true), json!({})));
        assert!(flag.get());
        flag.apply(&status(None, json!({})));
        assert!(flag.get());
    }
}
