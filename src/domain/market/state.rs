//! Market state containers: app-owned, SDK-provided update logic.

use super::MarketTick;
use crate::domain::trade::Trade;
use crate::shared::BoundedSeries;
use crate::ws::DomainEvent;
use std::collections::HashMap;

/// Latest bid/ask/last per symbol plus a chronological window of trades.
#[derive(Debug, Clone)]
pub struct MarketTicker {
    ticks: HashMap<String, MarketTick>,
    trades: BoundedSeries<Trade>,
}

impl MarketTicker {
    pub const DEFAULT_TRADE_CAP: usize = 200;

    pub fn new(trade_cap: usize) -> Self {
        Self {
            ticks: HashMap::new(),
            trades: BoundedSeries::new(trade_cap),
        }
    }

    pub fn apply(&mut self, event: &DomainEvent) {
        match event {
            DomainEvent::Market(tick) => self.update(tick),
            DomainEvent::Trade(trade) => {
                self.trades.push_back(trade.clone());
            }
            _ => {}
        }
    }

    /// Merge a tick; absent fields keep their previous values.
    pub fn update(&mut self, tick: &MarketTick) {
        match self.ticks.get_mut(&tick.symbol) {
            Some(current) => {
                current.bid = tick.bid.or(current.bid);
                current.ask = tick.ask.or(current.ask);
                current.last = tick.last.or(current.last);
                current.ts = tick.ts;
            }
            None => {
                self.ticks.insert(tick.symbol.clone(), tick.clone());
            }
        }
    }

    pub fn get(&self, symbol: &str) -> Option<&MarketTick> {
        self.ticks.get(symbol)
    }

    pub fn ticks(&self) -> impl Iterator<Item = &MarketTick> {
        self.ticks.values()
    }

    /// Recent trades, oldest first.
    pub fn trades(&self) -> impl DoubleEndedIterator<Item = &Trade> + ExactSizeIterator {
        self.trades.iter()
    }

    pub fn clear(&mut self) {
        self.ticks.clear();
        self.trades.clear();
    }
}

impl Default for MarketTicker {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TRADE_CAP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::Side;
    use rust_decimal::Decimal;

    fn tick(symbol: &str, bid: Option<i64>, ask: Option<i64>, last: Option<i64>) -> MarketTick {
        MarketTick {
            symbol: symbol.into(),
            bid: bid.map(Decimal::from),
            ask: ask.map(Decimal::from),
            last: last.map(Decimal::from),
            ts: 1,
        }
    }

    #[test]
    fn test_partial_tick_keeps_previous_fields() {
        let mut ticker = MarketTicker::default();
        ticker.apply(&DomainEvent::Market(tick("BTC", Some(10), Some(12), Some(11))));
        ticker.apply(&DomainEvent::Market(tick("BTC", None, None, Some(13))));
        let t = ticker.get("BTC").unwrap();
        assert_eq!(t.bid, Some(Decimal::from(10)));
        assert_eq!(t.last, Some(Decimal::from(13)));
    }

    #[test]
    fn test_trade_window_is_chronological_and_capped() {
        let mut ticker = MarketTicker::new(2);
        for i in 0..3 {
            ticker.apply(&DomainEvent::Trade(Trade {
                id: i.to_string(),
                symbol: "BTC".into(),
                side: Side::Sell,
                price: Decimal::from(i),
                qty: Decimal::ONE,
                pnl: None,
                ts: i,
            }));
        }
        let ids: Vec<_> = ticker.trades().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["1", "2"]);
    }
}
