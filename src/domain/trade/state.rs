//! Trade state containers: app-owned, SDK-provided update logic.

use super::Trade;
use crate::shared::BoundedSeries;
use crate::ws::DomainEvent;

/// Rolling trade tape, most recent first.
///
/// The app owns instances of this type. The SDK provides update methods.
#[derive(Debug, Clone)]
pub struct TradeTape {
    trades: BoundedSeries<Trade>,
}

impl TradeTape {
    pub const DEFAULT_CAP: usize = 100;

    pub fn new(cap: usize) -> Self {
        Self {
            trades: BoundedSeries::new(cap),
        }
    }

    /// Apply a stream event; only `trade` frames land on the tape.
    pub fn apply(&mut self, event: &DomainEvent) {
        if let DomainEvent::Trade(trade) = event {
            self.push(trade.clone());
        }
    }

    /// Push a new trade, evicting the oldest if at capacity.
    pub fn push(&mut self, trade: Trade) {
        self.trades.push_front(trade);
    }

    /// Replace all trades (e.g. from a REST fetch, newest first).
    pub fn replace(&mut self, trades: Vec<Trade>) {
        self.trades.replace(trades);
    }

    pub fn trades(&self) -> impl DoubleEndedIterator<Item = &Trade> + ExactSizeIterator {
        self.trades.iter()
    }

    pub fn latest(&self) -> Option<&Trade> {
        self.trades.front()
    }

    pub fn clear(&mut self) {
        self.trades.clear();
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }
}

impl Default for TradeTape {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAP)
    }
}

/// Live fills in arrival order; overflow drops the oldest.
#[derive(Debug, Clone)]
pub struct FillFeed {
    fills: BoundedSeries<Trade>,
}

impl FillFeed {
    pub const DEFAULT_CAP: usize = 200;

    pub fn new(cap: usize) -> Self {
        Self {
            fills: BoundedSeries::new(cap),
        }
    }

    pub fn apply(&mut self, event: &DomainEvent) {
        if let DomainEvent::Fill(fill) = event {
            self.fills.push_back(fill.clone());
        }
    }

    pub fn fills(&self) -> impl DoubleEndedIterator<Item = &Trade> + ExactSizeIterator {
        self.fills.iter()
    }

    pub fn latest(&self) -> Option<&Trade> {
        self.fills.back()
    }

    pub fn clear(&mut self) {
        self.fills.clear();
    }

    pub fn len(&self) -> usize {
        self.fills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fills.is_empty()
    }
}

impl Default for FillFeed {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAP)
    }
}
