//! Orderbook state containers: app-owned, SDK-provided update logic.

use super::{BookLevel, BookUpdate};
use crate::ws::DomainEvent;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

/// Depth for one symbol, rebuilt from each [`BookUpdate`].
#[derive(Debug, Clone, Default)]
pub struct BookSnapshot {
    pub symbol: String,
    pub ts: i64,
    bids: BTreeMap<Decimal, Decimal>,
    asks: BTreeMap<Decimal, Decimal>,
}

impl BookSnapshot {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Default::default()
        }
    }

    /// Replace the whole book. Zero-size levels are skipped.
    pub fn apply(&mut self, book: &BookUpdate) {
        self.bids.clear();
        self.asks.clear();
        self.ts = book.ts;

        for level in &book.bids {
            if !level.size.is_zero() {
                self.bids.insert(level.price, level.size);
            }
        }
        for level in &book.asks {
            if !level.size.is_zero() {
                self.asks.insert(level.price, level.size);
            }
        }
    }

    /// Bids sorted by price descending.
    pub fn bids(&self) -> impl Iterator<Item = BookLevel> + '_ {
        self.bids
            .iter()
            .rev()
            .map(|(price, size)| BookLevel { price: *price, size: *size })
    }

    /// Asks sorted by price ascending.
    pub fn asks(&self) -> impl Iterator<Item = BookLevel> + '_ {
        self.asks
            .iter()
            .map(|(price, size)| BookLevel { price: *price, size: *size })
    }

    /// Highest bid price.
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.keys().next_back().copied()
    }

    /// Lowest ask price.
    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.keys().next().copied()
    }

    /// Mid price (average of best bid and best ask).
    pub fn mid_price(&self) -> Option<Decimal> {
        let (bid, ask) = (self.best_bid()?, self.best_ask()?);
        let two = Decimal::TWO;
        match bid.checked_add(ask) {
            Some(sum) => sum.checked_div(two),
            // Halve first when the sum leaves `Decimal` range.
            None => (bid / two).checked_add(ask / two),
        }
    }

    /// Spread between best ask and best bid. `None` on overflow.
    pub fn spread(&self) -> Option<Decimal> {
        self.best_ask()?.checked_sub(self.best_bid()?)
    }

    /// Largest level size on either side (depth bar scaling).
    pub fn max_size(&self) -> Decimal {
        self.bids
            .values()
            .chain(self.asks.values())
            .copied()
            .max()
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    pub fn clear(&mut self) {
        self.bids.clear();
        self.asks.clear();
        self.ts = 0;
    }
}

/// Latest book per symbol.
#[derive(Debug, Clone, Default)]
pub struct BookView {
    books: HashMap<String, BookSnapshot>,
}

impl BookView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: &DomainEvent) {
        if let DomainEvent::Book(book) = event {
            self.update(book);
        }
    }

    pub fn update(&mut self, book: &BookUpdate) {
        self.books
            .entry(book.symbol.clone())
            .or_insert_with(|| BookSnapshot::new(book.symbol.clone()))
            .apply(book);
    }

    pub fn get(&self, symbol: &str) -> Option<&BookSnapshot> {
        self.books.get(symbol)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.books.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn clear(&mut self) {
        self.books.clear();
    }
}
