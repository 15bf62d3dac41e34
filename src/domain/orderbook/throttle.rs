//! Buffered book application.
//!
//! Book frames can arrive far faster than a view needs to redraw. The
//! throttle keeps only the newest update per symbol and releases them as one
//! batch once the window has elapsed since the first buffered update.

use super::state::BookView;
use super::BookUpdate;
use crate::ws::DomainEvent;
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct BookThrottle {
    window: Duration,
    pending: HashMap<String, BookUpdate>,
    opened_at: Option<Instant>,
}

impl BookThrottle {
    pub const DEFAULT_WINDOW: Duration = Duration::from_millis(50);

    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: HashMap::new(),
            opened_at: None,
        }
    }

    /// Buffer an update; a newer book for the same symbol supersedes the older one.
    pub fn push(&mut self, update: BookUpdate, now: Instant) {
        self.opened_at.get_or_insert(now);
        self.pending.insert(update.symbol.clone(), update);
    }

    /// When the current batch becomes due, if anything is buffered.
    pub fn deadline(&self) -> Option<Instant> {
        self.opened_at.map(|t| t + self.window)
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline().is_some_and(|d| now >= d)
    }

    /// Apply every buffered update to `view`; returns how many were applied.
    pub fn flush_into(&mut self, view: &mut BookView) -> usize {
        self.opened_at = None;
        let count = self.pending.len();
        for (_, update) in self.pending.drain() {
            view.update(&update);
        }
        count
    }

    /// Buffer a `book` event and flush into `view` when the window has elapsed.
    pub fn apply(&mut self, event: &DomainEvent, now: Instant, view: &mut BookView) -> usize {
        if let DomainEvent::Book(book) = event {
            self.push(book.clone(), now);
        }
        if self.is_due(now) {
            self.flush_into(view)
        } else {
            0
        }
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl Default for BookThrottle {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::orderbook::BookLevel;
    use rust_decimal::Decimal;

    fn book(symbol: &str, bid: i64) -> BookUpdate {
        BookUpdate {
            symbol: symbol.into(),
            bids: vec![BookLevel {
                price: Decimal::from(bid),
                size: Decimal::ONE,
            }],
            asks: vec![],
            ts: 0,
        }
    }

    #[test]
    fn test_buffers_until_window_elapses() {
        let start = Instant::now();
        let mut throttle = BookThrottle::new(Duration::from_millis(50));
        let mut view = BookView::new();

        let applied = throttle.apply(&DomainEvent::Book(book("A", 1)), start, &mut view);
        assert_eq!(applied, 0);
        assert!(view.is_empty());

        let applied = throttle.apply(
            &DomainEvent::Book(book("A", 2)),
            start + Duration::from_millis(10),
            &mut view,
        );
        assert_eq!(applied, 0);
        assert_eq!(throttle.pending(), 1);

        let applied = throttle.apply(
            &DomainEvent::Book(book("B", 7)),
            start + Duration::from_millis(60),
            &mut view,
        );
        assert_eq!(applied, 2);
        assert_eq!(view.get("A").unwrap().best_bid(), Some(Decimal::from(2)));
        assert_eq!(view.get("B").unwrap().best_bid(), Some(Decimal::from(7)));
        assert!(throttle.deadline().is_none());
    }

    #[test]
    fn test_non_book_event_can_release_due_batch() {
        let start = Instant::now();
        let mut throttle = BookThrottle::default();
        let mut view = BookView::new();
        throttle.push(book("A", 1), start);
        let applied = throttle.apply(
            &DomainEvent::Diag("tick".into()),
            start + Duration::from_secs(1),
            &mut view,
        );
        assert_eq!(applied, 1);
        assert_eq!(view.len(), 1);
    }
}
