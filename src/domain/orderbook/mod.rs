//! Orderbook domain: depth snapshots from `book` frames.

pub mod state;
pub mod throttle;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use state::{BookSnapshot, BookView};
pub use throttle::BookThrottle;

/// One price level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookLevel {
    pub price: Decimal,
    pub size: Decimal,
}

/// A full depth snapshot for one symbol, as published by the backend.
///
/// Each update replaces the previous book for its symbol; there are no deltas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookUpdate {
    pub symbol: String,
    pub bids: Vec<BookLevel>,
    pub asks: Vec<BookLevel>,
    /// Epoch millis.
    pub ts: i64,
}
