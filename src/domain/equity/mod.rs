//! Equity domain: account value samples and the session curve.

pub mod state;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use state::{EquityCurve, EquityStats};

/// One equity sample from an `equity` or `bank` frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    /// Epoch millis.
    pub ts: i64,
    pub value: Decimal,
}
