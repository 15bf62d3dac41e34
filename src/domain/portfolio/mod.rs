//! Portfolio domain: exchange balances and positions.
//!
//! Row shapes differ per exchange adapter, so rows stay as JSON objects.

#[cfg(feature = "http")]
pub mod client;

use serde_json::{Map, Value};

pub type Balance = Map<String, Value>;
pub type Position = Map<String, Value>;
