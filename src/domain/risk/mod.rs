//! Risk domain: drawdown guard status, limits and per-strategy policies.

#[cfg(feature = "http")]
pub mod client;

use crate::shared::serde_util::loose_decimal;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Response of `GET /api/risk/status`.
///
/// Backends differ in what they report; the common fields are typed and the
/// rest is kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskStatus {
    #[serde(default)]
    pub locked: bool,
    #[serde(default, deserialize_with = "loose_decimal::deserialize")]
    pub max_drawdown_pct: Option<Decimal>,
    #[serde(default)]
    pub cooldown_left_sec: Option<f64>,
    #[serde(default)]
    pub min_trades_for_dd: Option<f64>,
    #[serde(default)]
    pub allowed: Option<bool>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RiskStatus {
    /// Trading is blocked either by an explicit lock or `allowed: false`.
    pub fn is_blocked(&self) -> bool {
        self.locked || self.allowed == Some(false)
    }
}

/// Risk limit table (`max_drawdown_pct`, `dd_window_sec`, `cooldown_sec`, ...).
pub type RiskLimits = Map<String, Value>;
