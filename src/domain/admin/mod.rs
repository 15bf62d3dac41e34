//! Admin domain: exchange credentials, audit trail, desk-wide summary.

#[cfg(feature = "http")]
pub mod client;

use crate::shared::serde_util::{loose_decimal, loose_millis};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST /api/keys`. Secrets are write-only: the backend never echoes them.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiKeys {
    pub exchange: String,
    pub category: String,
    pub api_key: String,
    pub api_secret: String,
}

impl ApiKeys {
    pub fn new(
        exchange: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            exchange: exchange.into(),
            category: "spot".to_string(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }
}

impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeys")
            .field("exchange", &self.exchange)
            .field("category", &self.category)
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// `GET /api/keys`: whether credentials exist for an exchange/category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyStatus {
    pub exchange: String,
    pub category: String,
    #[serde(default)]
    pub configured: bool,
}

/// One audit trail row. Columns beyond the common ones land in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "loose_millis::deserialize")]
    pub ts: Option<i64>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `GET /api/dashboard/summary`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    #[serde(default, deserialize_with = "loose_decimal::deserialize")]
    pub equity: Option<Decimal>,
    #[serde(default, deserialize_with = "loose_decimal::deserialize")]
    pub pnl: Option<Decimal>,
    #[serde(default)]
    pub running_strategies: u32,
}
