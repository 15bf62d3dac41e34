//! Admin sub-client: credentials, audit log, dashboard summary.

use crate::client::DeskClient;
use crate::config::Endpoint;
use crate::domain::admin::{ApiKeys, AuditEntry, DashboardSummary, KeyStatus};
use crate::error::SdkError;
use crate::http::RetryPolicy;
use serde_json::Value;

pub struct Admin<'a> {
    pub(crate) client: &'a DeskClient,
}

impl<'a> Admin<'a> {
    /// `POST /api/keys`.
    pub async fn save_keys(&self, keys: &ApiKeys) -> Result<Value, SdkError> {
        self.client.ensure_available(Endpoint::Keys)?;
        let url = self.client.http.api_url("/keys");
        tracing::debug!("Saving API keys for {}/{}", keys.exchange, keys.category);
        Ok(self.client.http.post(&url, keys, RetryPolicy::None).await?)
    }

    /// `GET /api/keys?exchange=&category=`. A 404 means nothing is stored.
    pub async fn keys(&self, exchange: &str, category: &str) -> Result<KeyStatus, SdkError> {
        self.client.ensure_available(Endpoint::Keys)?;
        let url = self.client.http.api_url(&format!(
            "/keys?exchange={}&category={}",
            urlencoding::encode(exchange),
            urlencoding::encode(category)
        ));
        Ok(self.client.http.get(&url, RetryPolicy::Idempotent).await?)
    }

    /// `GET /api/audit?limit=`, newest first. Requires an admin token.
    pub async fn audit_log(&self, limit: Option<u32>) -> Result<Vec<AuditEntry>, SdkError> {
        self.client.ensure_available(Endpoint::Audit)?;
        let mut url = self.client.http.api_url("/audit");
        if let Some(l) = limit {
            url = format!("{}?limit={}", url, l);
        }
        Ok(self.client.http.get(&url, RetryPolicy::Idempotent).await?)
    }

    /// `GET /api/dashboard/summary`.
    pub async fn dashboard_summary(&self) -> Result<DashboardSummary, SdkError> {
        self.client.ensure_available(Endpoint::Dashboard)?;
        let url = self.client.http.api_url("/dashboard/summary");
        Ok(self.client.http.get(&url, RetryPolicy::Idempotent).await?)
    }
}
