//! Risk sub-client.

use crate::client::DeskClient;
use crate::config::Endpoint;
use crate::domain::risk::{RiskLimits, RiskStatus};
use crate::error::SdkError;
use crate::http::RetryPolicy;
use crate::shared::Items;
use serde_json::{json, Value};

pub struct Risk<'a> {
    pub(crate) client: &'a DeskClient,
}

impl<'a> Risk<'a> {
    /// `GET /api/risk/status`.
    pub async fn status(&self) -> Result<RiskStatus, SdkError> {
        self.client.ensure_available(Endpoint::RiskStatus)?;
        let url = self.client.http.api_url("/risk/status");
        Ok(self.client.http.get(&url, RetryPolicy::Idempotent).await?)
    }

    /// `POST /api/risk/unlock`: clear drawdown and cooldown locks.
    pub async fn unlock(&self) -> Result<Value, SdkError> {
        self.client.ensure_available(Endpoint::RiskUnlock)?;
        let url = self.client.http.api_url("/risk/unlock");
        Ok(self.client.http.post(&url, &json!({}), RetryPolicy::None).await?)
    }

    /// `GET /api/risk/limits`.
    pub async fn limits(&self) -> Result<RiskLimits, SdkError> {
        self.client.ensure_available(Endpoint::RiskLimits)?;
        let url = self.client.http.api_url("/risk/limits");
        Ok(self.client.http.get(&url, RetryPolicy::Idempotent).await?)
    }

    /// `POST /api/risk/limits`. Unknown keys are ignored by the server.
    pub async fn set_limits(&self, limits: &RiskLimits) -> Result<RiskLimits, SdkError> {
        self.client.ensure_available(Endpoint::RiskLimits)?;
        let url = self.client.http.api_url("/risk/limits");
        Ok(self.client.http.post(&url, limits, RetryPolicy::None).await?)
    }

    /// `GET /api/risk/policies`: ids of configured policies.
    pub async fn policies(&self) -> Result<Vec<String>, SdkError> {
        self.client.ensure_available(Endpoint::RiskPolicies)?;
        let url = self.client.http.api_url("/risk/policies");
        Ok(self.client.http.get(&url, RetryPolicy::Idempotent).await?)
    }

    /// `GET /api/risk/policies/{sid}`.
    pub async fn policy(&self, sid: &str) -> Result<Value, SdkError> {
        self.client.ensure_available(Endpoint::RiskPolicies)?;
        let url = self
            .client
            .http
            .api_url(&format!("/risk/policies/{}", urlencoding::encode(sid)));
        Ok(self.client.http.get(&url, RetryPolicy::Idempotent).await?)
    }

    /// `POST /api/risk/policies/{sid}` with `max_active_orders` / `max_dd`.
    pub async fn set_policy(&self, sid: &str, policy: &Value) -> Result<Value, SdkError> {
        self.client.ensure_available(Endpoint::RiskPolicies)?;
        let url = self
            .client
            .http
            .api_url(&format!("/risk/policies/{}", urlencoding::encode(sid)));
        Ok(self.client.http.post(&url, policy, RetryPolicy::None).await?)
    }

    /// `GET /api/risk/log?limit=`.
    pub async fn log(&self, limit: u32) -> Result<Vec<Value>, SdkError> {
        self.client.ensure_available(Endpoint::RiskLog)?;
        let url = format!("{}?limit={}", self.client.http.api_url("/risk/log"), limit);
        let resp: Items<Value> = self.client.http.get(&url, RetryPolicy::Idempotent).await?;
        Ok(resp.into_inner())
    }
}
