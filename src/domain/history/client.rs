//! History sub-client.

use crate::client::DeskClient;
use crate::config::Endpoint;
use crate::domain::history::{
    HistoryKind, HistoryResponse, HistoryStats, OrderHistoryItem, TradeHistoryItem,
};
use crate::error::SdkError;
use crate::http::RetryPolicy;

pub struct History<'a> {
    pub(crate) client: &'a DeskClient,
}

impl<'a> History<'a> {
    pub const DEFAULT_LIMIT: u32 = 200;

    /// `GET /api/history/orders?limit=&offset=`.
    pub async fn orders(
        &self,
        limit: Option<u32>,
        offset: u32,
    ) -> Result<Vec<OrderHistoryItem>, SdkError> {
        self.client.ensure_available(Endpoint::History)?;
        let url = self.page_url("/history/orders", limit, offset);
        let page: HistoryResponse<OrderHistoryItem> =
            self.client.http.get(&url, RetryPolicy::Idempotent).await?;
        Ok(page.into_inner())
    }

    /// `GET /api/history/trades?limit=&offset=`.
    pub async fn trades(
        &self,
        limit: Option<u32>,
        offset: u32,
    ) -> Result<Vec<TradeHistoryItem>, SdkError> {
        self.client.ensure_available(Endpoint::History)?;
        let url = self.page_url("/history/trades", limit, offset);
        let page: HistoryResponse<TradeHistoryItem> =
            self.client.http.get(&url, RetryPolicy::Idempotent).await?;
        Ok(page.into_inner())
    }

    pub async fn stats(&self) -> Result<HistoryStats, SdkError> {
        self.client.ensure_available(Endpoint::History)?;
        let url = self.client.http.api_url("/history/stats");
        Ok(self.client.http.get(&url, RetryPolicy::Idempotent).await?)
    }

    /// `POST /api/history/clear?kind=`. Returns the counts after clearing.
    pub async fn clear(&self, kind: HistoryKind) -> Result<HistoryStats, SdkError> {
        self.client.ensure_available(Endpoint::History)?;
        let url = self
            .client
            .http
            .api_url(&format!("/history/clear?kind={}", kind));
        Ok(self
            .client
            .http
            .post(&url, &serde_json::json!({}), RetryPolicy::None)
            .await?)
    }

    /// Download link for a CSV export. The token rides in the query string
    /// so the link works outside the SDK (browser, `curl`).
    pub async fn export_url(&self, kind: HistoryKind) -> String {
        let kind = match kind {
            HistoryKind::All => HistoryKind::Orders,
            other => other,
        };
        let token = self.client.http.token().await.unwrap_or_default();
        self.client.http.api_url(&format!(
            "/history/export.csv?kind={}&token={}",
            kind,
            urlencoding::encode(&token)
        ))
    }

    fn page_url(&self, path: &str, limit: Option<u32>, offset: u32) -> String {
        self.client.http.api_url(&format!(
            "{}?limit={}&offset={}",
            path,
            limit.unwrap_or(Self::DEFAULT_LIMIT),
            offset
        ))
    }
}
