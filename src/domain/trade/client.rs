//! Trades sub-client: fill history and realized PnL export.

use crate::client::DeskClient;
use crate::config::Endpoint;
use crate::domain::trade::{FillQuery, FillRecord};
use crate::error::SdkError;
use crate::http::RetryPolicy;
use crate::shared::Items;

pub struct Trades<'a> {
    pub(crate) client: &'a DeskClient,
}

impl<'a> Trades<'a> {
    /// `GET /api/trades/fills` filtered by `query`.
    pub async fn fills(&self, query: &FillQuery) -> Result<Vec<FillRecord>, SdkError> {
        self.client.ensure_available(Endpoint::Trades)?;
        let url = self
            .client
            .http
            .api_url(&format!("/trades/fills{}", query.to_query()));
        let resp: Items<FillRecord> = self.client.http.get(&url, RetryPolicy::Idempotent).await?;
        Ok(resp.into_inner())
    }

    /// Download link for `/api/trades/realized.csv`; carries the token when set.
    pub async fn realized_csv_url(&self, query: &FillQuery) -> String {
        let mut url = self
            .client
            .http
            .api_url(&format!("/trades/realized.csv{}", query.to_query()));
        if let Some(token) = self.client.http.token().await {
            let sep = if url.contains('?') { '&' } else { '?' };
            url.push(sep);
            url.push_str("token=");
            url.push_str(&urlencoding::encode(&token));
        }
        url
    }
}
