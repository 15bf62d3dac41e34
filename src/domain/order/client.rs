//! Orders sub-client: OMS order and fill listings.

use crate::client::DeskClient;
use crate::config::Endpoint;
use crate::domain::order::OrderRecord;
use crate::domain::trade::FillRecord;
use crate::error::SdkError;
use crate::http::RetryPolicy;

pub struct Orders<'a> {
    pub(crate) client: &'a DeskClient,
}

impl<'a> Orders<'a> {
    /// `GET /api/orders?limit=`, newest first. Backend default is 100.
    pub async fn list(&self, limit: Option<u32>) -> Result<Vec<OrderRecord>, SdkError> {
        self.client.ensure_available(Endpoint::Orders)?;
        let mut url = self.client.http.api_url("/orders");
        if let Some(l) = limit {
            url = format!("{}?limit={}", url, l);
        }
        Ok(self.client.http.get(&url, RetryPolicy::Idempotent).await?)
    }

    /// `GET /api/orders/fills?limit=`, newest first. Backend default is 200.
    pub async fn fills(&self, limit: Option<u32>) -> Result<Vec<FillRecord>, SdkError> {
        self.client.ensure_available(Endpoint::Orders)?;
        let mut url = self.client.http.api_url("/orders/fills");
        if let Some(l) = limit {
            url = format!("{}?limit={}", url, l);
        }
        Ok(self.client.http.get(&url, RetryPolicy::Idempotent).await?)
    }
}
