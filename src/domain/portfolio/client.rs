//! Portfolio sub-client.

use crate::client::DeskClient;
use crate::config::Endpoint;
use crate::domain::portfolio::{Balance, Position};
use crate::error::SdkError;
use crate::http::RetryPolicy;

pub struct Portfolio<'a> {
    pub(crate) client: &'a DeskClient,
}

impl<'a> Portfolio<'a> {
    /// `GET /api/portfolio/balances`.
    pub async fn balances(&self) -> Result<Vec<Balance>, SdkError> {
        self.client.ensure_available(Endpoint::Portfolio)?;
        let url = self.client.http.api_url("/portfolio/balances");
        Ok(self.client.http.get(&url, RetryPolicy::Idempotent).await?)
    }

    /// `GET /api/portfolio/positions`.
    pub async fn positions(&self) -> Result<Vec<Position>, SdkError> {
        self.client.ensure_available(Endpoint::Portfolio)?;
        let url = self.client.http.api_url("/portfolio/positions");
        Ok(self.client.http.get(&url, RetryPolicy::Idempotent).await?)
    }
}
