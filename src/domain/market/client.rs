//! Market sub-client: candles.

use crate::client::DeskClient;
use crate::config::Endpoint;
use crate::domain::market::Candle;
use crate::error::SdkError;
use crate::http::RetryPolicy;
use crate::shared::Timeframe;

pub struct Market<'a> {
    pub(crate) client: &'a DeskClient,
}

impl<'a> Market<'a> {
    /// `GET /api/market/ohlcv?symbol=&tf=&limit=`
    pub async fn ohlcv(
        &self,
        symbol: &str,
        tf: Timeframe,
        limit: Option<u32>,
    ) -> Result<Vec<Candle>, SdkError> {
        self.client.ensure_available(Endpoint::Market)?;
        let url = format!(
            "{}?symbol={}&tf={}&limit={}",
            self.client.http.api_url("/market/ohlcv"),
            urlencoding::encode(symbol),
            tf.as_str(),
            limit.unwrap_or(200)
        );
        Ok(self.client.http.get(&url, RetryPolicy::Idempotent).await?)
    }
}
