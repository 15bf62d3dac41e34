//! Scanner, strategy, bot and backtest sub-clients.

use crate::client::DeskClient;
use crate::config::Endpoint;
use crate::domain::config::ConfigSnapshot;
use crate::domain::strategy::{
    BacktestResult, BotInfo, BotLaunch, ReportScope, ScanResponse, StrategyInfo, StrategyReport,
};
use crate::domain::trade::FillRecord;
use crate::error::SdkError;
use crate::http::RetryPolicy;
use crate::shared::Items;
use serde_json::{json, Value};

// ─── Scanner ─────────────────────────────────────────────────────────────────

pub struct Scanner<'a> {
    pub(crate) client: &'a DeskClient,
}

impl<'a> Scanner<'a> {
    /// `POST /api/scanner/scan`. Without a config the backend scans with its
    /// active one. A 404 means no pair passed the filters.
    pub async fn scan(&self, config: Option<&ConfigSnapshot>) -> Result<ScanResponse, SdkError> {
        self.client.ensure_available(Endpoint::Scanner)?;
        let url = self.client.http.api_url("/scanner/scan");
        let body = match config {
            Some(cfg) => json!({ "config": cfg }),
            None => json!({}),
        };
        Ok(self.client.http.post(&url, &body, RetryPolicy::None).await?)
    }
}

// ─── Strategies ──────────────────────────────────────────────────────────────

pub struct Strategies<'a> {
    pub(crate) client: &'a DeskClient,
}

impl<'a> Strategies<'a> {
    pub async fn list(&self) -> Result<Vec<StrategyInfo>, SdkError> {
        self.client.ensure_available(Endpoint::Strategies)?;
        let url = self.client.http.api_url("/strategies");
        Ok(self.client.http.get(&url, RetryPolicy::Idempotent).await?)
    }

    /// JSON schema of a strategy's parameters.
    pub async fn schema(&self, id: &str) -> Result<Value, SdkError> {
        self.client.ensure_available(Endpoint::Strategies)?;
        let url = self.strategy_url(id, "schema");
        Ok(self.client.http.get(&url, RetryPolicy::Idempotent).await?)
    }

    pub async fn start(&self, id: &str, cfg: &Value) -> Result<Value, SdkError> {
        self.client.ensure_available(Endpoint::Strategies)?;
        let url = self.strategy_url(id, "start");
        Ok(self.client.http.post(&url, cfg, RetryPolicy::None).await?)
    }

    pub async fn stop(&self, id: &str) -> Result<Value, SdkError> {
        self.client.ensure_available(Endpoint::Strategies)?;
        let url = self.strategy_url(id, "stop");
        Ok(self
            .client
            .http
            .post(&url, &json!({}), RetryPolicy::None)
            .await?)
    }

    /// `GET /api/strategy/{sid}/report?symbol=&exchange=&category=`.
    pub async fn report(&self, sid: &str, scope: &ReportScope) -> Result<StrategyReport, SdkError> {
        self.client.ensure_available(Endpoint::Strategies)?;
        let url = self.client.http.api_url(&format!(
            "/strategy/{}/report?{}",
            urlencoding::encode(sid),
            scope.to_query()
        ));
        Ok(self.client.http.get(&url, RetryPolicy::Idempotent).await?)
    }

    /// `GET /api/strategy/{sid}/fills`, newest first.
    pub async fn fills(&self, sid: &str, scope: &ReportScope) -> Result<Vec<FillRecord>, SdkError> {
        self.client.ensure_available(Endpoint::Strategies)?;
        let url = self.client.http.api_url(&format!(
            "/strategy/{}/fills?{}",
            urlencoding::encode(sid),
            scope.to_query()
        ));
        let resp: Items<FillRecord> = self.client.http.get(&url, RetryPolicy::Idempotent).await?;
        Ok(resp.into_inner())
    }

    fn strategy_url(&self, id: &str, action: &str) -> String {
        self.client
            .http
            .api_url(&format!("/strategies/{}/{}", urlencoding::encode(id), action))
    }
}

// ─── Bots ────────────────────────────────────────────────────────────────────

pub struct Bots<'a> {
    pub(crate) client: &'a DeskClient,
}

impl<'a> Bots<'a> {
    pub async fn list(&self) -> Result<Vec<BotInfo>, SdkError> {
        self.client.ensure_available(Endpoint::Bots)?;
        let url = self.client.http.api_url("/bots");
        let resp: Items<BotInfo> = self.client.http.get(&url, RetryPolicy::Idempotent).await?;
        Ok(resp.into_inner())
    }

    /// `POST /api/bots`: places the entry order and registers the bot.
    pub async fn start(&self, launch: &BotLaunch) -> Result<BotInfo, SdkError> {
        self.client.ensure_available(Endpoint::Bots)?;
        let url = self.client.http.api_url("/bots");
        Ok(self.client.http.post(&url, launch, RetryPolicy::None).await?)
    }

    pub async fn stop(&self, id: &str) -> Result<Value, SdkError> {
        self.client.ensure_available(Endpoint::Bots)?;
        let url = self
            .client
            .http
            .api_url(&format!("/bots/{}/stop", urlencoding::encode(id)));
        Ok(self
            .client
            .http
            .post(&url, &json!({}), RetryPolicy::None)
            .await?)
    }
}

// ─── Backtest ────────────────────────────────────────────────────────────────

pub struct Backtest<'a> {
    pub(crate) client: &'a DeskClient,
}

impl<'a> Backtest<'a> {
    /// `POST /api/backtest/run` with engine parameters (`prices`, `fast`, `slow`, `qty`, ...).
    pub async fn run(&self, cfg: &Value) -> Result<BacktestResult, SdkError> {
        self.client.ensure_available(Endpoint::Backtest)?;
        let url = self.client.http.api_url("/backtest/run");
        Ok(self.client.http.post(&url, cfg, RetryPolicy::None).await?)
    }
}
