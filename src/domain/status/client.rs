//! Bot sub-client: run state and operator commands.

use crate::client::DeskClient;
use crate::config::Endpoint;
use crate::domain::status::BotStatus;
use crate::error::SdkError;
use crate::http::RetryPolicy;

pub struct Bot<'a> {
    pub(crate) client: &'a DeskClient,
}

impl<'a> Bot<'a> {
    /// `GET /api/bot/status`. Updates the shared running flag.
    pub async fn status(&self) -> Result<BotStatus, SdkError> {
        self.client.ensure_available(Endpoint::BotStatus)?;
        let url = self.client.http.api_url("/bot/status");
        let status: BotStatus = self.client.http.get(&url, RetryPolicy::Idempotent).await?;
        self.client.running.set(status.running);
        Ok(status)
    }

    /// `POST /api/bot/start`.
    pub async fn start(&self) -> Result<BotStatus, SdkError> {
        self.client.ensure_available(Endpoint::BotStart)?;
        let url = self.client.http.api_url("/bot/start");
        self.command_at(&url).await
    }

    /// `POST /api/bot/stop`.
    pub async fn stop(&self) -> Result<BotStatus, SdkError> {
        self.client.ensure_available(Endpoint::BotStop)?;
        let url = self.client.http.api_url("/bot/stop");
        self.command_at(&url).await
    }

    /// `POST /api/bot/cmd/{command}[?save=1]`, e.g. `x` for panic sell.
    pub async fn cmd(&self, command: &str, save: bool) -> Result<BotStatus, SdkError> {
        self.client.ensure_available(Endpoint::BotCommand)?;
        let mut url = self
            .client
            .http
            .api_url(&format!("/bot/cmd/{}", urlencoding::encode(command)));
        if save {
            url.push_str("?save=1");
        }
        self.command_at(&url).await
    }

    async fn command_at(&self, url: &str) -> Result<BotStatus, SdkError> {
        let status: BotStatus = self
            .client
            .http
            .post(url, &serde_json::json!({}), RetryPolicy::None)
            .await?;
        self.client.running.set(status.running);
        Ok(status)
    }
}
