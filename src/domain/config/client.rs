//! Config sub-client: fetch, save, default, restore.

use crate::client::DeskClient;
use crate::config::Endpoint;
use crate::domain::config::ConfigSnapshot;
use crate::error::{HttpError, SdkError};
use crate::http::RetryPolicy;
use serde_json::{json, Map, Value};

/// Statuses that mean "wrong method or body shape", worth trying the next variant.
const CONTRACT_MISMATCH: [u16; 4] = [400, 405, 415, 422];

pub struct Config<'a> {
    pub(crate) client: &'a DeskClient,
}

impl<'a> Config<'a> {
    /// `GET /api/config`. Accepts both the bare and the `{cfg}` response.
    pub async fn get(&self) -> Result<ConfigSnapshot, SdkError> {
        self.client.ensure_available(Endpoint::Config)?;
        let url = self.client.http.api_url("/config");
        let value: Value = self.client.http.get(&url, RetryPolicy::Idempotent).await?;
        ConfigSnapshot::from_response(value)
    }

    /// Persist a configuration.
    ///
    /// Tries `PUT {cfg}`, `PUT <raw>`, `POST {cfg}`, `POST <raw>` in order,
    /// moving on only when the server rejects the method or body shape
    /// (400/405/415/422). Any other failure is returned immediately.
    pub async fn put(&self, cfg: &ConfigSnapshot) -> Result<Value, SdkError> {
        self.client.ensure_available(Endpoint::Config)?;
        let url = self.client.http.api_url("/config");
        let raw = cfg.clone().into_value();
        let mut envelope = Map::new();
        envelope.insert("cfg".to_string(), raw.clone());
        let wrapped = Value::Object(envelope);

        let attempts: [(&str, &Value); 4] = [
            ("PUT", &wrapped),
            ("PUT", &raw),
            ("POST", &wrapped),
            ("POST", &raw),
        ];

        let mut last_err = None;
        for (method, body) in attempts {
            let result: Result<Value, HttpError> = match method {
                "PUT" => self.client.http.put(&url, body, RetryPolicy::None).await,
                _ => self.client.http.post(&url, body, RetryPolicy::None).await,
            };
            match result {
                Ok(value) => return Ok(value),
                Err(e) if is_contract_mismatch(&e) => {
                    tracing::debug!(
                        status = e.status().unwrap_or_default(),
                        "Config save via {} rejected, trying next variant",
                        method
                    );
                    last_err = Some(e);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(last_err
            .map(SdkError::from)
            .unwrap_or_else(|| SdkError::Other("config save not attempted".into())))
    }

    /// `GET /api/config/default`.
    pub async fn default(&self) -> Result<ConfigSnapshot, SdkError> {
        self.client.ensure_available(Endpoint::Config)?;
        let url = self.client.http.api_url("/config/default");
        let value: Value = self.client.http.get(&url, RetryPolicy::Idempotent).await?;
        ConfigSnapshot::from_response(value)
    }

    /// `POST /api/config/restore`: reload the persisted configuration.
    pub async fn restore(&self) -> Result<ConfigSnapshot, SdkError> {
        self.client.ensure_available(Endpoint::Config)?;
        let url = self.client.http.api_url("/config/restore");
        let value: Value = self
            .client
            .http
            .post(&url, &json!({}), RetryPolicy::None)
            .await?;
        ConfigSnapshot::from_response(value)
    }
}

fn is_contract_mismatch(err: &HttpError) -> bool {
    err.status().is_some_and(|s| CONTRACT_MISMATCH.contains(&s))
}
