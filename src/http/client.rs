//! Low-level HTTP client: `DeskHttp`.
//!
//! Owns the `reqwest::Client`, the bearer token and the retry loop. Endpoint
//! paths live in the domain sub-clients; this layer only moves JSON.

use crate::error::{error_detail, HttpError};
use crate::http::retry::{RetryConfig, RetryPolicy};

use async_lock::RwLock;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Low-level HTTP client for the desk REST API.
pub struct DeskHttp {
    base_url: String,
    api_base: String,
    client: Client,
    /// Bearer token. Empty tokens are stored as `None`.
    auth_token: Arc<RwLock<Option<String>>>,
}

impl DeskHttp {
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        let builder = Client::builder()
            .timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(10);

        let base_url = base_url.trim().trim_end_matches('/').to_string();
        let api_base = if base_url.ends_with("/api") {
            base_url.clone()
        } else {
            format!("{}/api", base_url)
        };

        Self {
            base_url,
            api_base,
            client: builder.build().expect("Failed to build HTTP client"),
            auth_token: Arc::new(RwLock::new(normalize_token(token))),
        }
    }

    /// The configured HTTP base, without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/api{path}`. `path` starts with `/` and may carry a query string.
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    pub(crate) async fn set_auth_token(&self, token: Option<String>) {
        *self.auth_token.write().await = normalize_token(token);
    }

    /// Current token for building pass-through links.
    ///
    /// Waits for an in-flight token update to finish.
    pub(crate) async fn token(&self) -> Option<String> {
        self.auth_token.read().await.clone()
    }

    // ── Internal HTTP methods ────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        retry: RetryPolicy,
    ) -> Result<T, HttpError> {
        self.request_with_retry(reqwest::Method::GET, url, None::<&()>, retry)
            .await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        retry: RetryPolicy,
    ) -> Result<T, HttpError> {
        self.request_with_retry(reqwest::Method::POST, url, Some(body), retry)
            .await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        retry: RetryPolicy,
    ) -> Result<T, HttpError> {
        self.request_with_retry(reqwest::Method::PUT, url, Some(body), retry)
            .await
    }

    async fn request_with_retry<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: reqwest::Method,
        url: &str,
        body: Option<&B>,
        retry: RetryPolicy,
    ) -> Result<T, HttpError> {
        let config = match &retry {
            RetryPolicy::None => {
                return self.do_request(&method, url, body).await;
            }
            RetryPolicy::Idempotent => RetryConfig::idempotent(),
            RetryPolicy::Custom(c) => c.clone(),
        };

        let mut last_error = None;

        for attempt in 0..=config.max_retries {
            match self.do_request::<T, B>(&method, url, body).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    let should_retry = match &e {
                        HttpError::ServerError { status, .. } => {
                            config.is_retryable_status(*status)
                        }
                        HttpError::RateLimited { .. } => config.is_retryable_status(429),
                        HttpError::Timeout => true,
                        HttpError::Reqwest(re) => re.is_connect() || re.is_timeout(),
                        _ => false,
                    };

                    if should_retry && attempt < config.max_retries {
                        // The server's Retry-After wins over our own backoff.
                        let delay = match &e {
                            HttpError::RateLimited {
                                retry_after_ms: Some(ms),
                            } => Duration::from_millis(*ms),
                            _ => config.delay_for_attempt(attempt),
                        };
                        tracing::debug!(
                            attempt = attempt + 1,
                            max = config.max_retries,
                            delay_ms = delay.as_millis() as u64,
                            "Retrying {} {}",
                            method,
                            url
                        );
                        futures_timer::Delay::new(delay).await;
                        last_error = Some(e);
                    } else {
                        return Err(e);
                    }
                }
            }
        }

        Err(HttpError::MaxRetriesExceeded {
            attempts: config.max_retries + 1,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        })
    }

    async fn do_request<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: &reqwest::Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<T, HttpError> {
        let mut req = self.client.request(method.clone(), url);

        if let Some(token) = self.auth_token.read().await.as_ref() {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        if let Some(b) = body {
            req = req.json(b);
        }

        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout
            } else {
                HttpError::Reqwest(e)
            }
        })?;
        let status = resp.status();

        if status.is_success() {
            let bytes = resp.bytes().await?;
            return parse_body(&bytes);
        }

        let status_code = status.as_u16();
        let retry_after_ms = resp
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_retry_after);
        let body_text = resp.text().await.unwrap_or_default();
        let err = status_error(status_code, &body_text, retry_after_ms);
        tracing::debug!("{} {} failed: {}", method, url, err);
        Err(err)
    }
}

impl Clone for DeskHttp {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            api_base: self.api_base.clone(),
            client: self.client.clone(),
            auth_token: self.auth_token.clone(),
        }
    }
}

fn normalize_token(token: Option<String>) -> Option<String> {
    token
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// `Retry-After` in delta-seconds, as milliseconds. HTTP dates are ignored.
fn parse_retry_after(value: &str) -> Option<u64> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .map(|secs| secs.saturating_mul(1000))
}

/// Decode a success body. An empty body decodes as JSON `null`.
fn parse_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, HttpError> {
    let is_blank = bytes.iter().all(u8::is_ascii_whitespace);
    let parsed = if is_blank {
        serde_json::from_value(serde_json::Value::Null)
    } else {
        serde_json::from_slice(bytes)
    };
    parsed.map_err(|e| HttpError::InvalidResponse(e.to_string()))
}

/// Map a non-success status and body to an error carrying the server's message.
fn status_error(status: u16, body: &str, retry_after_ms: Option<u64>) -> HttpError {
    let detail = error_detail(body);
    match status {
        401 => HttpError::Unauthorized(detail),
        404 => HttpError::NotFound(detail),
        429 => HttpError::RateLimited { retry_after_ms },
        400..=499 => HttpError::BadRequest {
            status,
            message: detail,
        },
        _ => HttpError::ServerError {
            status,
            body: detail,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_prefix() {
        let http = DeskHttp::new("http://127.0.0.1:8100/", None);
        assert_eq!(http.base_url(), "http://127.0.0.1:8100");
        assert_eq!(http.api_url("/bot/status"), "http://127.0.0.1:8100/api/bot/status");
    }

    #[test]
    fn test_api_url_base_already_api() {
        let http = DeskHttp::new("https://desk.example.com/api", None);
        assert_eq!(http.api_url("/config"), "https://desk.example.com/api/config");
    }

    #[tokio::test]
    async fn test_empty_token_is_none() {
        let http = DeskHttp::new("http://h", Some("  ".into()));
        assert_eq!(http.token().await, None);
        let http = DeskHttp::new("http://h", Some("abc".into()));
        assert_eq!(http.token().await.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_set_auth_token() {
        let http = DeskHttp::new("http://h", None);
        http.set_auth_token(Some("t1".into())).await;
        assert_eq!(http.token().await.as_deref(), Some("t1"));
        http.set_auth_token(None).await;
        assert_eq!(http.token().await, None);
    }

    #[tokio::test]
    async fn test_token_read_waits_for_writer() {
        let http = DeskHttp::new("http://h", Some("old".into()));
        let mut guard = http.auth_token.write().await;

        let reader = http.clone();
        let pending = tokio::spawn(async move { reader.token().await });
        tokio::task::yield_now().await;
        assert!(!pending.is_finished());

        *guard = Some("new".into());
        drop(guard);
        assert_eq!(pending.await.unwrap().as_deref(), Some("new"));
    }

    #[test]
    fn test_parse_retry_after() {
        assert_eq!(parse_retry_after(" 2 "), Some(2000));
        assert_eq!(parse_retry_after("18446744073709551615"), Some(u64::MAX));
        assert_eq!(parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT"), None);
    }

    #[test]
    fn test_status_error_mapping() {
        let err = status_error(404, r#"{"error":"Strategy not found"}"#, None);
        assert!(matches!(&err, HttpError::NotFound(m) if m == "Strategy not found"));
        assert_eq!(err.to_string(), "Not found: Strategy not found");

        let err = status_error(422, r#"{"detail":[{"msg":"field required"}]}"#, None);
        assert!(matches!(err, HttpError::BadRequest { status: 422, ref message } if message == "field required"));

        let err = status_error(429, "", Some(2000));
        assert!(matches!(err, HttpError::RateLimited { retry_after_ms: Some(2000) }));

        let err = status_error(503, "upstream down", None);
        assert_eq!(err.status(), Some(503));
    }

    #[test]
    fn test_parse_empty_body_as_null() {
        let v: serde_json::Value = parse_body(b"").unwrap();
        assert!(v.is_null());
        let o: Option<u32> = parse_body(b"  ").unwrap();
        assert_eq!(o, None);
        let err = parse_body::<Vec<u32>>(b"").unwrap_err();
        assert!(matches!(err, HttpError::InvalidResponse(_)));
    }
}
