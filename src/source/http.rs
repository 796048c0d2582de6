//! HTTP engine client returning base64 content

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;
use tracing::{debug, warn};

use super::{EngineError, EngineService};
use crate::config::EngineConfig;

type Result<T> = std::result::Result<T, EngineError>;

/// Engine service reached over HTTP
///
/// `get("some/remote/path")` issues `GET {base_url}/some/remote/path` and
/// expects the response body to be the base64 text of the content.
#[derive(Debug, Clone)]
pub struct HttpEngineService {
    client: Client,
    base_url: Url,
    token: Option<String>,
    max_retries: u32,
    retry_backoff: Duration,
    max_response_bytes: u64,
}

impl HttpEngineService {
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let raw = config.base_url.as_deref().ok_or_else(|| {
            EngineError::Misconfigured("http provider requires engine.base_url".to_string())
        })?;
        let base_url = Url::parse(raw).map_err(|e| EngineError::InvalidUrl(format!("{raw}: {e}")))?;

        let client = Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| EngineError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            token: config.token.clone(),
            max_retries: config.max_retries.max(1),
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
            max_response_bytes: config.max_response_bytes.as_u64(),
        })
    }

    /// Resolve a remote path against the base URL
    pub fn url_for(&self, path: &str) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let joined = format!("{}/{}", base, path.trim_start_matches('/'));
        Url::parse(&joined).map_err(|e| EngineError::InvalidUrl(format!("{joined}: {e}")))
    }

    async fn get_once(&self, path: &str, url: &Url) -> Result<String> {
        debug!(%url, "Fetching remote content");

        let mut request = self.client.get(url.clone());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let mut response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                EngineError::Timeout
            } else {
                EngineError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(EngineError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            return Err(EngineError::RequestFailed(format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        if let Some(length) = response.content_length() {
            self.check_size(length)?;
        }

        // Chunked bodies carry no length, so the limit is enforced while reading
        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| EngineError::RequestFailed(format!("Failed to read body: {}", e)))?
        {
            self.check_size((body.len() + chunk.len()) as u64)?;
            body.extend_from_slice(&chunk);
        }

        let text = std::str::from_utf8(&body)
            .map_err(|_| EngineError::RequestFailed("response body is not UTF-8 text".to_string()))?;

        debug!(%url, size = body.len(), "Fetch completed");

        Ok(text.trim().to_string())
    }

    fn check_size(&self, actual: u64) -> Result<()> {
        if actual > self.max_response_bytes {
            return Err(EngineError::TooLarge {
                actual,
                limit: self.max_response_bytes,
            });
        }
        Ok(())
    }
}

const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Delay before retry `attempt` (1-based): `base * 2^(attempt - 1)`, capped
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let factor = 2u32
        .checked_pow(attempt.saturating_sub(1))
        .unwrap_or(u32::MAX);
    base.checked_mul(factor)
        .map_or(MAX_BACKOFF, |delay| delay.min(MAX_BACKOFF))
}

/// Failures worth another attempt
fn is_retryable(err: &EngineError) -> bool {
    matches!(err, EngineError::RequestFailed(_) | EngineError::Timeout)
}

#[async_trait]
impl EngineService for HttpEngineService {
    async fn get(&self, path: &str) -> Result<String> {
        let url = self.url_for(path)?;
        let mut attempts = 0;

        loop {
            attempts += 1;

            match self.get_once(path, &url).await {
                Ok(text) => {
                    if attempts > 1 {
                        debug!(%url, attempts, "Fetch succeeded after retry");
                    }
                    return Ok(text);
                }
                Err(e) if is_retryable(&e) && attempts < self.max_retries => {
                    warn!(%url, attempts, error = %e, "Fetch failed, retrying");

                    tokio::time::sleep(backoff_delay(self.retry_backoff, attempts)).await;
                }
                Err(e) => {
                    warn!(%url, attempts, error = %e, "Fetch failed");
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> EngineConfig {
        EngineConfig {
            base_url: Some(base_url.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_url_join() {
        let service = HttpEngineService::new(&config("http://engine:8080/files/")).unwrap();
        let url = service.url_for("/some/remote/path").unwrap();
        assert_eq!(url.as_str(), "http://engine:8080/files/some/remote/path");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpEngineService::new(&config("not a url"));
        assert!(matches!(result, Err(EngineError::InvalidUrl(_))));
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let base = Duration::from_millis(500);
        assert_eq!(backoff_delay(base, 1), base);
        assert_eq!(backoff_delay(base, 3), Duration::from_secs(2));
        assert_eq!(backoff_delay(base, 40), MAX_BACKOFF);
        assert_eq!(backoff_delay(Duration::from_millis(u64::MAX), 2), MAX_BACKOFF);
        assert_eq!(backoff_delay(Duration::ZERO, 100), Duration::ZERO);
    }

    #[test]
    fn test_retry_classification() {
        assert!(is_retryable(&EngineError::Timeout));
        assert!(is_retryable(&EngineError::RequestFailed("HTTP 503".into())));
        assert!(!is_retryable(&EngineError::NotFound("x".into())));
        assert!(!is_retryable(&EngineError::TooLarge { actual: 2, limit: 1 }));
    }
}
