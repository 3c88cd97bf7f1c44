//! HTTP utilities for Yandex Cloud REST API calls

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::error::{Error, Result};

/// Default timeout for control-plane calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Monitoring queries return larger payloads and get a longer timeout.
pub const MONITORING_TIMEOUT: Duration = Duration::from_secs(90);

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and masks potentially sensitive patterns
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        format!(
            "{}... [truncated, {} bytes total]",
            &body[..MAX_LOG_BODY_LENGTH],
            body.len()
        )
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// HTTP client wrapper for Yandex Cloud API calls
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("ycinv/", env!("CARGO_PKG_VERSION")))
            .timeout(DEFAULT_TIMEOUT)
            .build()?;

        Ok(Self { client })
    }

    /// Make an authenticated GET request and parse the JSON response.
    pub async fn get(&self, url: &str, token: &str, query: &[(&str, &str)]) -> Result<Value> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Only log a sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(Error::Api {
                context: format!("GET {}", url),
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Make an authenticated POST request with a JSON body.
    pub async fn post(
        &self,
        url: &str,
        token: &str,
        query: &[(&str, &str)],
        body: &Value,
        timeout: Duration,
    ) -> Result<Value> {
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .query(query)
            .json(body)
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status();
        let response_body = response.text().await?;

        if !status.is_success() {
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&response_body));
            return Err(Error::Api {
                context: format!("POST {}", url),
                status: status.as_u16(),
                body: response_body,
            });
        }

        if response_body.is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_str(&response_body)?)
    }

    /// POST to the IAM token endpoint. No bearer auth; failures are
    /// reported as token-exchange errors rather than listing errors.
    pub async fn exchange(&self, url: &str, body: &Value) -> Result<Value> {
        tracing::debug!("POST {} (token exchange)", url);

        let response = self.client.post(url).json(body).send().await?;

        let status = response.status();
        let response_body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                "token exchange error: {} - {}",
                status,
                sanitize_for_log(&response_body)
            );
            return Err(Error::TokenExchange {
                status: status.as_u16(),
                body: response_body,
            });
        }

        Ok(serde_json::from_str(&response_body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_truncates_long_bodies() {
        let body = "x".repeat(500);
        let logged = sanitize_for_log(&body);
        assert!(logged.contains("truncated"));
        assert!(logged.contains("500 bytes total"));
    }

    #[test]
    fn sanitize_strips_control_characters() {
        assert_eq!(sanitize_for_log("ok\r\nline"), "okline");
    }
}
