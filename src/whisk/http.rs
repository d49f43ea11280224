//! HTTP utilities for the platform REST API

use anyhow::{Context, Result};
use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;
use std::time::Duration;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let cut = (0..=MAX_LOG_BODY_LENGTH)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Pull the server's `error` message out of an error body, if it has one
fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("error")? {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj.get("message")?.as_str().map(str::to_string),
        _ => None,
    }
}

/// Basic-auth credentials from a `uuid:key` token
fn split_auth(token: &str) -> (&str, Option<&str>) {
    match token.split_once(':') {
        Some((user, key)) => (user, Some(key)),
        None => (token, None),
    }
}

/// HTTP client wrapper for platform API calls
#[derive(Clone)]
pub struct WhiskHttpClient {
    client: Client,
}

impl WhiskHttpClient {
    /// Create a new HTTP client
    pub fn new(insecure: bool) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("wsk-api/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .danger_accept_invalid_certs(insecure)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    fn request(&self, method: Method, url: &str, token: &str) -> RequestBuilder {
        let (user, key) = split_auth(token);
        self.client.request(method, url).basic_auth(user, key)
    }

    /// Send a request and decode the JSON response.
    /// An empty body decodes to `Value::Null`.
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        token: &str,
        body: Option<&Value>,
    ) -> Result<Value> {
        tracing::debug!("{} {}", method, url);

        let mut request = self.request(method, url, token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.context("Failed to send request")?;

        let status = response.status();
        let response_body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&response_body));
            return Err(match server_message(&response_body) {
                Some(msg) => anyhow::anyhow!("API request failed: {} ({})", status, msg),
                None => anyhow::anyhow!("API request failed: {}", status),
            });
        }

        if response_body.is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&response_body).context("Failed to parse response JSON")
    }

    pub async fn get(&self, url: &str, token: &str) -> Result<Value> {
        self.send(Method::GET, url, token, None).await
    }

    pub async fn put(&self, url: &str, token: &str, body: &Value) -> Result<Value> {
        self.send(Method::PUT, url, token, Some(body)).await
    }

    pub async fn delete(&self, url: &str, token: &str) -> Result<Value> {
        self.send(Method::DELETE, url, token, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_truncates() {
        let long = "x".repeat(500);
        let out = sanitize_for_log(&long);
        assert!(out.starts_with(&"x".repeat(MAX_LOG_BODY_LENGTH)));
        assert!(out.contains("500 bytes total"));
    }

    #[test]
    fn test_sanitize_strips_control_chars() {
        assert_eq!(sanitize_for_log("a\nb\tc"), "abc");
    }

    #[test]
    fn test_server_message_shapes() {
        assert_eq!(
            server_message(r#"{"error":"The requested resource does not exist."}"#),
            Some("The requested resource does not exist.".to_string())
        );
        assert_eq!(
            server_message(r#"{"error":{"code":401,"message":"Invalid credentials"}}"#),
            Some("Invalid credentials".to_string())
        );
        assert_eq!(server_message("not json"), None);
    }

    #[test]
    fn test_split_auth() {
        assert_eq!(split_auth("uuid:key"), ("uuid", Some("key")));
        assert_eq!(split_auth("token"), ("token", None));
    }
}
