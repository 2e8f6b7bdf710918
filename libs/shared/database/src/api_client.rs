use std::sync::Arc;
use std::time::Duration;

use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};

use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_utils::session::SessionStore;

const FALLBACK_FAILURE_MESSAGE: &str = "Operation failed";

/// JSON client for the hospital backend.
///
/// Authenticated calls read the bearer token from the session store on every
/// request, so a sign-in or sign-out elsewhere is picked up immediately.
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(config: &AppConfig, session: Arc<SessionStore>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });

        Self {
            client,
            base_url: config.base_url().to_string(),
            session,
        }
    }

    fn get_headers(&self, auth_token: Option<&str>) -> Result<HeaderMap, AppError> {
        let mut headers = HeaderMap::new();

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = auth_token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
                AppError::Auth("Session token is not a valid header value".to_string())
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }

    /// Authenticated request. Fails with `AppError::Auth` before sending if
    /// nobody is signed in.
    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        let token = self
            .session
            .token()
            .ok_or_else(|| AppError::Auth("Not signed in".to_string()))?;

        self.send(method, path, Some(&token), body).await
    }

    /// Request without an `Authorization` header (sign-in).
    pub async fn request_public<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        self.send(method, path, None, body).await
    }

    async fn send<T>(
        &self,
        method: Method,
        path: &str,
        auth_token: Option<&str>,
        body: Option<Value>,
    ) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let headers = self.get_headers(auth_token)?;

        let mut req = self.client.request(method, &url).headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await.map_err(|e| {
            error!("Request to {} failed: {}", url, e);
            AppError::Transport(format!("Request failed: {}", e))
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AppError::Transport(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            error!("API error ({}): {}", status, text);
            return Err(AppError::from_status(status.as_u16(), extract_message(&text)));
        }

        // 204 and other empty success bodies decode as JSON null
        let body = if text.trim().is_empty() { "null" } else { text.as_str() };
        let data = serde_json::from_str::<T>(body)?;
        Ok(data)
    }
}

/// Pull a human message out of an error body: the first `error.details[].message`,
/// then `{"message": ..}`, `{"error": ".."}`, `{"error": {"message": ..}}`, or the raw text.
fn extract_message(text: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        let candidate = value
            .pointer("/error/details/0/message")
            .and_then(Value::as_str)
            .or_else(|| value.get("message").and_then(Value::as_str))
            .or_else(|| value.get("error").and_then(Value::as_str))
            .or_else(|| {
                value
                    .get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(Value::as_str)
            });

        if let Some(message) = candidate.filter(|m| !m.trim().is_empty()) {
            return message.to_string();
        }
        return FALLBACK_FAILURE_MESSAGE.to_string();
    }

    let trimmed = text.trim();
    if trimmed.is_empty() {
        FALLBACK_FAILURE_MESSAGE.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_from_json_body() {
        assert_eq!(extract_message(r#"{"message":"Slot taken"}"#), "Slot taken");
        assert_eq!(extract_message(r#"{"error":"Invalid token"}"#), "Invalid token");
        assert_eq!(extract_message(r#"{"error":{"message":"Nope"}}"#), "Nope");
        let detailed = concat!(
            r#"{"message":"Validation failed","#,
            r#""error":{"details":[{"message":"Email is invalid"}]}}"#
        );
        assert_eq!(extract_message(detailed), "Email is invalid");
    }

    #[test]
    fn message_fallbacks() {
        assert_eq!(extract_message(r#"{"success":false}"#), FALLBACK_FAILURE_MESSAGE);
        assert_eq!(extract_message(""), FALLBACK_FAILURE_MESSAGE);
        assert_eq!(extract_message("Bad Gateway"), "Bad Gateway");
    }
}
