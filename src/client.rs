//! HTTP client for the Xibo CMS REST API.
//!
//! Wraps reqwest with bearer-auth injection, form-encoded mutation bodies,
//! and error-body decoding. Response handling is factored into pure
//! functions so status/body paths are testable without a network.

use std::sync::Arc;

use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::auth::AuthProvider;
use crate::config::CmsConfig;
use crate::error::ToolError;

/// Client for a single CMS instance. Shared across tools via `Arc`.
pub struct CmsClient {
    http: Client,
    base_url: String,
    auth: Arc<dyn AuthProvider>,
}

impl CmsClient {
    pub fn new(config: &CmsConfig, auth: Arc<dyn AuthProvider>) -> Self {
        Self {
            http: Client::new(),
            base_url: config.base_url.clone(),
            auth,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    /// GET with query-string filters; returns the raw JSON body.
    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ToolError> {
        let req = self.http.request(Method::GET, self.url(path)).query(query);
        self.send(path, req).await
    }

    /// POST a form-encoded body.
    pub async fn post_form(&self, path: &str, form: &[(&str, String)]) -> Result<Value, ToolError> {
        let req = self.http.request(Method::POST, self.url(path)).form(form);
        self.send(path, req).await
    }

    /// PUT a form-encoded body.
    pub async fn put_form(&self, path: &str, form: &[(&str, String)]) -> Result<Value, ToolError> {
        let req = self.http.request(Method::PUT, self.url(path)).form(form);
        self.send(path, req).await
    }

    /// POST a multipart body (library uploads).
    pub async fn post_multipart(&self, path: &str, form: Form) -> Result<Value, ToolError> {
        let req = self
            .http
            .request(Method::POST, self.url(path))
            .multipart(form);
        self.send(path, req).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ToolError> {
        let req = self.http.request(Method::DELETE, self.url(path));
        self.send(path, req).await
    }

    async fn send(&self, path: &str, req: RequestBuilder) -> Result<Value, ToolError> {
        let token = self.auth.bearer_token().await?;
        let response = req.bearer_auth(token).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        tracing::debug!(path, status, bytes = body.len(), "CMS response");
        handle_response(status, &body)
    }
}

/// Map a status/body pair to a JSON value or a decoded error.
pub(crate) fn handle_response(status: u16, body: &str) -> Result<Value, ToolError> {
    if !(200..300).contains(&status) {
        return Err(decode_error_body(status, body));
    }
    if body.trim().is_empty() {
        // 204-style responses (delete, some PUTs) have no body.
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|err| ToolError::Validation {
        message: format!("2xx response was not valid JSON: {err}"),
        value: None,
    })
}

/// Decode a non-2xx body into an `Api` error. Xibo nests messages under
/// `error.message` or `message`, and some endpoints percent-encode a JSON
/// object into the message string.
fn decode_error_body(status: u16, body: &str) -> ToolError {
    let data: Option<Value> = serde_json::from_str(body).ok();
    let raw = data.as_ref().and_then(extract_message).unwrap_or_else(|| {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            "(no body)".to_string()
        } else {
            trimmed.to_string()
        }
    });
    let message = decode_cms_message(&raw);
    tracing::warn!(status, %message, "CMS request failed");
    ToolError::Api {
        status,
        message,
        body: data,
    }
}

fn extract_message(body: &Value) -> Option<String> {
    body.pointer("/error/message")
        .or_else(|| body.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Percent-decode a CMS error message and, when the decoded text is itself
/// a JSON object, unwrap it into a readable message.
pub(crate) fn decode_cms_message(raw: &str) -> String {
    let decoded = match urlencoding::decode(raw) {
        Ok(text) => text.into_owned(),
        Err(_) => raw.to_string(),
    };
    if let Ok(inner) = serde_json::from_str::<Value>(&decoded) {
        if let Some(message) = inner.get("message").and_then(Value::as_str) {
            return message.to_string();
        }
        // Field-keyed validation objects like {"name":"Name must be unique"}.
        if let Some(obj) = inner.as_object() {
            let parts: Vec<String> = obj
                .iter()
                .filter_map(|(field, v)| v.as_str().map(|msg| format!("{field}: {msg}")))
                .collect();
            if !parts.is_empty() {
                return parts.join("; ");
            }
        }
    }
    decoded
}

/// Check a raw response value against a typed mirror, surfacing serde
/// diagnostics plus the offending payload instead of panicking.
pub fn validate<T: DeserializeOwned>(value: &Value) -> Result<T, ToolError> {
    serde_json::from_value(value.clone()).map_err(|err| ToolError::Validation {
        message: err.to_string(),
        value: Some(value.clone()),
    })
}
