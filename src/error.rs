//! Error taxonomy for CMS tool calls.
//!
//! Every variant is recoverable: tools convert errors into the failure
//! half of the result envelope at the `execute` boundary, nothing is
//! allowed to propagate past a tool.

use serde_json::Value;

/// Errors raised while executing a CMS tool.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CMS request failed (status {status}): {message}")]
    Api {
        status: u16,
        message: String,
        /// Decoded JSON error body, when the CMS sent one.
        body: Option<Value>,
    },

    #[error("response validation failed: {message}")]
    Validation {
        message: String,
        /// The payload that failed validation, for agent diagnostics.
        value: Option<Value>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ToolError {
    /// Short variant name, used for the `{name, message}` normalization
    /// in failure envelopes.
    pub fn name(&self) -> &'static str {
        match self {
            ToolError::Config(_) => "ConfigError",
            ToolError::Http(_) => "HttpError",
            ToolError::Api { .. } => "ApiError",
            ToolError::Validation { .. } => "ValidationError",
            ToolError::Io(_) => "IoError",
            ToolError::Json(_) => "JsonError",
        }
    }
}
