//! Bearer-token providers.
//!
//! Token acquisition (OAuth client-credentials against the CMS) lives
//! outside this crate; tools only need something that yields a bearer
//! token per request.

use async_trait::async_trait;

use crate::error::ToolError;

/// Supplies the bearer token attached to every CMS request.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn bearer_token(&self) -> Result<String, ToolError>;
}

/// Fixed-token provider, for pre-issued tokens and tests.
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl AuthProvider for StaticTokenProvider {
    async fn bearer_token(&self) -> Result<String, ToolError> {
        Ok(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_provider_returns_token() {
        let provider = StaticTokenProvider::new("abc123");
        assert_eq!(provider.bearer_token().await.unwrap(), "abc123");
    }
}
