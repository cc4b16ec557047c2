//! Environment-driven CMS configuration.

use std::env;

use crate::error::ToolError;

/// Connection settings for a Xibo CMS instance.
#[derive(Debug, Clone)]
pub struct CmsConfig {
    /// Base URL of the CMS, without a trailing slash.
    pub base_url: String,
}

impl CmsConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Read configuration from the environment. The base URL is required;
    /// a missing value short-circuits before any network call.
    pub fn from_env() -> Result<Self, ToolError> {
        let base_url = env::var("XIBO_CMS_URL")
            .map_err(|_| ToolError::Config("missing XIBO_CMS_URL".into()))?;
        if base_url.trim().is_empty() {
            return Err(ToolError::Config("XIBO_CMS_URL is empty".into()));
        }
        Ok(Self::new(base_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_stripped() {
        let config = CmsConfig::new("https://cms.example.com/");
        assert_eq!(config.base_url, "https://cms.example.com");
    }

    #[test]
    fn plain_url_unchanged() {
        let config = CmsConfig::new("http://localhost:8080");
        assert_eq!(config.base_url, "http://localhost:8080");
    }
}
