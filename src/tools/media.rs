//! Library media tools: list and upload.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use schemars::schema::RootSchema;
use schemars::{schema_for, JsonSchema};
use serde::Deserialize;
use serde_json::Value;

use crate::client::CmsClient;
use crate::error::ToolError;
use crate::outcome::ToolOutcome;
use crate::tools::{parse_params, Tool};

#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct GetMediaParams {
    pub media_id: Option<i64>,
    /// Filter by media name (CMS substring match).
    pub media: Option<String>,
    /// Filter by media type (image, video, ...).
    #[serde(rename = "type")]
    pub media_type: Option<String>,
}

/// `get_media` — list library media.
pub struct GetMedia {
    client: Arc<CmsClient>,
}

impl GetMedia {
    pub fn new(client: Arc<CmsClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GetMedia {
    fn name(&self) -> &str {
        "get_media"
    }

    fn description(&self) -> &str {
        "List library media items"
    }

    fn parameters_schema(&self) -> RootSchema {
        schema_for!(GetMediaParams)
    }

    async fn execute(&self, params: Value) -> ToolOutcome {
        let params: GetMediaParams = match parse_params(params) {
            Ok(p) => p,
            Err(outcome) => return outcome,
        };
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(id) = params.media_id {
            query.push(("mediaId", id.to_string()));
        }
        if let Some(name) = &params.media {
            query.push(("media", name.clone()));
        }
        if let Some(media_type) = &params.media_type {
            query.push(("type", media_type.clone()));
        }
        match self.client.get("/library", &query).await {
            Ok(raw) => ToolOutcome::ok(raw),
            Err(err) => err.into(),
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadMediaParams {
    /// Local path of the file to upload.
    pub file_path: String,
    /// Library name; defaults to the file name.
    #[serde(default)]
    pub name: Option<String>,
}

/// `upload_media` — multipart upload of a local file into the library.
pub struct UploadMedia {
    client: Arc<CmsClient>,
}

impl UploadMedia {
    pub fn new(client: Arc<CmsClient>) -> Self {
        Self { client }
    }

    async fn run(&self, params: UploadMediaParams) -> Result<ToolOutcome, ToolError> {
        let file_name = params
            .name
            .clone()
            .or_else(|| {
                Path::new(&params.file_path)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
            })
            .ok_or_else(|| ToolError::Config(format!("invalid file path: {}", params.file_path)))?;

        let bytes = tokio::fs::read(&params.file_path).await?;
        let part = Part::bytes(bytes).file_name(file_name.clone());
        let form = Form::new().part("files", part).text("name", file_name);

        let raw = self.client.post_multipart("/library", form).await?;
        Ok(ToolOutcome::ok(raw))
    }
}

#[async_trait]
impl Tool for UploadMedia {
    fn name(&self) -> &str {
        "upload_media"
    }

    fn description(&self) -> &str {
        "Upload a local file into the CMS library"
    }

    fn parameters_schema(&self) -> RootSchema {
        schema_for!(UploadMediaParams)
    }

    async fn execute(&self, params: Value) -> ToolOutcome {
        let params = match parse_params(params) {
            Ok(p) => p,
            Err(outcome) => return outcome,
        };
        self.run(params).await.unwrap_or_else(ToolOutcome::from)
    }
}
