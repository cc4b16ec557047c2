//! Tool surface — self-documenting, independently invocable CMS operations.
//!
//! Tools don't orchestrate — they execute one request/response cycle.
//! Every tool carries metadata (name, description, parameter schema) for
//! the surrounding agent framework, and `execute` never returns `Err`:
//! all failures come back inside the result envelope.

pub mod commands;
pub mod displays;
pub mod generation;
pub mod layouts;
pub mod media;
pub mod notifications;
pub mod playlists;
pub mod users;

use std::sync::Arc;

use async_trait::async_trait;
use schemars::schema::RootSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::CmsClient;
use crate::history::HistoryStore;
use crate::outcome::ToolOutcome;

/// A single agent-invocable CMS operation.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (used in routing).
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// JSON schema for this tool's parameter object.
    fn parameters_schema(&self) -> RootSchema;

    /// Run the tool. Must not panic and must not return an error —
    /// every failure is folded into the envelope.
    async fn execute(&self, params: Value) -> ToolOutcome;
}

/// Serialized tool metadata handed to the agent framework.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Holds every registered tool and dispatches invocations by name.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Registry with the full built-in toolset.
    pub fn with_defaults(client: Arc<CmsClient>, history: Arc<HistoryStore>) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(displays::GetDisplays::new(client.clone())));
        registry.register(Box::new(displays::AuthorizeDisplay::new(client.clone())));
        registry.register(Box::new(layouts::GetLayouts::new(client.clone())));
        registry.register(Box::new(layouts::PublishLayout::new(client.clone())));
        registry.register(Box::new(layouts::CheckoutLayout::new(client.clone())));
        registry.register(Box::new(playlists::GetPlaylists::new(client.clone())));
        registry.register(Box::new(playlists::AddPlaylist::new(client.clone())));
        registry.register(Box::new(users::GetUsers::new(client.clone())));
        registry.register(Box::new(users::EditUser::new(client.clone())));
        registry.register(Box::new(users::ChangeUserPassword::new(client.clone())));
        registry.register(Box::new(notifications::GetNotifications::new(
            client.clone(),
        )));
        registry.register(Box::new(notifications::AddNotification::new(client.clone())));
        registry.register(Box::new(commands::GetCommands::new(client.clone())));
        registry.register(Box::new(commands::EditCommand::new(client.clone())));
        registry.register(Box::new(media::GetMedia::new(client.clone())));
        registry.register(Box::new(media::UploadMedia::new(client)));
        registry.register(Box::new(generation::GetGenerationHistory::new(history)));
        registry
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.push(tool);
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Metadata for every registered tool.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|tool| ToolDefinition {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                input_schema: serde_json::to_value(tool.parameters_schema())
                    .unwrap_or(Value::Null),
            })
            .collect()
    }

    /// Invoke one tool by name. Unknown names fail inside the envelope,
    /// matching the no-throw contract.
    pub async fn dispatch(&self, name: &str, params: Value) -> ToolOutcome {
        match self.tools.iter().find(|tool| tool.name() == name) {
            Some(tool) => tool.execute(params).await,
            None => ToolOutcome::fail(format!("unknown tool: {name}")),
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Deserialize a tool's parameter object, turning serde failures into a
/// failure envelope instead of an error.
pub(crate) fn parse_params<T: DeserializeOwned>(params: Value) -> Result<T, ToolOutcome> {
    serde_json::from_value(params)
        .map_err(|err| ToolOutcome::fail(format!("invalid parameters: {err}")))
}
