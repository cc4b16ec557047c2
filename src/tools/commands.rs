//! Command tools: list and edit.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::schema::RootSchema;
use schemars::{schema_for, JsonSchema};
use serde::Deserialize;
use serde_json::Value;

use crate::client::CmsClient;
use crate::outcome::ToolOutcome;
use crate::tools::{parse_params, Tool};

#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct GetCommandsParams {
    pub command_id: Option<i64>,
    /// Filter by command name (CMS substring match).
    pub command: Option<String>,
    /// Filter by command code.
    pub code: Option<String>,
}

/// `get_commands` — list display commands.
pub struct GetCommands {
    client: Arc<CmsClient>,
}

impl GetCommands {
    pub fn new(client: Arc<CmsClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GetCommands {
    fn name(&self) -> &str {
        "get_commands"
    }

    fn description(&self) -> &str {
        "List display commands"
    }

    fn parameters_schema(&self) -> RootSchema {
        schema_for!(GetCommandsParams)
    }

    async fn execute(&self, params: Value) -> ToolOutcome {
        let params: GetCommandsParams = match parse_params(params) {
            Ok(p) => p,
            Err(outcome) => return outcome,
        };
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(id) = params.command_id {
            query.push(("commandId", id.to_string()));
        }
        if let Some(name) = &params.command {
            query.push(("command", name.clone()));
        }
        if let Some(code) = &params.code {
            query.push(("code", code.clone()));
        }
        match self.client.get("/command", &query).await {
            Ok(raw) => ToolOutcome::ok(raw),
            Err(err) => err.into(),
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditCommandParams {
    pub command_id: i64,
    pub command: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub command_string: Option<String>,
}

/// `edit_command` — update an existing display command.
pub struct EditCommand {
    client: Arc<CmsClient>,
}

impl EditCommand {
    pub fn new(client: Arc<CmsClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for EditCommand {
    fn name(&self) -> &str {
        "edit_command"
    }

    fn description(&self) -> &str {
        "Edit an existing display command"
    }

    fn parameters_schema(&self) -> RootSchema {
        schema_for!(EditCommandParams)
    }

    async fn execute(&self, params: Value) -> ToolOutcome {
        let params: EditCommandParams = match parse_params(params) {
            Ok(p) => p,
            Err(outcome) => return outcome,
        };
        let mut form: Vec<(&str, String)> = vec![("command", params.command.clone())];
        if let Some(description) = &params.description {
            form.push(("description", description.clone()));
        }
        if let Some(command_string) = &params.command_string {
            form.push(("commandString", command_string.clone()));
        }
        let path = format!("/command/{}", params.command_id);
        match self.client.put_form(&path, &form).await {
            Ok(raw) => ToolOutcome::ok(raw),
            Err(err) => err.into(),
        }
    }
}
