//! User tools: list (user → group tree view), edit, and the compound
//! password change.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::schema::RootSchema;
use schemars::{schema_for, JsonSchema};
use serde::Deserialize;
use serde_json::Value;

use crate::client::{validate, CmsClient};
use crate::error::ToolError;
use crate::outcome::ToolOutcome;
use crate::tools::{parse_params, Tool};
use crate::tree::{tree_success, NodeKind, TreeNode};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: i64,
    pub user_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_type_id: Option<i64>,
    #[serde(default)]
    pub groups: Vec<UserGroup>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGroup {
    pub group_id: i64,
    pub group: String,
}

pub fn build_user_tree(users: &[User]) -> Vec<TreeNode> {
    users
        .iter()
        .map(|user| {
            let groups = user
                .groups
                .iter()
                .map(|group| TreeNode::new(group.group_id, group.group.clone(), NodeKind::UserGroup))
                .collect();
            TreeNode::new(user.user_id, user.user_name.clone(), NodeKind::User)
                .with_children(groups)
        })
        .collect()
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct GetUsersParams {
    pub user_id: Option<i64>,
    /// Filter by user name (CMS substring match).
    pub user_name: Option<String>,
    pub tree_view: bool,
}

/// `get_users` — list CMS users with their group memberships.
pub struct GetUsers {
    client: Arc<CmsClient>,
}

impl GetUsers {
    pub fn new(client: Arc<CmsClient>) -> Self {
        Self { client }
    }

    async fn run(&self, params: GetUsersParams) -> Result<ToolOutcome, ToolError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(id) = params.user_id {
            query.push(("userId", id.to_string()));
        }
        if let Some(name) = &params.user_name {
            query.push(("userName", name.clone()));
        }

        let raw = self.client.get("/user", &query).await?;
        if params.tree_view {
            let users: Vec<User> = validate(&raw)?;
            Ok(tree_success(raw, &build_user_tree(&users), None))
        } else {
            Ok(ToolOutcome::ok(raw))
        }
    }
}

#[async_trait]
impl Tool for GetUsers {
    fn name(&self) -> &str {
        "get_users"
    }

    fn description(&self) -> &str {
        "List CMS users and their group memberships, optionally as a tree view"
    }

    fn parameters_schema(&self) -> RootSchema {
        schema_for!(GetUsersParams)
    }

    async fn execute(&self, params: Value) -> ToolOutcome {
        let params = match parse_params(params) {
            Ok(p) => p,
            Err(outcome) => return outcome,
        };
        self.run(params).await.unwrap_or_else(ToolOutcome::from)
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditUserParams {
    pub user_id: i64,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub new_password: Option<String>,
}

impl EditUserParams {
    fn form(&self) -> Vec<(&'static str, String)> {
        let mut form = Vec::new();
        if let Some(name) = &self.user_name {
            form.push(("userName", name.clone()));
        }
        if let Some(email) = &self.email {
            form.push(("email", email.clone()));
        }
        if let Some(password) = &self.new_password {
            form.push(("newPassword", password.clone()));
            form.push(("retypeNewPassword", password.clone()));
        }
        form
    }
}

/// `edit_user` — update fields of an existing user.
pub struct EditUser {
    client: Arc<CmsClient>,
}

impl EditUser {
    pub fn new(client: Arc<CmsClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for EditUser {
    fn name(&self) -> &str {
        "edit_user"
    }

    fn description(&self) -> &str {
        "Edit an existing CMS user"
    }

    fn parameters_schema(&self) -> RootSchema {
        schema_for!(EditUserParams)
    }

    async fn execute(&self, params: Value) -> ToolOutcome {
        let params: EditUserParams = match parse_params(params) {
            Ok(p) => p,
            Err(outcome) => return outcome,
        };
        let path = format!("/user/{}", params.user_id);
        match self.client.put_form(&path, &params.form()).await {
            Ok(raw) => ToolOutcome::ok(raw),
            Err(err) => err.into(),
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangeUserPasswordParams {
    pub user_id: i64,
    pub new_password: String,
}

/// `change_user_password` — fetch the user, then edit with the new
/// password. Two sequential calls; if the edit fails after the fetch
/// succeeded there is no rollback (the fetch has no side effects).
pub struct ChangeUserPassword {
    client: Arc<CmsClient>,
}

impl ChangeUserPassword {
    pub fn new(client: Arc<CmsClient>) -> Self {
        Self { client }
    }

    async fn run(&self, params: ChangeUserPasswordParams) -> Result<ToolOutcome, ToolError> {
        // The edit endpoint requires the current userName, so fetch first.
        let raw = self
            .client
            .get("/user", &[("userId", params.user_id.to_string())])
            .await?;
        let users: Vec<User> = validate(&raw)?;
        let user = users.first().ok_or_else(|| ToolError::Api {
            status: 404,
            message: format!("user {} not found", params.user_id),
            body: None,
        })?;

        let form: Vec<(&str, String)> = vec![
            ("userName", user.user_name.clone()),
            ("newPassword", params.new_password.clone()),
            ("retypeNewPassword", params.new_password.clone()),
        ];
        let path = format!("/user/{}", params.user_id);
        let edited = self.client.put_form(&path, &form).await?;
        Ok(ToolOutcome::ok(edited))
    }
}

#[async_trait]
impl Tool for ChangeUserPassword {
    fn name(&self) -> &str {
        "change_user_password"
    }

    fn description(&self) -> &str {
        "Change a user's password (fetches the user, then edits it)"
    }

    fn parameters_schema(&self) -> RootSchema {
        schema_for!(ChangeUserPasswordParams)
    }

    async fn execute(&self, params: Value) -> ToolOutcome {
        let params = match parse_params(params) {
            Ok(p) => p,
            Err(outcome) => return outcome,
        };
        self.run(params).await.unwrap_or_else(ToolOutcome::from)
    }
}
