//! Display tools: list (grouped tree view) and authorize.

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
pub struct Display {
    pub display_id: i64,
    pub display: String,
    #[serde(default)]
    pub display_group_id: Option<i64>,
    #[serde(default)]
    pub display_groups: Vec<DisplayGroup>,
    #[serde(default)]
    pub licensed: Option<i64>,
    #[serde(default)]
    pub logged_in: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayGroup {
    pub display_group_id: i64,
    pub display_group: String,
}

/// Group displays under synthetic display-group nodes. Groups get derived
/// negative ids so they never collide with real display ids; ungrouped
/// displays land under a sentinel "Ungrouped" node with id 0.
pub fn build_display_tree(displays: &[Display]) -> Vec<TreeNode> {
    let mut groups: Vec<(i64, String, Vec<TreeNode>)> = Vec::new();

    for display in displays {
        let (group_id, group_name) = display
            .display_groups
            .first()
            .map(|g| (g.display_group_id, g.display_group.clone()))
            .or_else(|| {
                display
                    .display_group_id
                    .map(|id| (id, format!("Display Group {id}")))
            })
            .unwrap_or((0, "Ungrouped".to_string()));

        let node = TreeNode::new(display.display_id, display.display.clone(), NodeKind::Display);
        match groups.iter_mut().find(|(id, _, _)| *id == group_id) {
            Some((_, _, children)) => children.push(node),
            None => groups.push((group_id, group_name, vec![node])),
        }
    }

    groups
        .into_iter()
        .map(|(id, name, children)| {
            TreeNode::new(-id, name, NodeKind::DisplayGroup).with_children(children)
        })
        .collect()
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct GetDisplaysParams {
    pub display_id: Option<i64>,
    /// Filter by display name (CMS substring match).
    pub display: Option<String>,
    pub display_group_id: Option<i64>,
    /// Attach `tree` and `treeViewText` to the response.
    pub tree_view: bool,
}

/// `get_displays` — list registered displays.
pub struct GetDisplays {
    client: Arc<CmsClient>,
}

impl GetDisplays {
    pub fn new(client: Arc<CmsClient>) -> Self {
        Self { client }
    }

    async fn run(&self, params: GetDisplaysParams) -> Result<ToolOutcome, ToolError> {
        let mut query: Vec<(&str, String)> = vec![("embed", "displaygroups".to_string())];
        if let Some(id) = params.display_id {
            query.push(("displayId", id.to_string()));
        }
        if let Some(name) = &params.display {
            query.push(("display", name.clone()));
        }
        if let Some(id) = params.display_group_id {
            query.push(("displayGroupId", id.to_string()));
        }

        let raw = self.client.get("/display", &query).await?;
        if params.tree_view {
            let displays: Vec<Display> = validate(&raw)?;
            Ok(tree_success(raw, &build_display_tree(&displays), None))
        } else {
            Ok(ToolOutcome::ok(raw))
        }
    }
}

#[async_trait]
impl Tool for GetDisplays {
    fn name(&self) -> &str {
        "get_displays"
    }

    fn description(&self) -> &str {
        "List registered displays, optionally grouped by display group as a tree view"
    }

    fn parameters_schema(&self) -> RootSchema {
        schema_for!(GetDisplaysParams)
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
pub struct AuthorizeDisplayParams {
    pub display_id: i64,
}

/// `authorize_display` — toggle a display's authorised flag.
pub struct AuthorizeDisplay {
    client: Arc<CmsClient>,
}

impl AuthorizeDisplay {
    pub fn new(client: Arc<CmsClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for AuthorizeDisplay {
    fn name(&self) -> &str {
        "authorize_display"
    }

    fn description(&self) -> &str {
        "Toggle the authorised state of a display"
    }

    fn parameters_schema(&self) -> RootSchema {
        schema_for!(AuthorizeDisplayParams)
    }

    async fn execute(&self, params: Value) -> ToolOutcome {
        let params: AuthorizeDisplayParams = match parse_params(params) {
            Ok(p) => p,
            Err(outcome) => return outcome,
        };
        let path = format!("/display/authorise/{}", params.display_id);
        match self.client.put_form(&path, &[]).await {
            Ok(raw) => ToolOutcome::ok(raw),
            Err(err) => err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticTokenProvider;
    use crate::config::CmsConfig;
    use serde_json::json;

    fn client() -> Arc<CmsClient> {
        let config = CmsConfig::new("http://localhost:9999");
        Arc::new(CmsClient::new(
            &config,
            Arc::new(StaticTokenProvider::new("t")),
        ))
    }

    fn sample_displays() -> Vec<Display> {
        let raw = json!([
            {
                "displayId": 1,
                "display": "Lobby Left",
                "displayGroups": [{"displayGroupId": 10, "displayGroup": "Lobby"}]
            },
            {
                "displayId": 2,
                "display": "Lobby Right",
                "displayGroups": [{"displayGroupId": 10, "displayGroup": "Lobby"}]
            },
            {"displayId": 3, "display": "Warehouse"}
        ]);
        validate(&raw).unwrap()
    }

    #[test]
    fn groups_by_display_group() {
        let forest = build_display_tree(&sample_displays());
        assert_eq!(forest.len(), 2);
        assert_eq!(forest[0].name, "Lobby");
        assert_eq!(forest[0].kind, NodeKind::DisplayGroup);
        assert_eq!(forest[0].children.len(), 2);
        assert_eq!(forest[1].name, "Ungrouped");
    }

    #[test]
    fn synthetic_group_ids_are_non_positive() {
        let forest = build_display_tree(&sample_displays());
        // Derived negative id for the real group, sentinel 0 for ungrouped.
        assert_eq!(forest[0].id, -10);
        assert_eq!(forest[1].id, 0);
    }

    #[test]
    fn empty_input_builds_empty_forest() {
        assert!(build_display_tree(&[]).is_empty());
    }

    #[tokio::test]
    async fn invalid_params_fail_without_network() {
        let tool = GetDisplays::new(client());
        let out = tool.execute(json!({"displayId": "nope"})).await;
        let v = serde_json::to_value(&out).unwrap();
        assert_eq!(v["success"], false);
        assert!(v["message"].as_str().unwrap().contains("invalid parameters"));
    }
}
