//! Notification tools: list (with target display groups) and add.

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
pub struct Notification {
    pub notification_id: i64,
    pub subject: String,
    #[serde(default)]
    pub release_dt: Option<String>,
    #[serde(default)]
    pub display_groups: Vec<NotificationTarget>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationTarget {
    pub display_group_id: i64,
    pub display_group: String,
}

pub fn build_notification_tree(notifications: &[Notification]) -> Vec<TreeNode> {
    notifications
        .iter()
        .map(|notification| {
            let targets = notification
                .display_groups
                .iter()
                .map(|target| {
                    TreeNode::new(
                        target.display_group_id,
                        target.display_group.clone(),
                        NodeKind::DisplayGroup,
                    )
                })
                .collect();
            TreeNode::new(
                notification.notification_id,
                notification.subject.clone(),
                NodeKind::Notification,
            )
            .with_children(targets)
        })
        .collect()
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct GetNotificationsParams {
    pub notification_id: Option<i64>,
    /// Filter by subject (CMS substring match).
    pub subject: Option<String>,
    pub tree_view: bool,
}

/// `get_notifications` — list notifications and their target groups.
pub struct GetNotifications {
    client: Arc<CmsClient>,
}

impl GetNotifications {
    pub fn new(client: Arc<CmsClient>) -> Self {
        Self { client }
    }

    async fn run(&self, params: GetNotificationsParams) -> Result<ToolOutcome, ToolError> {
        let mut query: Vec<(&str, String)> = vec![("embed", "displayGroups".to_string())];
        if let Some(id) = params.notification_id {
            query.push(("notificationId", id.to_string()));
        }
        if let Some(subject) = &params.subject {
            query.push(("subject", subject.clone()));
        }

        let raw = self.client.get("/notification", &query).await?;
        if params.tree_view {
            let notifications: Vec<Notification> = validate(&raw)?;
            Ok(tree_success(
                raw,
                &build_notification_tree(&notifications),
                None,
            ))
        } else {
            Ok(ToolOutcome::ok(raw))
        }
    }
}

#[async_trait]
impl Tool for GetNotifications {
    fn name(&self) -> &str {
        "get_notifications"
    }

    fn description(&self) -> &str {
        "List notifications and the display groups they target"
    }

    fn parameters_schema(&self) -> RootSchema {
        schema_for!(GetNotificationsParams)
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
pub struct AddNotificationParams {
    pub subject: String,
    pub body: String,
    /// Comma-separated display group ids to target.
    #[serde(default)]
    pub display_group_ids: Option<String>,
    /// ISO-8601 release date; defaults to immediately.
    #[serde(default)]
    pub release_dt: Option<String>,
}

/// `add_notification` — create a notification.
pub struct AddNotification {
    client: Arc<CmsClient>,
}

impl AddNotification {
    pub fn new(client: Arc<CmsClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for AddNotification {
    fn name(&self) -> &str {
        "add_notification"
    }

    fn description(&self) -> &str {
        "Create a notification, optionally targeted at display groups"
    }

    fn parameters_schema(&self) -> RootSchema {
        schema_for!(AddNotificationParams)
    }

    async fn execute(&self, params: Value) -> ToolOutcome {
        let params: AddNotificationParams = match parse_params(params) {
            Ok(p) => p,
            Err(outcome) => return outcome,
        };
        let mut form: Vec<(&str, String)> = vec![
            ("subject", params.subject.clone()),
            ("body", params.body.clone()),
        ];
        if let Some(ids) = &params.display_group_ids {
            form.push(("displayGroupIds", ids.clone()));
        }
        if let Some(release) = &params.release_dt {
            form.push(("releaseDt", release.clone()));
        }
        match self.client.post_form("/notification", &form).await {
            Ok(raw) => ToolOutcome::ok(raw),
            Err(err) => err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn notification_tree_lists_targets() {
        let raw = json!([{
            "notificationId": 21,
            "subject": "Maintenance window",
            "displayGroups": [
                {"displayGroupId": 10, "displayGroup": "Lobby"},
                {"displayGroupId": 11, "displayGroup": "Cafeteria"}
            ]
        }]);
        let notifications: Vec<Notification> = validate(&raw).unwrap();
        let forest = build_notification_tree(&notifications);
        assert_eq!(forest[0].kind, NodeKind::Notification);
        assert_eq!(forest[0].children.len(), 2);
        assert_eq!(forest[0].children[0].kind, NodeKind::DisplayGroup);
    }

    #[test]
    fn untargeted_notification_is_leaf() {
        let raw = json!([{"notificationId": 22, "subject": "FYI"}]);
        let notifications: Vec<Notification> = validate(&raw).unwrap();
        assert!(build_notification_tree(&notifications)[0].children.is_empty());
    }
}
