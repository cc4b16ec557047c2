//! Playlist tools: list (playlist → widget tree view) and add.

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

use super::layouts::Widget;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub playlist_id: i64,
    pub name: String,
    #[serde(default)]
    pub widgets: Vec<Widget>,
}

pub fn build_playlist_tree(playlists: &[Playlist]) -> Vec<TreeNode> {
    playlists
        .iter()
        .map(|playlist| {
            let widgets = playlist
                .widgets
                .iter()
                .map(|widget| {
                    let name = widget
                        .name
                        .clone()
                        .filter(|n| !n.is_empty())
                        .unwrap_or_else(|| widget.widget_type.clone());
                    let node = TreeNode::new(widget.widget_id, name, NodeKind::Widget);
                    match widget.duration {
                        Some(duration) => node.with_duration(duration),
                        None => node,
                    }
                })
                .collect();
            TreeNode::new(playlist.playlist_id, playlist.name.clone(), NodeKind::Playlist)
                .with_children(widgets)
        })
        .collect()
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct GetPlaylistsParams {
    pub playlist_id: Option<i64>,
    /// Filter by playlist name (CMS substring match).
    pub name: Option<String>,
    pub tree_view: bool,
}

/// `get_playlists` — list playlists with embedded widgets.
pub struct GetPlaylists {
    client: Arc<CmsClient>,
}

impl GetPlaylists {
    pub fn new(client: Arc<CmsClient>) -> Self {
        Self { client }
    }

    async fn run(&self, params: GetPlaylistsParams) -> Result<ToolOutcome, ToolError> {
        let mut query: Vec<(&str, String)> = vec![("embed", "widgets".to_string())];
        if let Some(id) = params.playlist_id {
            query.push(("playlistId", id.to_string()));
        }
        if let Some(name) = &params.name {
            query.push(("name", name.clone()));
        }

        let raw = self.client.get("/playlist", &query).await?;
        if params.tree_view {
            let playlists: Vec<Playlist> = validate(&raw)?;
            Ok(tree_success(raw, &build_playlist_tree(&playlists), None))
        } else {
            Ok(ToolOutcome::ok(raw))
        }
    }
}

#[async_trait]
impl Tool for GetPlaylists {
    fn name(&self) -> &str {
        "get_playlists"
    }

    fn description(&self) -> &str {
        "List playlists with their widgets, optionally as a tree view"
    }

    fn parameters_schema(&self) -> RootSchema {
        schema_for!(GetPlaylistsParams)
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
pub struct AddPlaylistParams {
    pub name: String,
    #[serde(default)]
    pub tags: Option<String>,
}

/// `add_playlist` — create an empty playlist.
pub struct AddPlaylist {
    client: Arc<CmsClient>,
}

impl AddPlaylist {
    pub fn new(client: Arc<CmsClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for AddPlaylist {
    fn name(&self) -> &str {
        "add_playlist"
    }

    fn description(&self) -> &str {
        "Create a new playlist"
    }

    fn parameters_schema(&self) -> RootSchema {
        schema_for!(AddPlaylistParams)
    }

    async fn execute(&self, params: Value) -> ToolOutcome {
        let params: AddPlaylistParams = match parse_params(params) {
            Ok(p) => p,
            Err(outcome) => return outcome,
        };
        let mut form: Vec<(&str, String)> = vec![("name", params.name.clone())];
        if let Some(tags) = &params.tags {
            form.push(("tags", tags.clone()));
        }
        match self.client.post_form("/playlist", &form).await {
            Ok(raw) => ToolOutcome::ok(raw),
            Err(err) => err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{flatten, render_text};
    use serde_json::json;

    fn sample_playlists() -> Vec<Playlist> {
        let raw = json!([{
            "playlistId": 3,
            "name": "Morning Loop",
            "widgets": [
                {"widgetId": 7, "type": "image", "name": "Banner", "duration": 5},
                {"widgetId": 8, "type": "video", "name": "Video", "duration": 10}
            ]
        }]);
        validate(&raw).unwrap()
    }

    #[test]
    fn playlist_tree_shape() {
        let forest = build_playlist_tree(&sample_playlists());
        let flat = flatten(&forest, None);
        assert_eq!(flat.len(), 3);
        assert_eq!(flat[2].path, "Morning Loop > Video");
        assert!(flat[2].is_last);
    }

    #[test]
    fn last_widget_rendered_with_corner_connector() {
        let forest = build_playlist_tree(&sample_playlists());
        let text = render_text(&forest, None);
        assert!(text.contains("├─ widget: Banner (5s)"));
        assert!(text.contains("└─ widget: Video (10s)"));
    }

    #[test]
    fn playlist_without_widgets_is_leaf() {
        let raw = json!([{"playlistId": 4, "name": "Empty"}]);
        let playlists: Vec<Playlist> = validate(&raw).unwrap();
        let forest = build_playlist_tree(&playlists);
        assert!(forest[0].children.is_empty());
    }
}
