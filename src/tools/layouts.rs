//! Layout tools: list (layout → region → playlist → widget tree view),
//! publish, checkout.

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

/// Wire mirror of a layout with embedded regions.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub layout_id: i64,
    pub layout: String,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub regions: Vec<Region>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub region_id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub region_playlist: Option<RegionPlaylist>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionPlaylist {
    pub playlist_id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub widgets: Vec<Widget>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub widget_id: i64,
    #[serde(rename = "type")]
    pub widget_type: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
}

/// Map layouts into the layout → region → playlist → widget forest.
/// Missing nested collections produce no child node.
pub fn build_layout_tree(layouts: &[Layout]) -> Vec<TreeNode> {
    layouts
        .iter()
        .map(|layout| {
            let regions = layout
                .regions
                .iter()
                .map(|region| {
                    let name = region
                        .name
                        .clone()
                        .filter(|n| !n.is_empty())
                        .unwrap_or_else(|| format!("Region {}", region.region_id));
                    let children = region
                        .region_playlist
                        .as_ref()
                        .map(|playlist| vec![playlist_node(playlist)])
                        .unwrap_or_default();
                    TreeNode::new(region.region_id, name, NodeKind::Region)
                        .with_children(children)
                })
                .collect();
            TreeNode::new(layout.layout_id, layout.layout.clone(), NodeKind::Layout)
                .with_children(regions)
        })
        .collect()
}

fn playlist_node(playlist: &RegionPlaylist) -> TreeNode {
    let name = playlist
        .name
        .clone()
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| format!("Playlist {}", playlist.playlist_id));
    let widgets = playlist.widgets.iter().map(widget_node).collect();
    TreeNode::new(playlist.playlist_id, name, NodeKind::Playlist).with_children(widgets)
}

fn widget_node(widget: &Widget) -> TreeNode {
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
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct GetLayoutsParams {
    /// Filter by layout id.
    pub layout_id: Option<i64>,
    /// Filter by layout name (CMS substring match).
    pub layout: Option<String>,
    /// Comma-separated tag filter.
    pub tags: Option<String>,
    /// Attach `tree` and `treeViewText` to the response.
    pub tree_view: bool,
}

/// `get_layouts` — list layouts with embedded regions and widgets.
pub struct GetLayouts {
    client: Arc<CmsClient>,
}

impl GetLayouts {
    pub fn new(client: Arc<CmsClient>) -> Self {
        Self { client }
    }

    async fn run(&self, params: GetLayoutsParams) -> Result<ToolOutcome, ToolError> {
        let mut query: Vec<(&str, String)> =
            vec![("embed", "regions,playlists,widgets".to_string())];
        if let Some(id) = params.layout_id {
            query.push(("layoutId", id.to_string()));
        }
        if let Some(name) = &params.layout {
            query.push(("layout", name.clone()));
        }
        if let Some(tags) = &params.tags {
            query.push(("tags", tags.clone()));
        }

        let raw = self.client.get("/layout", &query).await?;
        if params.tree_view {
            let layouts: Vec<Layout> = validate(&raw)?;
            Ok(tree_success(raw, &build_layout_tree(&layouts), None))
        } else {
            Ok(ToolOutcome::ok(raw))
        }
    }
}

#[async_trait]
impl Tool for GetLayouts {
    fn name(&self) -> &str {
        "get_layouts"
    }

    fn description(&self) -> &str {
        "List CMS layouts with their regions, playlists and widgets; \
         optionally rendered as a tree view"
    }

    fn parameters_schema(&self) -> RootSchema {
        schema_for!(GetLayoutsParams)
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
pub struct PublishLayoutParams {
    pub layout_id: i64,
}

/// `publish_layout` — publish the draft of a layout.
pub struct PublishLayout {
    client: Arc<CmsClient>,
}

impl PublishLayout {
    pub fn new(client: Arc<CmsClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for PublishLayout {
    fn name(&self) -> &str {
        "publish_layout"
    }

    fn description(&self) -> &str {
        "Publish the draft version of a layout"
    }

    fn parameters_schema(&self) -> RootSchema {
        schema_for!(PublishLayoutParams)
    }

    async fn execute(&self, params: Value) -> ToolOutcome {
        let params: PublishLayoutParams = match parse_params(params) {
            Ok(p) => p,
            Err(outcome) => return outcome,
        };
        let path = format!("/layout/publish/{}", params.layout_id);
        match self
            .client
            .put_form(&path, &[("publishNow", "1".to_string())])
            .await
        {
            Ok(raw) => ToolOutcome::ok(raw),
            Err(err) => err.into(),
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutLayoutParams {
    pub layout_id: i64,
}

/// `checkout_layout` — create an editable draft of a published layout.
pub struct CheckoutLayout {
    client: Arc<CmsClient>,
}

impl CheckoutLayout {
    pub fn new(client: Arc<CmsClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for CheckoutLayout {
    fn name(&self) -> &str {
        "checkout_layout"
    }

    fn description(&self) -> &str {
        "Check out a layout, creating a draft for editing"
    }

    fn parameters_schema(&self) -> RootSchema {
        schema_for!(CheckoutLayoutParams)
    }

    async fn execute(&self, params: Value) -> ToolOutcome {
        let params: CheckoutLayoutParams = match parse_params(params) {
            Ok(p) => p,
            Err(outcome) => return outcome,
        };
        let path = format!("/layout/checkout/{}", params.layout_id);
        match self.client.put_form(&path, &[]).await {
            Ok(raw) => ToolOutcome::ok(raw),
            Err(err) => err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::render_text;
    use serde_json::json;

    fn sample_layouts() -> Vec<Layout> {
        let raw = json!([{
            "layoutId": 12,
            "layout": "Welcome Screen",
            "duration": 60,
            "regions": [{
                "regionId": 31,
                "name": "Main",
                "regionPlaylist": {
                    "playlistId": 44,
                    "name": null,
                    "widgets": [
                        {"widgetId": 91, "type": "video", "name": "Video", "duration": 10},
                        {"widgetId": 92, "type": "clock", "name": null, "duration": null}
                    ]
                }
            }]
        }]);
        validate(&raw).unwrap()
    }

    #[test]
    fn builds_full_hierarchy() {
        let forest = build_layout_tree(&sample_layouts());
        assert_eq!(forest.len(), 1);
        let layout = &forest[0];
        assert_eq!(layout.kind, NodeKind::Layout);
        assert_eq!(layout.name, "Welcome Screen");
        let region = &layout.children[0];
        assert_eq!(region.name, "Main");
        let playlist = &region.children[0];
        // Unnamed playlists fall back to an id-derived label.
        assert_eq!(playlist.name, "Playlist 44");
        assert_eq!(playlist.children.len(), 2);
    }

    #[test]
    fn widget_duration_flows_into_rendering() {
        let forest = build_layout_tree(&sample_layouts());
        let text = render_text(&forest, None);
        assert!(text.contains("Video (10s)"));
        // Unnamed widgets fall back to the widget type, no duration suffix.
        assert!(text.contains("widget: clock"));
        assert!(!text.contains("clock ("));
    }

    #[test]
    fn missing_regions_produce_leaf_layout() {
        let raw = json!([{"layoutId": 5, "layout": "Bare"}]);
        let layouts: Vec<Layout> = validate(&raw).unwrap();
        let forest = build_layout_tree(&layouts);
        assert!(forest[0].children.is_empty());
    }

    #[test]
    fn region_without_playlist_is_leaf() {
        let raw = json!([{
            "layoutId": 5,
            "layout": "Half",
            "regions": [{"regionId": 9, "name": "Empty"}]
        }]);
        let layouts: Vec<Layout> = validate(&raw).unwrap();
        let forest = build_layout_tree(&layouts);
        assert!(forest[0].children[0].children.is_empty());
    }

    #[test]
    fn params_schema_lists_filters() {
        let schema = serde_json::to_value(schema_for!(GetLayoutsParams)).unwrap();
        let props = &schema["properties"];
        assert!(props.get("layoutId").is_some());
        assert!(props.get("treeView").is_some());
    }
}
