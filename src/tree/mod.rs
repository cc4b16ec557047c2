//! Generic labeled trees for CMS list responses.
//!
//! Per-endpoint builders map a nested API payload (layout → region →
//! playlist → widget, user → groups, ...) into a `TreeNode` forest; this
//! module flattens the forest with depth/path metadata and renders it as
//! an indented box-drawing diagram.
//!
//! Cycles cannot occur: each node owns its `children` vector outright, so
//! a finite forest is guaranteed by construction.

use serde::Serialize;
use serde_json::Value;

use crate::outcome::ToolOutcome;

/// Entity tag for a tree node, used for label dispatch.
///
/// Serializes as the lowercase wire field `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Layout,
    Region,
    Playlist,
    Widget,
    Display,
    DisplayGroup,
    User,
    UserGroup,
    Notification,
    Command,
    Media,
    Tag,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Layout => "layout",
            NodeKind::Region => "region",
            NodeKind::Playlist => "playlist",
            NodeKind::Widget => "widget",
            NodeKind::Display => "display",
            NodeKind::DisplayGroup => "displaygroup",
            NodeKind::User => "user",
            NodeKind::UserGroup => "usergroup",
            NodeKind::Notification => "notification",
            NodeKind::Command => "command",
            NodeKind::Media => "media",
            NodeKind::Tag => "tag",
        }
    }
}

/// A display node. `id` may be `0` or a derived negative number for
/// synthetic grouping nodes; insertion order of `children` is display order.
#[derive(Debug, Clone, Serialize)]
pub struct TreeNode {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(id: i64, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            duration: None,
            children: Vec::new(),
        }
    }

    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds);
        self
    }

    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }

    /// Node count of this subtree, including the node itself.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::count).sum::<usize>()
    }
}

/// Read-only projection of a node produced by the pre-order walk.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatTreeNode {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub depth: usize,
    pub is_last: bool,
    pub path: String,
}

/// Caller-supplied node label function.
pub type NodeFormatter<'a> = &'a dyn Fn(&TreeNode) -> String;

/// Default rendering label: `"{type}: {name}"`, with `" ({duration}s)"`
/// appended for widgets that carry a duration.
pub fn default_label(node: &TreeNode) -> String {
    match (node.kind, node.duration) {
        (NodeKind::Widget, Some(duration)) => {
            format!("{}: {} ({}s)", node.kind.as_str(), node.name, duration)
        }
        (kind, _) => format!("{}: {}", kind.as_str(), node.name),
    }
}

/// Flatten a forest pre-order. The optional formatter controls the labels
/// used for `path` breadcrumbs; it defaults to the node name.
pub fn flatten(forest: &[TreeNode], label: Option<NodeFormatter<'_>>) -> Vec<FlatTreeNode> {
    let mut out = Vec::new();
    flatten_into(forest, 0, "", label, &mut out);
    out
}

fn flatten_into(
    siblings: &[TreeNode],
    depth: usize,
    parent_path: &str,
    label: Option<NodeFormatter<'_>>,
    out: &mut Vec<FlatTreeNode>,
) {
    for (i, node) in siblings.iter().enumerate() {
        let text = match label {
            Some(f) => f(node),
            None => node.name.clone(),
        };
        let path = if parent_path.is_empty() {
            text
        } else {
            format!("{parent_path} > {text}")
        };
        out.push(FlatTreeNode {
            id: node.id,
            name: node.name.clone(),
            kind: node.kind,
            depth,
            is_last: i + 1 == siblings.len(),
            path: path.clone(),
        });
        flatten_into(&node.children, depth + 1, &path, label, out);
    }
}

/// Render a forest as an indented text diagram, one newline-terminated
/// line per node. An empty forest renders the empty string.
pub fn render_text(forest: &[TreeNode], label: Option<NodeFormatter<'_>>) -> String {
    let mut out = String::new();
    render_into(forest, "", label, &mut out);
    out
}

fn render_into(
    siblings: &[TreeNode],
    prefix: &str,
    label: Option<NodeFormatter<'_>>,
    out: &mut String,
) {
    for (i, node) in siblings.iter().enumerate() {
        let last = i + 1 == siblings.len();
        let text = match label {
            Some(f) => f(node),
            None => default_label(node),
        };
        out.push_str(prefix);
        out.push_str(if last { "└─ " } else { "├─ " });
        out.push_str(&text);
        out.push('\n');
        let continuation = if last { "   " } else { "│  " };
        render_into(&node.children, &format!("{prefix}{continuation}"), label, out);
    }
}

/// Assemble the standard tree-view success envelope: raw data plus the
/// flattened forest and its rendering wrapped in a fenced code block.
pub fn tree_success(
    data: Value,
    forest: &[TreeNode],
    label: Option<NodeFormatter<'_>>,
) -> ToolOutcome {
    let flat = flatten(forest, label);
    let text = format!("```\n{}```", render_text(forest, label));
    ToolOutcome::ok_with_tree(data, flat, text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_forest() -> Vec<TreeNode> {
        vec![TreeNode::new(1, "A", NodeKind::Layout).with_children(vec![
            TreeNode::new(2, "B", NodeKind::Region),
            TreeNode::new(3, "C", NodeKind::Region),
        ])]
    }

    #[test]
    fn flatten_matches_preorder_and_count() {
        let forest = sample_forest();
        let total: usize = forest.iter().map(TreeNode::count).sum();
        let flat = flatten(&forest, None);
        assert_eq!(flat.len(), total);
        let names: Vec<&str> = flat.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);
        let depths: Vec<usize> = flat.iter().map(|n| n.depth).collect();
        assert_eq!(depths, vec![0, 1, 1]);
    }

    #[test]
    fn is_last_reflects_sibling_position() {
        let flat = flatten(&sample_forest(), None);
        // A is the only root, B has a following sibling, C is last.
        assert!(flat[0].is_last);
        assert!(!flat[1].is_last);
        assert!(flat[2].is_last);
    }

    #[test]
    fn path_joins_ancestor_labels() {
        let flat = flatten(&sample_forest(), None);
        assert_eq!(flat[0].path, "A");
        assert_eq!(flat[1].path, "A > B");
        assert_eq!(flat[2].path, "A > C");
    }

    #[test]
    fn path_uses_custom_formatter() {
        let forest = sample_forest();
        let lower = |n: &TreeNode| n.name.to_lowercase();
        let label: NodeFormatter<'_> = &lower;
        let flat = flatten(&forest, Some(label));
        assert_eq!(flat[2].path, "a > c");
    }

    #[test]
    fn render_empty_forest_is_empty_string() {
        assert_eq!(render_text(&[], None), "");
    }

    #[test]
    fn render_sibling_connectors() {
        let text = render_text(&sample_forest(), None);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "└─ layout: A");
        assert_eq!(lines[1], "   ├─ region: B");
        assert_eq!(lines[2], "   └─ region: C");
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn render_continuation_bars() {
        let forest = vec![
            TreeNode::new(1, "First", NodeKind::Layout)
                .with_children(vec![TreeNode::new(2, "Inner", NodeKind::Region)]),
            TreeNode::new(3, "Second", NodeKind::Layout),
        ];
        let text = render_text(&forest, None);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "├─ layout: First");
        assert_eq!(lines[1], "│  └─ region: Inner");
        assert_eq!(lines[2], "└─ layout: Second");
    }

    #[test]
    fn widget_duration_label() {
        let forest = vec![TreeNode::new(1, "Root", NodeKind::Playlist).with_children(vec![
            TreeNode::new(2, "Video", NodeKind::Widget).with_duration(10.0),
        ])];
        let text = render_text(&forest, None);
        let widget_line = text.lines().nth(1).unwrap();
        assert!(widget_line.ends_with("Video (10s)"));
        assert!(widget_line.contains("└─ "));
    }

    #[test]
    fn widget_without_duration_has_plain_label() {
        let node = TreeNode::new(1, "Clock", NodeKind::Widget);
        assert_eq!(default_label(&node), "widget: Clock");
    }

    #[test]
    fn tree_success_envelope() {
        let forest = sample_forest();
        let out = tree_success(json!([{"layoutId": 1}]), &forest, None);
        let v = serde_json::to_value(&out).unwrap();
        assert_eq!(v["success"], true);
        assert_eq!(v["tree"].as_array().unwrap().len(), 3);
        assert_eq!(v["tree"][1]["isLast"], false);
        assert_eq!(v["tree"][1]["type"], "region");
        let text = v["treeViewText"].as_str().unwrap();
        assert!(text.starts_with("```\n"));
        assert!(text.ends_with("```"));
    }

    #[test]
    fn node_serializes_kind_as_type() {
        let node = TreeNode::new(7, "Lobby", NodeKind::DisplayGroup);
        let v = serde_json::to_value(&node).unwrap();
        assert_eq!(v["type"], "displaygroup");
        assert!(v.get("children").is_none());
        assert!(v.get("duration").is_none());
    }
}
