//! The success/failure envelope every tool returns.
//!
//! Agents branch on the `success` discriminant; `data` exists only on the
//! success shape, `message`/`error`/`errorData` only on the failure shape.
//! `execute` never returns `Err` — every `ToolError` is folded into the
//! failure variant here.

use serde::Serialize;
use serde_json::{json, Value};

use crate::error::ToolError;
use crate::tree::FlatTreeNode;

/// Tagged result of a tool invocation.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ToolOutcome {
    Success {
        success: bool,
        data: Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        tree: Option<Vec<FlatTreeNode>>,
        #[serde(rename = "treeViewText", skip_serializing_if = "Option::is_none")]
        tree_view_text: Option<String>,
    },
    Failure {
        success: bool,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<Value>,
        #[serde(rename = "errorData", skip_serializing_if = "Option::is_none")]
        error_data: Option<Value>,
    },
}

impl ToolOutcome {
    /// Plain success envelope around the raw response data.
    pub fn ok(data: Value) -> Self {
        ToolOutcome::Success {
            success: true,
            data,
            tree: None,
            tree_view_text: None,
        }
    }

    /// Success envelope carrying a flattened tree and its text rendering.
    pub fn ok_with_tree(data: Value, tree: Vec<FlatTreeNode>, tree_view_text: String) -> Self {
        ToolOutcome::Success {
            success: true,
            data,
            tree: Some(tree),
            tree_view_text: Some(tree_view_text),
        }
    }

    /// Failure envelope with a message only.
    pub fn fail(message: impl Into<String>) -> Self {
        ToolOutcome::Failure {
            success: false,
            message: message.into(),
            error: None,
            error_data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ToolOutcome::Success { .. })
    }
}

impl From<ToolError> for ToolOutcome {
    fn from(err: ToolError) -> Self {
        let error = json!({ "name": err.name(), "message": err.to_string() });
        let error_data = match &err {
            ToolError::Api { body, .. } => body.clone(),
            ToolError::Validation { value, .. } => value.clone(),
            _ => None,
        };
        ToolOutcome::Failure {
            success: false,
            message: err.to_string(),
            error: Some(error),
            error_data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_shape() {
        let out = ToolOutcome::ok(json!([{"displayId": 1}]));
        let v = serde_json::to_value(&out).unwrap();
        assert_eq!(v["success"], true);
        assert_eq!(v["data"][0]["displayId"], 1);
        assert!(v.get("message").is_none());
        assert!(v.get("tree").is_none());
    }

    #[test]
    fn failure_shape() {
        let out = ToolOutcome::fail("boom");
        let v = serde_json::to_value(&out).unwrap();
        assert_eq!(v["success"], false);
        assert_eq!(v["message"], "boom");
        assert!(v.get("data").is_none());
    }

    #[test]
    fn api_error_carries_error_data() {
        let err = ToolError::Api {
            status: 404,
            message: "Not Found".into(),
            body: Some(json!({"message": "Not Found"})),
        };
        let out = ToolOutcome::from(err);
        let v = serde_json::to_value(&out).unwrap();
        assert_eq!(v["success"], false);
        assert!(v["message"].as_str().unwrap().contains("404"));
        assert_eq!(v["errorData"]["message"], "Not Found");
        assert_eq!(v["error"]["name"], "ApiError");
    }

    #[test]
    fn validation_error_carries_offending_value() {
        let err = ToolError::Validation {
            message: "missing field `userId`".into(),
            value: Some(json!({"userName": "admin"})),
        };
        let out = ToolOutcome::from(err);
        let v = serde_json::to_value(&out).unwrap();
        assert!(v["message"].as_str().unwrap().contains("validation failed"));
        assert_eq!(v["errorData"]["userName"], "admin");
    }
}
