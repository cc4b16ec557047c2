//! Agent toolset for the Xibo digital-signage CMS REST API.
//!
//! Each tool wraps one CMS operation: validate parameters, call the HTTP
//! API, validate/transform the JSON response, and hand back a tagged
//! success/failure envelope for an LLM-driven agent to branch on. List
//! tools can additionally render their nested payloads as labeled trees
//! (flattened with depth/path metadata, plus a box-drawing text diagram).
//!
//! ```no_run
//! use std::sync::Arc;
//! use xibo_tools::auth::StaticTokenProvider;
//! use xibo_tools::client::CmsClient;
//! use xibo_tools::config::CmsConfig;
//! use xibo_tools::history::HistoryStore;
//! use xibo_tools::tools::ToolRegistry;
//!
//! # async fn run() -> Result<(), xibo_tools::error::ToolError> {
//! let config = CmsConfig::from_env()?;
//! let auth = Arc::new(StaticTokenProvider::new("token"));
//! let client = Arc::new(CmsClient::new(&config, auth));
//! let history = Arc::new(HistoryStore::new("generation-history.json"));
//!
//! let registry = ToolRegistry::with_defaults(client, history);
//! let outcome = registry
//!     .dispatch("get_layouts", serde_json::json!({"treeView": true}))
//!     .await;
//! assert!(serde_json::to_value(&outcome).is_ok());
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod history;
pub mod outcome;
pub mod tools;
pub mod tree;

pub use error::ToolError;
pub use outcome::ToolOutcome;
pub use tools::{Tool, ToolDefinition, ToolRegistry};
pub use tree::{FlatTreeNode, NodeKind, TreeNode};
