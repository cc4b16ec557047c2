//! Read access to the image-generation history store.
//!
//! The generation calls themselves live outside this crate; agents use
//! this tool to inspect what a generator has produced so far.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::schema::RootSchema;
use schemars::{schema_for, JsonSchema};
use serde::Deserialize;
use serde_json::Value;

use crate::history::HistoryStore;
use crate::outcome::ToolOutcome;
use crate::tools::{parse_params, Tool};

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetGenerationHistoryParams {
    /// Generator id whose records to fetch.
    pub generator_id: String,
}

/// `get_generation_history` — ordered records for one generator id.
pub struct GetGenerationHistory {
    store: Arc<HistoryStore>,
}

impl GetGenerationHistory {
    pub fn new(store: Arc<HistoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for GetGenerationHistory {
    fn name(&self) -> &str {
        "get_generation_history"
    }

    fn description(&self) -> &str {
        "Read the generated-image history for one generator id"
    }

    fn parameters_schema(&self) -> RootSchema {
        schema_for!(GetGenerationHistoryParams)
    }

    async fn execute(&self, params: Value) -> ToolOutcome {
        let params: GetGenerationHistoryParams = match parse_params(params) {
            Ok(p) => p,
            Err(outcome) => return outcome,
        };
        match self.store.get(&params.generator_id) {
            Ok(records) => match serde_json::to_value(records) {
                Ok(data) => ToolOutcome::ok(data),
                Err(err) => crate::error::ToolError::from(err).into(),
            },
            Err(err) => err.into(),
        }
    }
}
