//! Knowledge base query tool.
//!
//! The model's primary information source. Lookup misses come back as
//! readable guidance (valid categories, valid subcategories) so the
//! model can retry or fall back to web search.

use std::sync::Arc;

use async_trait::async_trait;
use strategos_core::error::ToolError;
use strategos_core::tool::{Tool, ToolResult};
use strategos_knowledge::{KnowledgeAnswer, KnowledgeBase};

pub struct QueryKnowledgeTool {
    knowledge: Arc<KnowledgeBase>,
}

impl QueryKnowledgeTool {
    pub fn new(knowledge: Arc<KnowledgeBase>) -> Self {
        Self { knowledge }
    }
}

#[async_trait]
impl Tool for QueryKnowledgeTool {
    fn name(&self) -> &str {
        "query_knowledge"
    }

    fn description(&self) -> &str {
        "Query the EU5 strategy knowledge base for game mechanics, strategies, and nation guides. ALWAYS TRY THIS FIRST before web search."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "category": {
                    "type": "string",
                    "enum": ["mechanics", "strategy", "nations", "resources"],
                    "description": "The knowledge category to query"
                },
                "subcategory": {
                    "type": "string",
                    "description": "Specific topic within the category. For mechanics: economy, government, production, society, diplomacy, military, warfare, geopolitics, advances. For strategy: beginner_route, common_mistakes. For nations: england. For resources: all. Leave empty to see available options."
                }
            },
            "required": ["category"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<ToolResult, ToolError> {
        let category = arguments["category"].as_str().ok_or_else(|| {
            ToolError::InvalidArguments("missing 'category' for query_knowledge".into())
        })?;

        let subcategory = match arguments.get("subcategory") {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(s)) => Some(s.as_str()),
            Some(_) => {
                return Err(ToolError::InvalidArguments(
                    "'subcategory' must be a string if provided".into(),
                ));
            }
        };

        tracing::debug!(category, subcategory, "Querying knowledge base");

        let answer = self
            .knowledge
            .lookup(category, subcategory)
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: "query_knowledge".into(),
                reason: e.to_string(),
            })?;

        let result = match answer {
            KnowledgeAnswer::Found { text, source } => ToolResult::ok(
                "",
                format!("**Source: Local Knowledge Base ({source})**\n\n{text}"),
            ),
            KnowledgeAnswer::Listing { category, available } => ToolResult::ok(
                "",
                format!(
                    "Please specify a subcategory. Available in '{}': {}",
                    category,
                    available.join(", ")
                ),
            ),
            KnowledgeAnswer::NotFound { message } => ToolResult::error("", message),
        };
        Ok(result)
    }
}
