//! Web search tool — the fallback information source.

use std::sync::Arc;

use async_trait::async_trait;
use strategos_core::error::ToolError;
use strategos_core::search::{SearchBackend, SearchOutcome};
use strategos_core::tool::{Tool, ToolResult};

const DEFAULT_RESULTS: usize = 3;
const MAX_RESULTS: usize = 10;

pub struct WebSearchTool {
    backend: Arc<dyn SearchBackend>,
    default_results: usize,
}

impl WebSearchTool {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self {
            backend,
            default_results: DEFAULT_RESULTS,
        }
    }

    /// Override the result count used when the model omits `num_results`.
    pub fn with_default_results(mut self, count: usize) -> Self {
        self.default_results = count.clamp(1, MAX_RESULTS);
        self
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web for EU5 information not in the local knowledge base. Use ONLY when local knowledge is insufficient. Prioritize eu5.paradoxwikis.com results."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query. Format: 'EU5 [topic]' or 'Europa Universalis 5 [nation] strategy wiki'"
                },
                "num_results": {
                    "type": "integer",
                    "description": "Number of results to return",
                    "default": self.default_results
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<ToolResult, ToolError> {
        let query = arguments["query"].as_str().ok_or_else(|| {
            ToolError::InvalidArguments("missing 'query' for web_search".into())
        })?;

        let num_results = match arguments.get("num_results") {
            None | Some(serde_json::Value::Null) => self.default_results,
            Some(v) => v
                .as_u64()
                .ok_or_else(|| {
                    ToolError::InvalidArguments(
                        "'num_results' must be an integer if provided".into(),
                    )
                })?
                .clamp(1, MAX_RESULTS as u64) as usize,
        };

        tracing::debug!(query, num_results, "Running web search tool");

        let outcome = self
            .backend
            .search(query, num_results)
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: "web_search".into(),
                reason: e.to_string(),
            })?;

        let result = match outcome {
            SearchOutcome::Hits(hits) => {
                let mut output = format!("**Source: Web Search** (Query: {query})\n\n");
                for (i, hit) in hits.iter().enumerate() {
                    output.push_str(&format!("{}. **{}**\n", i + 1, hit.title));
                    output.push_str(&format!("   URL: {}\n", hit.url));
                    if !hit.snippet.is_empty() {
                        output.push_str(&format!("   {}\n", hit.snippet));
                    }
                    output.push('\n');
                }
                ToolResult::ok("", output)
            }
            SearchOutcome::Empty => ToolResult::ok("", format!("No results found for: {query}")),
            SearchOutcome::Unavailable(reason) => {
                ToolResult::error("", format!("web search unavailable: {reason}"))
            }
        };
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use strategos_core::{SearchError, SearchHit};

    struct StubSearch {
        outcome: SearchOutcome,
        seen: Mutex<Vec<(String, usize)>>,
    }

    impl StubSearch {
        fn new(outcome: SearchOutcome) -> Self {
            Self {
                outcome,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SearchBackend for StubSearch {
        fn name(&self) -> &str {
            "stub"
        }
        async fn search(
            &self,
            query: &str,
            max_results: usize,
        ) -> Result<SearchOutcome, SearchError> {
            self.seen.lock().unwrap().push((query.into(), max_results));
            Ok(self.outcome.clone())
        }
    }

    #[tokio::test]
    async fn formats_hits_with_titles_and_urls() {
        let backend = Arc::new(StubSearch::new(SearchOutcome::Hits(vec![SearchHit {
            title: "Economy".into(),
            url: "https://eu5.paradoxwikis.com/Economy".into(),
            snippet: "Source: eu5.paradoxwikis.com".into(),
        }])));
        let tool = WebSearchTool::new(backend);

        let result = tool
            .execute(serde_json::json!({"query": "trade capacity"}))
            .await
            .unwrap();
        assert!(result.success);
        assert!(result.output.contains("Web Search"));
        assert!(result.output.contains("1. **Economy**"));
        assert!(result.output.contains("URL: https://eu5.paradoxwikis.com/Economy"));
    }

    #[tokio::test]
    async fn empty_outcome_reports_no_results() {
        let tool = WebSearchTool::new(Arc::new(StubSearch::new(SearchOutcome::Empty)));
        let result = tool
            .execute(serde_json::json!({"query": "obscure topic"}))
            .await
            .unwrap();
        assert!(result.success);
        assert!(result.output.contains("No results found for: obscure topic"));
    }

    #[tokio::test]
    async fn unavailable_outcome_is_error_flagged() {
        let tool = WebSearchTool::new(Arc::new(StubSearch::new(SearchOutcome::Unavailable(
            "no search API key".into(),
        ))));
        let result = tool
            .execute(serde_json::json!({"query": "anything"}))
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.output.contains("no search API key"));
    }

    #[tokio::test]
    async fn num_results_defaults_and_clamps() {
        let backend = Arc::new(StubSearch::new(SearchOutcome::Empty));
        let tool = WebSearchTool::new(Arc::clone(&backend) as Arc<dyn SearchBackend>);

        tool.execute(serde_json::json!({"query": "a"})).await.unwrap();
        tool.execute(serde_json::json!({"query": "b", "num_results": 50}))
            .await
            .unwrap();

        let seen = backend.seen.lock().unwrap();
        assert_eq!(seen[0].1, 3);
        assert_eq!(seen[1].1, 10);
    }

    #[tokio::test]
    async fn configured_default_applies_when_num_results_omitted() {
        let backend = Arc::new(StubSearch::new(SearchOutcome::Empty));
        let tool = WebSearchTool::new(Arc::clone(&backend) as Arc<dyn SearchBackend>)
            .with_default_results(5);

        tool.execute(serde_json::json!({"query": "a"})).await.unwrap();

        let seen = backend.seen.lock().unwrap();
        assert_eq!(seen[0].1, 5);
    }

    #[tokio::test]
    async fn missing_query_is_invalid_arguments() {
        let tool = WebSearchTool::new(Arc::new(StubSearch::new(SearchOutcome::Empty)));
        let err = tool.execute(serde_json::json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
