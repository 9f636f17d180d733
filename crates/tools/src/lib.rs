//! The advisor's tools.
//!
//! Two tools, used in order: `query_knowledge` against the local
//! markdown knowledge base first, `web_search` as fallback when the
//! local base has no answer.

pub mod query_knowledge;
pub mod web_search;

pub use query_knowledge::QueryKnowledgeTool;
pub use web_search::WebSearchTool;

use std::sync::Arc;
use strategos_core::{SearchBackend, ToolRegistry};
use strategos_knowledge::KnowledgeBase;

/// Build the registry of advisor tools. `default_search_results` is the
/// web-search result count used when the model omits `num_results`.
pub fn advisor_registry(
    knowledge: Arc<KnowledgeBase>,
    search: Arc<dyn SearchBackend>,
    default_search_results: usize,
) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(QueryKnowledgeTool::new(knowledge)));
    registry.register(Box::new(
        WebSearchTool::new(search).with_default_results(default_search_results),
    ));
    registry
}
