//! Search backend abstraction.
//!
//! Web search is a fallback path for questions the local knowledge
//! base cannot answer. Backends distinguish "searched and found
//! nothing" from "could not search at all" so the agent can tell the
//! user which one happened.

use crate::error::SearchError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single ranked search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// What a search attempt produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The backend returned at least one result.
    Hits(Vec<SearchHit>),

    /// The search completed but matched nothing.
    Empty,

    /// The backend could not be used (missing API key, quota, outage).
    /// The reason is shown to the model so it answers from what it
    /// already knows instead of retrying.
    Unavailable(String),
}

#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// The backend's name, for logging and the `doctor` command.
    fn name(&self) -> &str;

    /// Run a query, returning at most `max_results` hits.
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> std::result::Result<SearchOutcome, SearchError>;
}
