//! Web search for wiki and strategy content.
//!
//! Queries are scoped to the game before they leave the process, and
//! official-wiki results are ranked ahead of everything else. The HTTP
//! backend talks to a Tavily-compatible endpoint; a caching wrapper
//! sits in front of any backend.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use strategos_core::{LruCache, SearchBackend, SearchError, SearchHit, SearchOutcome};

/// The wiki domain promoted to the front of every result list.
const WIKI_DOMAIN: &str = "eu5.paradoxwikis.com";

/// Prefix a query with game context unless it already has it.
pub fn scope_query(query: &str) -> String {
    let lower = query.to_lowercase();
    if lower.contains("eu5") || lower.contains("europa universalis") {
        query.to_string()
    } else {
        format!("EU5 {query}")
    }
}

/// Stable partition: official-wiki hits first, everything else after,
/// truncated to `max_results`.
pub fn prioritize(hits: Vec<SearchHit>, max_results: usize) -> Vec<SearchHit> {
    let (wiki, other): (Vec<_>, Vec<_>) = hits
        .into_iter()
        .partition(|hit| hit.url.contains(WIKI_DOMAIN));
    wiki.into_iter()
        .chain(other)
        .take(max_results)
        .collect()
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    results: Vec<ApiResult>,
}

#[derive(Debug, Deserialize)]
struct ApiResult {
    #[serde(default)]
    title: String,
    url: String,
    #[serde(default)]
    content: String,
}

/// Search backend over a Tavily-compatible HTTP API.
///
/// Constructed without an API key it still satisfies the trait: every
/// query comes back [`SearchOutcome::Unavailable`] with a reason, and
/// the agent answers from the knowledge base alone.
pub struct HttpSearchClient {
    endpoint: String,
    api_key: Option<String>,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpSearchClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| SearchError::Network(e.to_string()))?;
        Ok(Self {
            endpoint: endpoint.into(),
            api_key,
            timeout_secs,
            client,
        })
    }
}

#[async_trait]
impl SearchBackend for HttpSearchClient {
    fn name(&self) -> &str {
        "tavily"
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<SearchOutcome, SearchError> {
        let Some(api_key) = &self.api_key else {
            return Ok(SearchOutcome::Unavailable(
                "web search is not configured (no search API key)".into(),
            ));
        };

        let scoped = scope_query(query);
        tracing::debug!(query = %scoped, max_results, "Running web search");

        // Over-fetch so wiki prioritization has something to reorder.
        let body = serde_json::json!({
            "api_key": api_key,
            "query": scoped,
            "max_results": max_results * 2,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout {
                        timeout_secs: self.timeout_secs,
                    }
                } else {
                    SearchError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status != 200 {
            let text = response.text().await.unwrap_or_default();
            return Err(SearchError::ApiError {
                status_code: status,
                message: text,
            });
        }

        let parsed: ApiResponse = response.json().await.map_err(|e| SearchError::ApiError {
            status_code: 200,
            message: format!("Failed to parse response: {e}"),
        })?;

        let hits: Vec<SearchHit> = parsed
            .results
            .into_iter()
            .map(|r| SearchHit {
                title: if r.title.is_empty() {
                    r.url.clone()
                } else {
                    r.title
                },
                url: r.url,
                snippet: r.content,
            })
            .collect();

        if hits.is_empty() {
            return Ok(SearchOutcome::Empty);
        }
        Ok(SearchOutcome::Hits(prioritize(hits, max_results)))
    }
}

/// Read-through caching wrapper around any [`SearchBackend`].
///
/// Completed searches (hits or empty) are cached; `Unavailable` and
/// errors are not, so search recovers as soon as the backend does.
pub struct CachedSearch<B> {
    backend: B,
    cache: Arc<LruCache<SearchOutcome>>,
}

impl<B: SearchBackend> CachedSearch<B> {
    pub fn new(backend: B, cache: Arc<LruCache<SearchOutcome>>) -> Self {
        Self { backend, cache }
    }
}

#[async_trait]
impl<B: SearchBackend> SearchBackend for CachedSearch<B> {
    fn name(&self) -> &str {
        self.backend.name()
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<SearchOutcome, SearchError> {
        // Key on the scoped form so "trade nodes" and "EU5 trade nodes"
        // share one entry.
        let key = format!("search:{}:{max_results}", scope_query(query));
        if let Some(outcome) = self.cache.get(&key) {
            tracing::debug!(query = %query, "Search cache hit");
            return Ok(outcome);
        }

        let outcome = self.backend.search(query, max_results).await?;
        match &outcome {
            SearchOutcome::Unavailable(_) => {}
            _ => self.cache.put(key, outcome.clone()),
        }
        Ok(outcome)
    }
}
