//! Tavily Web Search
//!
//! Hosted web search API. The credential is loaded once at startup from the
//! environment and travels in the request body, per Tavily's API contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::SearchSource;
use crate::error::{ResearchError, Result};
use crate::snippet::Snippet;

const DEFAULT_BASE_URL: &str = "https://api.tavily.com";

/// Tavily search client
pub struct TavilyClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl TavilyClient {
    /// Create a new client with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.into(),
        }
    }

    /// Override the endpoint (for tests against a local server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Deserialize)]
struct SearchResult {
    title: String,
    url: String,
    content: String,
}

#[async_trait]
impl SearchSource for TavilyClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Snippet>> {
        let request = SearchRequest {
            api_key: &self.api_key,
            query,
            max_results,
        };

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ResearchError::Credential("Tavily".into()));
        }
        if !status.is_success() {
            return Err(ResearchError::Api(format!(
                "Tavily returned HTTP {}",
                status
            )));
        }

        let body: SearchResponse = response.json().await?;

        Ok(body
            .results
            .into_iter()
            .map(|r| Snippet::new(r.title, r.content, "tavily").with_url(r.url))
            .collect())
    }

    fn name(&self) -> &str {
        "tavily"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_deserialization() {
        let json = r#"{
            "query": "rust language",
            "results": [
                {"title": "Rust", "url": "https://rust-lang.org", "content": "A systems language.", "score": 0.98}
            ],
            "response_time": 0.4
        }"#;

        let body: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.results.len(), 1);
        assert_eq!(body.results[0].title, "Rust");
    }

    #[test]
    fn test_empty_results_default() {
        let body: SearchResponse = serde_json::from_str(r#"{"query": "x"}"#).unwrap();
        assert!(body.results.is_empty());
    }
}
