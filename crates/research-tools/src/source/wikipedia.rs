//! Wikipedia Lookup
//!
//! Queries the MediaWiki API: one request searches and pulls plain-text
//! intro extracts for the matching pages.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;

use super::SearchSource;
use crate::error::{ResearchError, Result};
use crate::snippet::{normalize_whitespace, Snippet};

const DEFAULT_BASE_URL: &str = "https://en.wikipedia.org/w/api.php";

/// MediaWiki API client
pub struct WikipediaClient {
    client: reqwest::Client,
    base_url: String,
}

impl Default for WikipediaClient {
    fn default() -> Self {
        Self::new()
    }
}

impl WikipediaClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.into(),
        }
    }

    /// Override the endpoint (for tests against a local server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    query: Option<QueryBody>,
}

#[derive(Deserialize)]
struct QueryBody {
    #[serde(default)]
    pages: HashMap<String, Page>,
}

#[derive(Deserialize)]
struct Page {
    title: String,
    #[serde(default)]
    extract: Option<String>,
    /// Search rank; pages arrive keyed by id, not ordered
    #[serde(default)]
    index: Option<i64>,
}

#[async_trait]
impl SearchSource for WikipediaClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Snippet>> {
        let limit = max_results.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("action", "query"),
                ("generator", "search"),
                ("gsrsearch", query),
                ("gsrlimit", limit.as_str()),
                ("prop", "extracts"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("format", "json"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResearchError::Api(format!(
                "Wikipedia returned HTTP {}",
                status
            )));
        }

        let body: QueryResponse = response.json().await?;
        Ok(collect_snippets(body, max_results))
    }

    fn name(&self) -> &str {
        "wikipedia"
    }
}

fn collect_snippets(body: QueryResponse, max_results: usize) -> Vec<Snippet> {
    let Some(query) = body.query else {
        return Vec::new();
    };

    let mut pages: Vec<Page> = query.pages.into_values().collect();
    pages.sort_by_key(|p| p.index.unwrap_or(i64::MAX));
    pages.truncate(max_results);

    pages
        .into_iter()
        .map(|page| {
            let url = format!(
                "https://en.wikipedia.org/wiki/{}",
                page.title.replace(' ', "_")
            );
            let content = normalize_whitespace(&page.extract.unwrap_or_default());
            Snippet::new(page.title, content, "wikipedia").with_url(url)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RESPONSE: &str = r#"{
        "batchcomplete": "",
        "query": {
            "pages": {
                "9891": {
                    "pageid": 9891,
                    "ns": 0,
                    "title": "Entropy",
                    "index": 1,
                    "extract": "Entropy is a scientific concept\nassociated with disorder."
                },
                "1234": {
                    "pageid": 1234,
                    "ns": 0,
                    "title": "Entropy (information theory)",
                    "index": 2,
                    "extract": "In information theory, entropy quantifies uncertainty."
                }
            }
        }
    }"#;

    #[test]
    fn test_collect_snippets_ordered_by_rank() {
        let body: QueryResponse = serde_json::from_str(SAMPLE_RESPONSE).unwrap();
        let snippets = collect_snippets(body, 10);

        assert_eq!(snippets.len(), 2);
        assert_eq!(snippets[0].title, "Entropy");
        assert_eq!(
            snippets[0].content,
            "Entropy is a scientific concept associated with disorder."
        );
        assert_eq!(
            snippets[0].url.as_deref(),
            Some("https://en.wikipedia.org/wiki/Entropy")
        );
    }

    #[test]
    fn test_collect_snippets_caps_results() {
        let body: QueryResponse = serde_json::from_str(SAMPLE_RESPONSE).unwrap();
        assert_eq!(collect_snippets(body, 1).len(), 1);
    }

    #[test]
    fn test_no_results() {
        let body: QueryResponse = serde_json::from_str(r#"{"batchcomplete": ""}"#).unwrap();
        assert!(collect_snippets(body, 5).is_empty());
    }
}
