//! Arxiv Paper Lookup
//!
//! Queries the Arxiv export API and extracts entries from its Atom feed.

use async_trait::async_trait;

use super::SearchSource;
use crate::error::{ResearchError, Result};
use crate::snippet::{normalize_whitespace, Snippet};

const DEFAULT_BASE_URL: &str = "http://export.arxiv.org/api/query";

/// Arxiv export API client
pub struct ArxivClient {
    client: reqwest::Client,
    base_url: String,
}

impl Default for ArxivClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ArxivClient {
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

#[async_trait]
impl SearchSource for ArxivClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Snippet>> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("search_query", format!("all:{}", query).as_str()),
                ("start", "0"),
                ("max_results", max_results.to_string().as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResearchError::Api(format!("Arxiv returned HTTP {}", status)));
        }

        let body = response.text().await?;
        parse_feed(&body, max_results)
    }

    fn name(&self) -> &str {
        "arxiv"
    }
}

/// Extract entries from an Atom feed.
///
/// The export API's feed is regular enough that scanning for the handful of
/// tags we need beats pulling in a full XML parser.
fn parse_feed(xml: &str, max_results: usize) -> Result<Vec<Snippet>> {
    if !xml.contains("<feed") {
        return Err(ResearchError::Parse("Not an Atom feed".into()));
    }

    let mut snippets = Vec::new();

    for entry in xml.split("<entry>").skip(1).take(max_results) {
        let title = tag_text(entry, "title")
            .map(normalize_whitespace)
            .unwrap_or_else(|| "Untitled".into());
        let summary = tag_text(entry, "summary")
            .map(normalize_whitespace)
            .unwrap_or_default();
        let url = tag_text(entry, "id").map(|s| s.trim().to_string());

        let mut snippet = Snippet::new(title, summary, "arxiv");
        if let Some(url) = url {
            snippet = snippet.with_url(url);
        }
        snippets.push(snippet);
    }

    Ok(snippets)
}

/// Text between `<tag ...>` and `</tag>` within one entry
fn tag_text<'a>(entry: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{}", tag);
    let close = format!("</{}>", tag);

    let start = entry.find(&open)?;
    let after_open = &entry[start..];
    let content_start = after_open.find('>')? + 1;
    let content = &after_open[content_start..];
    let end = content.find(&close)?;
    Some(&content[..end])
}
