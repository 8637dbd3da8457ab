//! Result Snippets
//!
//! The uniform shape every retrieval source returns: a titled fragment of
//! text, optionally linked back to its origin.

use serde::{Deserialize, Serialize};

/// A single search result snippet
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Snippet {
    /// Result title (page name, paper title, ...)
    pub title: String,

    /// Link back to the underlying resource
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Summary text
    pub content: String,

    /// Which source produced this snippet
    pub source: String,
}

impl Snippet {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: None,
            content: content.into(),
            source: source.into(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Cap the content length, respecting char boundaries
    pub fn truncate_content(&mut self, max_chars: usize) {
        if self.content.chars().count() > max_chars {
            self.content = self.content.chars().take(max_chars).collect();
        }
    }
}

/// Collapse runs of whitespace into single spaces.
///
/// Atom summaries and MediaWiki extracts arrive with hard-wrapped lines.
pub(crate) fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
