//! Mock Search Source
//!
//! For testing and demos. Returns canned snippets without touching the
//! network, or fails on demand.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::SearchSource;
use crate::error::{ResearchError, Result};
use crate::snippet::Snippet;

/// Mock source with canned results
pub struct MockSource {
    name: String,
    snippets: Vec<Snippet>,
    fail: bool,
    calls: AtomicUsize,
}

impl MockSource {
    pub fn new(name: impl Into<String>, snippets: Vec<Snippet>) -> Self {
        Self {
            name: name.into(),
            snippets,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// A source that always errors
    pub fn failing(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            snippets: Vec::new(),
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    /// How many times `search` has been invoked
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchSource for MockSource {
    async fn search(&self, _query: &str, max_results: usize) -> Result<Vec<Snippet>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail {
            return Err(ResearchError::Api("mock failure".into()));
        }

        Ok(self.snippets.iter().take(max_results).cloned().collect())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
