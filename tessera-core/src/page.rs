//! The upstream page envelope.

use serde::{Deserialize, Serialize};

/// One raw page as returned by the upstream API.
///
/// Every response body carries a `results` array plus an optional
/// continuation cursor; anything else in the envelope is ignored. Rows stay
/// untyped here; datasets interpret them during normalization, after the
/// whole chain has been collected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page {
    /// Upstream request identifier, logged and stamped into the rate gate.
    #[serde(default)]
    pub request_id: Option<String>,
    /// Cursor URL for the next page, absent on the final page.
    #[serde(default)]
    pub next_url: Option<String>,
    /// Raw rows of this page.
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
}

impl Page {
    /// Total number of rows across a slice of pages.
    #[must_use]
    pub fn total_rows(pages: &[Page]) -> usize {
        pages.iter().map(|p| p.results.len()).sum()
    }
}
