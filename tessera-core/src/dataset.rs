//! The `Dataset` trait connecting the pagination engine to concrete data kinds.

use serde::Serialize;

use crate::TesseraError;
use crate::page::Page;

/// One upstream query: an endpoint path plus the parameters of its first
/// request. Continuation requests carry only the credential, since the
/// cursor URL already embeds everything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Path relative to the API base URL, e.g. `/v3/reference/tickers`.
    pub path: String,
    /// Query parameters attached to the initial request of the chain.
    pub params: Vec<(String, String)>,
}

impl Query {
    /// Build a query from a path and parameter pairs.
    pub fn new(
        path: impl Into<String>,
        params: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Self {
        Self {
            path: path.into(),
            params: params
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A concrete data kind: how to query it and how to turn its raw pages into
/// canonical records.
///
/// Connectors depend only on this trait. Each query in the plan runs as its
/// own pagination chain; plans with more than one query fan out across
/// parallel partitions, and `normalize` sees the pages of all partitions
/// concatenated in plan order.
pub trait Dataset: Send + Sync {
    /// Canonical record type this dataset produces.
    type Record: Serialize + Send + Sync;

    /// Short label used in logs and error messages, e.g. `reference/tickers`.
    fn label(&self) -> &'static str;

    /// Build the queries to run, one pagination chain each.
    ///
    /// # Errors
    /// Returns `TesseraError::InvalidArg` when the request parameters cannot
    /// form a valid query.
    fn plan(&self) -> Result<Vec<Query>, TesseraError>;

    /// Convert collected pages into canonical records.
    ///
    /// Deterministic and idempotent for the same input: the output is built
    /// from scratch on every call, never appended to hidden state.
    ///
    /// # Errors
    /// Returns `TesseraError::Data` when a row cannot be interpreted at all.
    /// Rows that are merely incomplete are skipped with a warning instead.
    fn normalize(&self, pages: &[Page]) -> Result<Vec<Self::Record>, TesseraError>;
}
