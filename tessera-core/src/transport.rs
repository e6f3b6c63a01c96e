//! Transport seam between connectors and the HTTP stack.

use async_trait::async_trait;

use crate::TesseraError;

/// Raw reply from one HTTP exchange, before any interpretation.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl RawResponse {
    /// Build a reply from a status and body.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Minimal HTTP client abstraction (so tests can inject scripted exchanges).
///
/// Implementations perform exactly one GET per call and report the status
/// untouched; retry and throttling decisions belong to the engine above.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue one GET against `url` with `params` appended to its query string.
    ///
    /// # Errors
    /// Returns `TesseraError::Transport` when the exchange fails before a
    /// status could be read (connect failure, timeout, invalid URL).
    async fn get(
        &self,
        url: &str,
        params: &[(String, String)],
    ) -> Result<RawResponse, TesseraError>;
}
