//! The pagination engine.
//!
//! One [`Paginator`] drives one query chain: issue the planned query, follow
//! continuation cursors until the upstream stops handing them out, pause when
//! the rate gate says so, and retry the current page when the upstream
//! signals overload. The engine owns its page accumulator and is consumed by
//! [`Paginator::run`]; a fresh fetch builds a fresh engine.

use std::sync::Arc;

use tessera_core::{Page, Query, RateLimitConfig, TesseraError, Transport};
use url::Url;

use crate::pace::RateGate;

/// Query parameter carrying the API credential.
const CREDENTIAL_PARAM: &str = "apiKey";

/// Pages and request accounting from one completed chain.
#[derive(Debug)]
pub struct ChainResult {
    /// Pages in the order the upstream served them.
    pub pages: Vec<Page>,
    /// Responses consumed, throttled replies included.
    pub requests: u32,
}

/// Runs a single pagination chain to completion.
pub struct Paginator {
    transport: Arc<dyn Transport>,
    base_url: String,
    api_key: String,
    gate: RateGate,
    pages: Vec<Page>,
}

impl Paginator {
    /// A fresh engine for one chain.
    #[must_use]
    pub fn new(
        transport: Arc<dyn Transport>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        rate: RateLimitConfig,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            api_key: api_key.into(),
            gate: RateGate::new(rate),
            pages: Vec::new(),
        }
    }

    /// Drive the chain until the upstream stops paging or fails.
    ///
    /// A throttled reply (429) is retried at the same URL with the same
    /// parameters after the gate-mandated pause, so a retried page is
    /// indistinguishable from a slow one apart from the extra response in the
    /// accounting. Continuation requests carry only the credential; the
    /// cursor URL already encodes the rest.
    ///
    /// # Errors
    ///
    /// Fails on transport faults, on undecodable page bodies, on malformed
    /// continuation cursors, and on any upstream status other than success or
    /// throttling.
    pub async fn run(mut self, query: &Query) -> Result<ChainResult, TesseraError> {
        let mut url = self.chain_start(&query.path)?;
        let mut params: Vec<(String, String)> = query
            .params
            .iter()
            .cloned()
            .chain([(CREDENTIAL_PARAM.to_string(), self.api_key.clone())])
            .collect();
        let mut overload = false;

        loop {
            if let Some(pause) = self.gate.required_pause(overload) {
                tracing::debug!(
                    pause_secs = pause.as_secs(),
                    overload,
                    "window budget spent; pausing chain"
                );
                tokio::time::sleep(pause).await;
                self.gate.reset();
            }

            tracing::debug!(url = %url, overload, "requesting page");
            let reply = self.transport.get(&url, &params).await?;
            self.gate.note_response();

            match reply.status {
                200 => {
                    let page: Page = serde_json::from_str(&reply.body)
                        .map_err(|e| TesseraError::Data(format!("decoding page from {url}: {e}")))?;
                    self.gate.note_success(page.request_id.clone());
                    tracing::debug!(url = %url, rows = page.results.len(), "page accepted");
                    overload = false;
                    let next = page.next_url.clone();
                    self.pages.push(page);
                    match next {
                        Some(next) => {
                            url = self.continuation(&next)?;
                            params = vec![(CREDENTIAL_PARAM.to_string(), self.api_key.clone())];
                        }
                        None => break,
                    }
                }
                429 => {
                    tracing::warn!(url = %url, "upstream throttled the chain; retrying the same page");
                    overload = true;
                }
                status => {
                    tracing::warn!(url = %url, status, "chain abandoned on upstream error");
                    return Err(TesseraError::upstream(status, url));
                }
            }
        }

        Ok(ChainResult {
            pages: self.pages,
            requests: self.gate.total_responses(),
        })
    }

    fn chain_start(&self, path: &str) -> Result<String, TesseraError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| TesseraError::InvalidArg(format!("base url {}: {e}", self.base_url)))?;
        url.set_path(path);
        Ok(url.into())
    }

    // Continuation cursors arrive as absolute URLs; anything else is a data
    // fault, not a transport fault.
    fn continuation(&self, next: &str) -> Result<String, TesseraError> {
        let url = Url::parse(next)
            .map_err(|e| TesseraError::Data(format!("continuation cursor {next}: {e}")))?;
        Ok(url.into())
    }
}
