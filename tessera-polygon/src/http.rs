//! reqwest-backed transport.

use std::time::Duration;

use async_trait::async_trait;
use tessera_core::{RawResponse, TesseraError, Transport};

/// Production transport over a shared `reqwest` client.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build the transport, optionally bounding each exchange with a timeout.
    ///
    /// No timeout applies by default; pagination chains tolerate slow pages,
    /// and callers who need bounded latency pass one here.
    ///
    /// # Errors
    ///
    /// Returns [`TesseraError::Transport`] when the underlying client cannot
    /// be constructed.
    pub fn new(timeout: Option<Duration>) -> Result<Self, TesseraError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("tessera/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TesseraError::transport(format!("building http client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, params: &[(String, String)]) -> Result<RawResponse, TesseraError> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| TesseraError::transport(format!("GET {url}: {e}")))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TesseraError::transport(format!("reading body of {url}: {e}")))?;
        Ok(RawResponse { status, body })
    }
}
