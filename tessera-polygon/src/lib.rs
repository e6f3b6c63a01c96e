//! tessera-polygon
//!
//! REST connector for the Polygon-shaped reference API. The crate splits the
//! ingestion path into small seams:
//!
//! - [`HttpTransport`]: one HTTP GET per call, nothing else;
//! - [`pace::RateGate`]: decides when a chain must pause, never sleeps;
//! - [`paginator::Paginator`]: the explicit cursor loop driving one chain;
//! - [`datasets`]: endpoint shapes and row normalization per dataset;
//! - [`PolygonConnector`]: plans a dataset, fans partitions out, normalizes
//!   once every partition has reported.

#![warn(missing_docs)]

pub mod datasets;
mod http;
pub mod pace;
pub mod paginator;

pub use http::HttpTransport;

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;

use tessera_core::{Dataset, IngestConfig, Page, Query, TesseraError, Transport};

use crate::paginator::{ChainResult, Paginator};

/// Result of one dataset fetch: canonical records plus request accounting.
#[derive(Debug)]
pub struct FetchOutcome<R> {
    /// Normalized records, ordered as the dataset defines.
    pub records: Vec<R>,
    /// Pages collected across all partitions.
    pub pages: usize,
    /// Responses consumed across all partitions, throttled retries included.
    pub requests: u32,
}

/// Connector for the upstream REST API.
///
/// Holds a transport and the ingestion configuration. Each fetch builds one
/// pagination engine per planned partition; nothing is shared between
/// partitions except the transport and the concurrency cap.
pub struct PolygonConnector {
    transport: Arc<dyn Transport>,
    config: IngestConfig,
}

impl PolygonConnector {
    /// Connector over the real HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns [`TesseraError::Transport`] when the HTTP client cannot be
    /// built.
    pub fn new(config: IngestConfig) -> Result<Self, TesseraError> {
        let transport = Arc::new(HttpTransport::new(None)?);
        Ok(Self::with_transport(config, transport))
    }

    /// Connector over a caller-supplied transport.
    #[must_use]
    pub fn with_transport(config: IngestConfig, transport: Arc<dyn Transport>) -> Self {
        Self { transport, config }
    }

    /// The configuration this connector was built with.
    #[must_use]
    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Fetch a dataset end to end: plan, paginate every partition, normalize.
    ///
    /// Partitions run concurrently under the configured cap, each behind its
    /// own rate gate. Every partition is driven to its own conclusion even
    /// when a sibling fails; only then does the fetch report, so one flaky
    /// snapshot cannot silently truncate the others.
    ///
    /// # Errors
    ///
    /// A single-partition fetch returns the chain's error as-is. A fan-out
    /// with failed partitions returns [`TesseraError::PartitionFailed`]
    /// carrying one error per failed partition.
    pub async fn fetch<D: Dataset>(
        &self,
        dataset: &D,
    ) -> Result<FetchOutcome<D::Record>, TesseraError> {
        let queries = dataset.plan()?;
        tracing::debug!(
            dataset = dataset.label(),
            partitions = queries.len(),
            "starting fetch"
        );

        let (pages, requests) = if queries.is_empty() {
            (Vec::new(), 0)
        } else if queries.len() == 1 {
            let chain = self.run_chain(&queries[0]).await?;
            (chain.pages, chain.requests)
        } else {
            self.run_partitions(queries).await?
        };

        let records = dataset.normalize(&pages)?;
        tracing::info!(
            dataset = dataset.label(),
            pages = pages.len(),
            records = records.len(),
            requests,
            "fetch complete"
        );
        Ok(FetchOutcome {
            records,
            pages: pages.len(),
            requests,
        })
    }

    async fn run_chain(&self, query: &Query) -> Result<ChainResult, TesseraError> {
        Paginator::new(
            Arc::clone(&self.transport),
            &self.config.base_url,
            &self.config.api_key,
            self.config.rate,
        )
        .run(query)
        .await
    }

    async fn run_partitions(
        &self,
        queries: Vec<Query>,
    ) -> Result<(Vec<Page>, u32), TesseraError> {
        let cap = self.config.fanout.max_concurrent_partitions.max(1);
        let permits = Arc::new(Semaphore::new(cap));

        let mut handles = Vec::with_capacity(queries.len());
        for query in queries {
            let transport = Arc::clone(&self.transport);
            let permits = Arc::clone(&permits);
            let base_url = self.config.base_url.clone();
            let api_key = self.config.api_key.clone();
            let rate = self.config.rate;
            handles.push(tokio::spawn(async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|_| TesseraError::Other("partition semaphore closed".to_owned()))?;
                Paginator::new(transport, base_url, api_key, rate)
                    .run(&query)
                    .await
            }));
        }

        // Collection stays in plan order, which makes downstream
        // last-write-wins dedup a function of the snapshot window rather
        // than of task scheduling.
        let mut pages = Vec::new();
        let mut requests = 0u32;
        let mut failures = Vec::new();
        for joined in join_all(handles).await {
            match joined {
                Ok(Ok(chain)) => {
                    requests += chain.requests;
                    pages.extend(chain.pages);
                }
                Ok(Err(err)) => failures.push(err),
                Err(err) => {
                    failures.push(TesseraError::Other(format!("partition task failed: {err}")));
                }
            }
        }

        if failures.is_empty() {
            Ok((pages, requests))
        } else {
            tracing::warn!(failed = failures.len(), "fan-out finished with failed partitions");
            Err(TesseraError::PartitionFailed(failures))
        }
    }
}
