//! The import pipeline: fetch, slice, hand off.

use std::sync::Arc;

use chrono::NaiveDate;

use tessera_core::records::{OptionContract, PriceBar, TickerMetadata};
use tessera_core::{BatchSink, Dataset, IngestConfig, TesseraError, Transport, batches, month_anchors};
use tessera_polygon::PolygonConnector;
use tessera_polygon::datasets::{BarRequest, OptionContractRequest, TickerMetadataRequest};

/// Accounting for one completed import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    /// Canonical records produced by normalization.
    pub records: usize,
    /// Batches handed to the sink.
    pub batches: usize,
    /// Upstream responses consumed, throttled retries included.
    pub requests: u32,
}

/// High-level entry point: one configured connector, one import call per
/// dataset.
///
/// The facade owns nothing mutable; imports can run concurrently from a
/// shared reference, each building its own pagination state.
pub struct Tessera {
    connector: PolygonConnector,
}

impl Tessera {
    /// Facade over the real HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns [`TesseraError::Transport`] when the HTTP client cannot be
    /// built.
    pub fn new(config: IngestConfig) -> Result<Self, TesseraError> {
        Ok(Self {
            connector: PolygonConnector::new(config)?,
        })
    }

    /// Facade over a caller-supplied transport.
    #[must_use]
    pub fn with_transport(config: IngestConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            connector: PolygonConnector::with_transport(config, transport),
        }
    }

    /// Import reference metadata for a single symbol.
    ///
    /// # Errors
    ///
    /// Fails on an empty symbol, on fetch errors, and on sink refusals.
    pub async fn import_ticker_metadata(
        &self,
        ticker: &str,
        sink: &dyn BatchSink<TickerMetadata>,
    ) -> Result<ImportReport, TesseraError> {
        self.import(&TickerMetadataRequest::one(ticker)?, sink).await
    }

    /// Import reference metadata for the whole active stock universe.
    ///
    /// # Errors
    ///
    /// Fails on fetch errors and on sink refusals.
    pub async fn import_all_ticker_metadata(
        &self,
        sink: &dyn BatchSink<TickerMetadata>,
    ) -> Result<ImportReport, TesseraError> {
        self.import(&TickerMetadataRequest::all(), sink).await
    }

    /// Import daily adjusted price bars for a ticker over an inclusive range.
    ///
    /// `ticker_id` is the storage identity of the ticker; it is stamped onto
    /// every bar so the sink can relate rows without further lookups.
    ///
    /// # Errors
    ///
    /// Fails on invalid arguments, fetch errors, and sink refusals.
    pub async fn import_daily_bars(
        &self,
        ticker: &str,
        ticker_id: i64,
        start: NaiveDate,
        end: NaiveDate,
        sink: &dyn BatchSink<PriceBar>,
    ) -> Result<ImportReport, TesseraError> {
        self.import(&BarRequest::new(ticker, ticker_id, start, end)?, sink)
            .await
    }

    /// Import option contracts for an underlying across a monthly snapshot
    /// window ending at `today`.
    ///
    /// The window holds the first business day of the current month and of
    /// each of the `months_back` months before it; each snapshot runs as its
    /// own partition.
    ///
    /// # Errors
    ///
    /// Fails on invalid arguments, fetch errors (including partial partition
    /// failures), and sink refusals.
    pub async fn import_option_contracts(
        &self,
        underlying: &str,
        underlying_ticker_id: i64,
        months_back: u32,
        today: NaiveDate,
        sink: &dyn BatchSink<OptionContract>,
    ) -> Result<ImportReport, TesseraError> {
        let window = month_anchors(today, months_back)?;
        self.import(
            &OptionContractRequest::new(underlying, underlying_ticker_id, window)?,
            sink,
        )
        .await
    }

    /// Import any dataset: fetch it, slice the records into byte-bounded
    /// batches, and store each batch in order.
    ///
    /// # Errors
    ///
    /// Fails on fetch errors and on the first sink refusal; batches already
    /// stored stay stored.
    pub async fn import<D: Dataset>(
        &self,
        dataset: &D,
        sink: &dyn BatchSink<D::Record>,
    ) -> Result<ImportReport, TesseraError> {
        let outcome = self.connector.fetch(dataset).await?;

        let max_bytes = self.connector.config().batch.max_bytes;
        let mut stored = 0usize;
        for batch in batches(&outcome.records, max_bytes)? {
            sink.store_batch(batch).await?;
            stored += 1;
        }

        tracing::info!(
            dataset = dataset.label(),
            records = outcome.records.len(),
            batches = stored,
            requests = outcome.requests,
            "import complete"
        );
        Ok(ImportReport {
            records: outcome.records.len(),
            batches: stored,
            requests: outcome.requests,
        })
    }
}
