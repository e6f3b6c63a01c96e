//! Tessera imports historical market reference data through one paced pipeline.
//!
//! Overview
//! - Plans each dataset into one or more query partitions, paginates every
//!   partition behind its own adaptive rate gate, and normalizes the pages
//!   into canonical records from `tessera_core`.
//! - Slices normalized records into byte-bounded batches and hands them to a
//!   caller-supplied [`BatchSink`].
//! - Reports request, page, and batch accounting for every import.
//!
//! Key behaviors and trade-offs
//! - Pacing: every response counts against the window budget, throttled ones
//!   included; once the budget is spent the pause adapts to the observed
//!   response cadence instead of always sitting out the full window.
//! - Throttling: an upstream overload reply is retried at the same cursor
//!   with the same payload after the pause, so a throttled chain produces
//!   exactly the pages an unthrottled one would.
//! - Fan-out: multi-partition fetches run concurrently under a configured
//!   cap; results merge in plan order, which keeps windowed dedup
//!   deterministic, and every partition runs to its own conclusion before
//!   failures are reported.
//! - Batching: batch size is estimated from the first record of each result
//!   set under a size-uniformity assumption; a cheap bound, not a guarantee.
//!
//! Examples
//! Importing daily bars into a sink:
//! ```rust,ignore
//! use chrono::NaiveDate;
//! use tessera::{IngestConfig, Tessera};
//!
//! let tessera = Tessera::new(IngestConfig::new(api_key))?;
//! let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
//! let end = NaiveDate::from_ymd_opt(2023, 6, 30).unwrap();
//! let report = tessera.import_daily_bars("AAPL", 1, start, end, &sink).await?;
//! println!("{} bars in {} batches", report.records, report.batches);
//! ```
//!
//! Importing option contracts across a two-year snapshot window:
//! ```rust,ignore
//! use chrono::Utc;
//!
//! let today = Utc::now().date_naive();
//! let report = tessera
//!     .import_option_contracts("AAPL", 1, 24, today, &sink)
//!     .await?;
//! ```
#![warn(missing_docs)]

pub(crate) mod import;

pub use import::{ImportReport, Tessera};

// Re-export the working vocabulary so most callers need only this crate.
pub use tessera_core::{
    // Configuration
    BatchConfig,
    BatchSink,
    DEFAULT_BASE_URL,
    DEFAULT_BATCH_BYTES,
    DEFAULT_QUOTA,
    // Seams
    Dataset,
    FanOutConfig,
    IngestConfig,
    Page,
    Query,
    RateLimitConfig,
    RawResponse,
    TesseraError,
    Transport,
    // Calendar helpers
    first_business_day,
    month_anchors,
    records,
};

pub use tessera_polygon::{FetchOutcome, HttpTransport, PolygonConnector};

pub use tessera_polygon::datasets::{
    BarRequest, OptionContractRequest, TickerMetadataRequest, Timespan,
};
