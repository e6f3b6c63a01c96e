//! tessera-core
//!
//! Core types, seams, and pure utilities shared across the tessera workspace.
//!
//! - `records`: canonical record structs produced by normalization.
//! - `dataset`: the `Dataset` trait connecting the pagination engine to
//!   concrete data kinds.
//! - `transport`: the HTTP seam implemented by real and scripted clients.
//! - `sink`: the `BatchSink` trait accepted by orchestrators for hand-off.
//! - `calendar`: first-business-day month anchors for partitioned backfills.
//! - `batch`: size-bounded batch slicing.
//!
//! This crate performs no I/O itself; transports and connectors live in
//! `tessera-polygon`.
#![warn(missing_docs)]

/// Size-bounded batch slicing.
pub mod batch;
/// Month-anchor generation for partitioned historical pulls.
pub mod calendar;
/// Configuration threaded into connectors at construction.
pub mod config;
/// The `Dataset` trait and query plans.
pub mod dataset;
mod error;
/// The upstream page envelope.
pub mod page;
/// Canonical record structs.
pub mod records;
/// Storage hand-off seam.
pub mod sink;
/// HTTP transport seam.
pub mod transport;

pub use batch::{batch_len, batches};
pub use calendar::{first_business_day, month_anchors};
pub use config::{
    BatchConfig, DEFAULT_BASE_URL, DEFAULT_BATCH_BYTES, DEFAULT_QUOTA, FanOutConfig, IngestConfig,
    RateLimitConfig,
};
pub use dataset::{Dataset, Query};
pub use error::TesseraError;
pub use page::Page;
pub use records::{OptionContract, PriceBar, TickerMetadata};
pub use sink::BatchSink;
pub use transport::{RawResponse, Transport};
