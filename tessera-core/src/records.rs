//! Canonical record structs produced by normalization.
//!
//! These are the storage-ready shapes handed to a [`BatchSink`](crate::BatchSink)
//! one bounded batch at a time. Fields mirror what the upstream reference API
//! actually returns: everything it may omit is optional here, and normalizers
//! map absent fields to `None` rather than failing the row.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Reference metadata for one listed ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerMetadata {
    /// Exchange symbol, e.g. `AAPL`. The only field required by normalization.
    pub ticker: String,
    /// Company or instrument name.
    pub name: Option<String>,
    /// Instrument classification as reported upstream (`CS`, `ETF`, ...).
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Whether the listing is currently active.
    pub active: Option<bool>,
    /// Market segment, e.g. `stocks`.
    pub market: Option<String>,
    /// Listing locale, e.g. `us`.
    pub locale: Option<String>,
    /// Primary exchange MIC.
    pub primary_exchange: Option<String>,
    /// Trading currency name, e.g. `usd`.
    pub currency_name: Option<String>,
    /// SEC central index key, when the issuer has one.
    pub cik: Option<String>,
}

/// One daily (or other fixed-cadence) OHLCV bar for a known ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Internal ticker identifier, supplied by the orchestrator; not present
    /// in the upstream payload.
    pub ticker_id: i64,
    /// Calendar date of the bar, converted from the upstream millisecond
    /// epoch timestamp.
    pub as_of_date: NaiveDate,
    /// Opening price.
    pub open: f64,
    /// High price.
    pub high: f64,
    /// Low price.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Traded volume. Fractional for some instruments, hence `f64`.
    pub volume: f64,
    /// Volume-weighted average price, when reported.
    pub volume_weighted_price: Option<f64>,
    /// Number of transactions in the bar, when reported.
    pub transaction_count: Option<u64>,
    /// Whether the bar comes from over-the-counter data.
    #[serde(default)]
    pub otc: bool,
}

/// One options-contract listing as of a snapshot date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionContract {
    /// Internal identifier of the underlying ticker, supplied by the
    /// orchestrator; not present in the upstream payload.
    pub underlying_ticker_id: i64,
    /// Full option symbol, e.g. `O:ABC240119C00050000`. Natural key for
    /// deduplication across snapshot partitions.
    pub option_ticker: String,
    /// Expiration date of the contract.
    pub expiration_date: Option<NaiveDate>,
    /// Strike price.
    pub strike_price: Option<f64>,
    /// `call` or `put`.
    pub contract_type: Option<String>,
    /// Shares deliverable per contract, typically 100.
    pub shares_per_contract: Option<f64>,
    /// Primary listing exchange MIC.
    pub primary_exchange: Option<String>,
    /// Exercise style, e.g. `american`.
    pub exercise_style: Option<String>,
    /// CFI classification code.
    pub cfi: Option<String>,
}
