//! Aggregated price bars.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use tessera_core::records::PriceBar;
use tessera_core::{Dataset, Page, Query, TesseraError};

use super::decode_row;

const PAGE_LIMIT: &str = "50000";

/// Bar cadence accepted by the aggregates endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timespan {
    /// One bar per minute.
    Minute,
    /// One bar per hour.
    Hour,
    /// One bar per trading day.
    #[default]
    Day,
    /// One bar per week.
    Week,
    /// One bar per month.
    Month,
    /// One bar per quarter.
    Quarter,
    /// One bar per year.
    Year,
}

impl Timespan {
    /// The path segment the upstream expects.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        }
    }
}

/// Price bars for one ticker over an inclusive date range.
///
/// Defaults to split-adjusted daily bars with a multiplier of one, which is
/// what the historical importer pulls; the builders widen the cadence when a
/// caller wants coarser or raw series.
#[derive(Debug, Clone)]
pub struct BarRequest {
    ticker: String,
    ticker_id: i64,
    start: NaiveDate,
    end: NaiveDate,
    multiplier: u32,
    timespan: Timespan,
    adjusted: bool,
}

impl BarRequest {
    /// Daily adjusted bars for `ticker` between `start` and `end`.
    ///
    /// # Errors
    ///
    /// Rejects an empty symbol and a range whose start falls after its end.
    pub fn new(
        ticker: impl Into<String>,
        ticker_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Self, TesseraError> {
        let ticker = ticker.into();
        if ticker.trim().is_empty() {
            return Err(TesseraError::InvalidArg(
                "ticker symbol must not be empty".to_owned(),
            ));
        }
        if start > end {
            return Err(TesseraError::InvalidArg(format!(
                "bar range start {start} falls after end {end}"
            )));
        }
        Ok(Self {
            ticker,
            ticker_id,
            start,
            end,
            multiplier: 1,
            timespan: Timespan::Day,
            adjusted: true,
        })
    }

    /// Change the bar cadence.
    #[must_use]
    pub fn with_timespan(mut self, multiplier: u32, timespan: Timespan) -> Self {
        self.multiplier = multiplier.max(1);
        self.timespan = timespan;
        self
    }

    /// Ask for raw prices instead of split-adjusted ones.
    #[must_use]
    pub fn with_raw_prices(mut self) -> Self {
        self.adjusted = false;
        self
    }
}

impl Dataset for BarRequest {
    type Record = PriceBar;

    fn label(&self) -> &'static str {
        "aggs/bars"
    }

    fn plan(&self) -> Result<Vec<Query>, TesseraError> {
        let path = format!(
            "/v2/aggs/ticker/{}/range/{}/{}/{}/{}",
            self.ticker,
            self.multiplier,
            self.timespan.as_str(),
            self.start,
            self.end,
        );
        let params = [
            ("adjusted", self.adjusted.to_string()),
            ("sort", "desc".to_owned()),
            ("limit", PAGE_LIMIT.to_owned()),
        ];
        Ok(vec![Query::new(path, params)])
    }

    fn normalize(&self, pages: &[Page]) -> Result<Vec<PriceBar>, TesseraError> {
        let mut out = Vec::with_capacity(Page::total_rows(pages));
        for page in pages {
            for row in &page.results {
                let raw: RawBar = decode_row(row, "aggregate bar")?;
                match raw.into_record(self.ticker_id) {
                    Some(bar) => out.push(bar),
                    None => tracing::warn!(
                        ticker = %self.ticker,
                        "skipping bar row with missing fields"
                    ),
                }
            }
        }
        Ok(out)
    }
}

// Upstream row shape: single-letter keys, millisecond epoch timestamps.
#[derive(Debug, Deserialize)]
struct RawBar {
    t: Option<i64>,
    o: Option<f64>,
    h: Option<f64>,
    l: Option<f64>,
    c: Option<f64>,
    v: Option<f64>,
    vw: Option<f64>,
    n: Option<u64>,
    otc: Option<bool>,
}

impl RawBar {
    // A bar without a timestamp or a full OHLCV set cannot become a record;
    // optional extras degrade to None instead.
    fn into_record(self, ticker_id: i64) -> Option<PriceBar> {
        let millis = self.t?;
        let as_of_date = DateTime::from_timestamp_millis(millis)?.date_naive();
        Some(PriceBar {
            ticker_id,
            as_of_date,
            open: self.o?,
            high: self.h?,
            low: self.l?,
            close: self.c?,
            volume: self.v?,
            volume_weighted_price: self.vw,
            transaction_count: self.n,
            otc: self.otc.unwrap_or(false),
        })
    }
}
