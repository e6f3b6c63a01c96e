//! Options-contract listings.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use chrono::NaiveDate;
use serde::Deserialize;
use tessera_core::records::OptionContract;
use tessera_core::{Dataset, Page, Query, TesseraError};

use super::decode_row;

const PATH: &str = "/v3/reference/options/contracts";
const PAGE_LIMIT: &str = "1000";

/// Contracts listed for one underlying, snapshotted across a window of dates.
///
/// The window is a list of as-of dates, newest first; the plan carves one
/// partition per date so the snapshots can be fetched side by side. A
/// contract listed on several snapshot dates appears once in the output, at
/// the position its first snapshot gave it, carrying the fields of its last.
#[derive(Debug, Clone)]
pub struct OptionContractRequest {
    underlying: String,
    underlying_ticker_id: i64,
    window: Vec<NaiveDate>,
}

impl OptionContractRequest {
    /// Contracts for `underlying` as listed on each date in `window`.
    ///
    /// # Errors
    ///
    /// Rejects an empty underlying symbol. An empty window is allowed and
    /// plans nothing.
    pub fn new(
        underlying: impl Into<String>,
        underlying_ticker_id: i64,
        window: Vec<NaiveDate>,
    ) -> Result<Self, TesseraError> {
        let underlying = underlying.into();
        if underlying.trim().is_empty() {
            return Err(TesseraError::InvalidArg(
                "underlying symbol must not be empty".to_owned(),
            ));
        }
        Ok(Self {
            underlying,
            underlying_ticker_id,
            window,
        })
    }

    /// The snapshot dates this request will fan out over.
    #[must_use]
    pub fn window(&self) -> &[NaiveDate] {
        &self.window
    }
}

impl Dataset for OptionContractRequest {
    type Record = OptionContract;

    fn label(&self) -> &'static str {
        "reference/options/contracts"
    }

    fn plan(&self) -> Result<Vec<Query>, TesseraError> {
        Ok(self
            .window
            .iter()
            .map(|as_of| {
                Query::new(
                    PATH,
                    [
                        ("underlying_ticker", self.underlying.clone()),
                        ("as_of", as_of.to_string()),
                        ("limit", PAGE_LIMIT.to_owned()),
                    ],
                )
            })
            .collect())
    }

    fn normalize(&self, pages: &[Page]) -> Result<Vec<OptionContract>, TesseraError> {
        let mut out: Vec<OptionContract> = Vec::with_capacity(Page::total_rows(pages));
        let mut by_ticker: HashMap<String, usize> = HashMap::new();
        for page in pages {
            for row in &page.results {
                let raw: RawContract = decode_row(row, "option contract")?;
                let Some(record) = raw.into_record(self.underlying_ticker_id) else {
                    tracing::warn!(
                        underlying = %self.underlying,
                        "skipping contract row without an option ticker"
                    );
                    continue;
                };
                // Later snapshots refresh the fields but keep the slot the
                // contract was first seen in, so output order tracks the
                // window rather than snapshot churn.
                match by_ticker.entry(record.option_ticker.clone()) {
                    Entry::Occupied(slot) => out[*slot.get()] = record,
                    Entry::Vacant(slot) => {
                        slot.insert(out.len());
                        out.push(record);
                    }
                }
            }
        }
        Ok(out)
    }
}

// Upstream row shape; `ticker` is the occ-style option symbol.
#[derive(Debug, Deserialize)]
struct RawContract {
    ticker: Option<String>,
    expiration_date: Option<NaiveDate>,
    strike_price: Option<f64>,
    contract_type: Option<String>,
    shares_per_contract: Option<f64>,
    primary_exchange: Option<String>,
    exercise_style: Option<String>,
    cfi: Option<String>,
}

impl RawContract {
    fn into_record(self, underlying_ticker_id: i64) -> Option<OptionContract> {
        Some(OptionContract {
            underlying_ticker_id,
            option_ticker: self.ticker?,
            expiration_date: self.expiration_date,
            strike_price: self.strike_price,
            shares_per_contract: self.shares_per_contract,
            contract_type: self.contract_type,
            primary_exchange: self.primary_exchange,
            exercise_style: self.exercise_style,
            cfi: self.cfi,
        })
    }
}
