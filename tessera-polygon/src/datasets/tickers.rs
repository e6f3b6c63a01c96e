//! Reference ticker metadata.

use serde::Deserialize;
use tessera_core::records::TickerMetadata;
use tessera_core::{Dataset, Page, Query, TesseraError};

use super::decode_row;

const PATH: &str = "/v3/reference/tickers";
const PAGE_LIMIT: &str = "1000";

/// Reference metadata for the active stock universe, or for one symbol.
///
/// Always scoped to active stock-market listings; the single-symbol form
/// merely adds a filter on top.
#[derive(Debug, Clone)]
pub struct TickerMetadataRequest {
    ticker: Option<String>,
}

impl TickerMetadataRequest {
    /// Metadata for every active ticker.
    #[must_use]
    pub fn all() -> Self {
        Self { ticker: None }
    }

    /// Metadata filtered to a single symbol.
    ///
    /// # Errors
    ///
    /// Rejects an empty symbol.
    pub fn one(ticker: impl Into<String>) -> Result<Self, TesseraError> {
        let ticker = ticker.into();
        if ticker.trim().is_empty() {
            return Err(TesseraError::InvalidArg(
                "ticker symbol must not be empty".to_owned(),
            ));
        }
        Ok(Self {
            ticker: Some(ticker),
        })
    }
}

impl Dataset for TickerMetadataRequest {
    type Record = TickerMetadata;

    fn label(&self) -> &'static str {
        "reference/tickers"
    }

    fn plan(&self) -> Result<Vec<Query>, TesseraError> {
        let mut params = vec![
            ("active".to_owned(), "true".to_owned()),
            ("market".to_owned(), "stocks".to_owned()),
            ("limit".to_owned(), PAGE_LIMIT.to_owned()),
        ];
        if let Some(ticker) = &self.ticker {
            params.push(("ticker".to_owned(), ticker.clone()));
        }
        Ok(vec![Query::new(PATH, params)])
    }

    fn normalize(&self, pages: &[Page]) -> Result<Vec<TickerMetadata>, TesseraError> {
        let mut out = Vec::with_capacity(Page::total_rows(pages));
        for page in pages {
            for row in &page.results {
                let raw: RawTicker = decode_row(row, "ticker metadata")?;
                match raw.into_record() {
                    Some(record) => out.push(record),
                    None => tracing::warn!("skipping ticker row without a symbol"),
                }
            }
        }
        Ok(out)
    }
}

// Upstream row shape; everything beyond the symbol is best-effort.
#[derive(Debug, Deserialize)]
struct RawTicker {
    ticker: Option<String>,
    name: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    market: Option<String>,
    locale: Option<String>,
    primary_exchange: Option<String>,
    currency_name: Option<String>,
    cik: Option<String>,
    active: Option<bool>,
}

impl RawTicker {
    fn into_record(self) -> Option<TickerMetadata> {
        Some(TickerMetadata {
            ticker: self.ticker?,
            name: self.name,
            kind: self.kind,
            market: self.market,
            locale: self.locale,
            primary_exchange: self.primary_exchange,
            currency_name: self.currency_name,
            cik: self.cik,
            active: self.active,
        })
    }
}
