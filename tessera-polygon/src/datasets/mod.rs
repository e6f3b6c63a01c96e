//! Concrete datasets: endpoint shapes, request payloads, row normalization.
//!
//! Each dataset pairs a typed request with the upstream raw row it decodes
//! and the canonical record it produces. Planning and normalization are pure;
//! all network traffic lives in the engine.

mod bars;
mod contracts;
mod tickers;

pub use bars::{BarRequest, Timespan};
pub use contracts::OptionContractRequest;
pub use tickers::TickerMetadataRequest;

use serde::de::DeserializeOwned;
use tessera_core::TesseraError;

// Raw rows arrive as loose JSON values inside a page; decoding failures name
// the dataset so a bad row can be traced to its endpoint.
pub(crate) fn decode_row<T: DeserializeOwned>(
    row: &serde_json::Value,
    what: &str,
) -> Result<T, TesseraError> {
    T::deserialize(row).map_err(|e| TesseraError::Data(format!("{what} row: {e}")))
}
