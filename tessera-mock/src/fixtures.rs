//! Upstream-shaped JSON page bodies.
//!
//! Builders return the serialized body of one page, ready to hand to a
//! transport double. Row values are deterministic functions of the inputs so
//! assertions can be written against them directly.

use serde_json::{Value, json};

fn page_body(request_id: &str, results: Vec<Value>, next_url: Option<&str>) -> String {
    let mut page = json!({
        "request_id": request_id,
        "status": "OK",
        "count": results.len(),
        "results": results,
    });
    if let Some(next) = next_url {
        page["next_url"] = json!(next);
    }
    page.to_string()
}

/// A reference-tickers page listing `symbols`.
#[must_use]
pub fn tickers_page(request_id: &str, symbols: &[&str], next_url: Option<&str>) -> String {
    let results = symbols
        .iter()
        .map(|symbol| {
            json!({
                "ticker": symbol,
                "name": format!("{symbol} Inc."),
                "type": "CS",
                "market": "stocks",
                "locale": "us",
                "primary_exchange": "XNAS",
                "currency_name": "usd",
                "active": true,
            })
        })
        .collect();
    page_body(request_id, results, next_url)
}

/// An aggregates page of `(millis, open, high, low, close, volume)` bars.
#[must_use]
pub fn bars_page(
    request_id: &str,
    bars: &[(i64, f64, f64, f64, f64, f64)],
    next_url: Option<&str>,
) -> String {
    let results = bars
        .iter()
        .map(|&(t, o, h, l, c, v)| {
            json!({
                "t": t,
                "o": o,
                "h": h,
                "l": l,
                "c": c,
                "v": v,
                "vw": (h + l) / 2.0,
                "n": 100,
            })
        })
        .collect();
    page_body(request_id, results, next_url)
}

/// An options-contracts page of `(option_ticker, expiration, strike)` rows.
#[must_use]
pub fn contracts_page(
    request_id: &str,
    contracts: &[(&str, &str, f64)],
    next_url: Option<&str>,
) -> String {
    let results = contracts
        .iter()
        .map(|&(ticker, expiration, strike)| {
            json!({
                "ticker": ticker,
                "expiration_date": expiration,
                "strike_price": strike,
                "contract_type": "call",
                "shares_per_contract": 100.0,
                "exercise_style": "american",
                "primary_exchange": "BATO",
                "cfi": "OCASPS",
            })
        })
        .collect();
    page_body(request_id, results, next_url)
}

/// A page with no rows and no continuation.
#[must_use]
pub fn empty_page(request_id: &str) -> String {
    page_body(request_id, Vec::new(), None)
}
