//! Client-side request pacing.
//!
//! The upstream API budgets requests per rolling window. [`RateGate`] tracks
//! what one pagination chain has spent and decides, before each request,
//! whether the chain must pause first and for how long. The gate never sleeps
//! itself; the engine owns the clock, sleeps when told to, and then calls
//! [`RateGate::reset`].

use std::time::{Duration, Instant};

use tessera_core::RateLimitConfig;

/// One successful page response, as seen by the gate.
#[derive(Debug, Clone)]
pub struct QueryStamp {
    /// Upstream request identifier, when the page carried one.
    pub request_id: Option<String>,
    /// When the response landed.
    pub at: Instant,
}

/// Adaptive request gate for a single pagination chain.
///
/// Every response, whatever its status, counts against the window budget.
/// Only successful pages leave a [`QueryStamp`]; the stamps are the evidence
/// the gate adapts its pause to.
#[derive(Debug)]
pub struct RateGate {
    limit: u32,
    window: Duration,
    issued: u32,
    total: u32,
    stamps: Vec<QueryStamp>,
}

impl RateGate {
    /// A fresh gate with nothing spent.
    #[must_use]
    pub fn new(cfg: RateLimitConfig) -> Self {
        Self {
            limit: cfg.limit,
            window: cfg.window,
            issued: 0,
            total: 0,
            stamps: Vec::new(),
        }
    }

    /// Pause the chain must take before its next request, if any.
    ///
    /// `overload` reports that the previous response was an explicit
    /// throttling signal; it forces a pause even when the counted budget
    /// still has room. Otherwise a pause is due only once the window budget
    /// is spent.
    #[must_use]
    pub fn required_pause(&self, overload: bool) -> Option<Duration> {
        if !overload && self.issued < self.limit {
            return None;
        }
        Some(self.adaptive_pause())
    }

    // With three or more stamps the chain has measured its own cadence: pause
    // for the observed spread between oldest and newest, rounded up to whole
    // seconds, never longer than the window. Fewer stamps mean no evidence,
    // so the full window applies.
    fn adaptive_pause(&self) -> Duration {
        match (self.stamps.first(), self.stamps.last()) {
            (Some(oldest), Some(newest)) if self.stamps.len() > 2 => {
                let spread = newest.at.saturating_duration_since(oldest.at);
                let whole = spread.as_secs() + u64::from(spread.subsec_nanos() > 0);
                Duration::from_secs(whole).min(self.window)
            }
            _ => self.window,
        }
    }

    /// Count a response against the window budget.
    ///
    /// Called for every completed exchange, throttled replies included.
    pub fn note_response(&mut self) {
        self.issued += 1;
        self.total += 1;
    }

    /// Stamp a successful page.
    pub fn note_success(&mut self, request_id: Option<String>) {
        self.stamps.push(QueryStamp {
            request_id,
            at: Instant::now(),
        });
    }

    /// Clear the window budget and cadence evidence after an enforced pause.
    ///
    /// The lifetime total is kept.
    pub fn reset(&mut self) {
        self.issued = 0;
        self.stamps.clear();
    }

    /// Stamps collected since the last reset.
    #[must_use]
    pub fn stamps(&self) -> &[QueryStamp] {
        &self.stamps
    }

    /// Responses counted since the gate was built, resets included.
    #[must_use]
    pub fn total_responses(&self) -> u32 {
        self.total
    }
}
