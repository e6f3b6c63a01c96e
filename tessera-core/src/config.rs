//! Configuration types threaded into connectors at construction.

use std::num::NonZeroUsize;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.polygon.io";

/// Default request budget per quota window, one below the advertised
/// upstream limit as safety margin.
pub const DEFAULT_QUOTA: u32 = 4;

/// Default batch byte ceiling, leaving headroom under common bulk-insert
/// statement limits (~65,000).
pub const DEFAULT_BATCH_BYTES: usize = 60_000;

/// Client-side request budget over a rolling window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum number of requests per window.
    pub limit: u32,
    /// Duration of the quota window; also the longest pause the gate will
    /// ever impose.
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_QUOTA,
            window: Duration::from_secs(60),
        }
    }
}

/// Concurrency bounds for multi-partition fan-outs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanOutConfig {
    /// Maximum number of partitions paginating at the same time. Each
    /// partition throttles independently, so this cap is what keeps the
    /// aggregate request rate near the global budget.
    pub max_concurrent_partitions: usize,
}

impl Default for FanOutConfig {
    fn default() -> Self {
        Self {
            max_concurrent_partitions: std::thread::available_parallelism()
                .map_or(4, NonZeroUsize::get),
        }
    }
}

/// Size bound for storage hand-off batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Approximate byte ceiling per batch, estimated from the serialized
    /// size of the first record.
    pub max_bytes: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_BATCH_BYTES,
        }
    }
}

/// Full configuration for an ingestion connector: endpoint, credential, and
/// the pacing/fan-out/batching knobs.
///
/// There is no ambient fallback: whatever constructs the connector decides
/// where the credential comes from and passes it here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// API base URL.
    pub base_url: String,
    /// Static API credential attached to every request, continuations
    /// included.
    pub api_key: String,
    /// Client-side request pacing.
    pub rate: RateLimitConfig,
    /// Partition fan-out bounds.
    pub fanout: FanOutConfig,
    /// Batch slicing bound.
    pub batch: BatchConfig,
}

impl IngestConfig {
    /// Build a configuration with defaults for everything but the credential.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            rate: RateLimitConfig::default(),
            fanout: FanOutConfig::default(),
            batch: BatchConfig::default(),
        }
    }

    /// Override the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the request budget per window.
    #[must_use]
    pub fn with_rate_limit(mut self, limit: u32, window: Duration) -> Self {
        self.rate = RateLimitConfig { limit, window };
        self
    }

    /// Override the fan-out partition cap. Clamped to at least 1.
    #[must_use]
    pub fn with_max_concurrent_partitions(mut self, max: usize) -> Self {
        self.fanout.max_concurrent_partitions = max.max(1);
        self
    }

    /// Override the batch byte ceiling. Clamped to at least 1.
    #[must_use]
    pub fn with_batch_bytes(mut self, max_bytes: usize) -> Self {
        self.batch.max_bytes = max_bytes.max(1);
        self
    }
}
