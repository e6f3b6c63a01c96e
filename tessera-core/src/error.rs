use thiserror::Error;

/// Unified error type for the tessera workspace.
///
/// This wraps terminal upstream statuses, transport-level failures, malformed
/// payloads, argument validation errors, sink failures, and an aggregate for
/// multi-partition fan-outs.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TesseraError {
    /// The upstream API answered with a status that terminates the chain.
    ///
    /// 429 never appears here; throttled requests are retried internally.
    #[error("upstream returned {status} for {url}")]
    UpstreamStatus {
        /// HTTP status code as reported by the upstream API.
        status: u16,
        /// The URL of the request that failed.
        url: String,
    },

    /// Network-level failure before a status could be read.
    #[error("transport error: {msg}")]
    Transport {
        /// Human-readable description of the underlying failure.
        msg: String,
    },

    /// Issues with the returned or expected data (missing fields, bad shapes).
    #[error("data issue: {0}")]
    Data(String),

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// The storage collaborator rejected a batch.
    #[error("sink failed: {msg}")]
    Sink {
        /// Human-readable description of the sink failure.
        msg: String,
    },

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),

    /// One or more fan-out partitions failed; contains the individual failures.
    #[error("partition failures: {0:?}")]
    PartitionFailed(Vec<TesseraError>),
}

impl TesseraError {
    /// Helper: build an `UpstreamStatus` error for a status code and URL.
    pub fn upstream(status: u16, url: impl Into<String>) -> Self {
        Self::UpstreamStatus {
            status,
            url: url.into(),
        }
    }

    /// Helper: build a `Transport` error from a message.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport { msg: msg.into() }
    }

    /// Helper: build a `Sink` error from a message.
    pub fn sink(msg: impl Into<String>) -> Self {
        Self::Sink { msg: msg.into() }
    }
}
