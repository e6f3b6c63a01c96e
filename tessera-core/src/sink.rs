//! Storage hand-off seam.

use async_trait::async_trait;

use crate::TesseraError;

/// Consumer of bounded, homogeneous record batches.
///
/// The ingestion core has no opinion on transactionality beyond "one batch,
/// one call": each normalized fetch is sliced by the batch sequencer and
/// handed over batch by batch, in order.
#[async_trait]
pub trait BatchSink<R: Send + Sync>: Send + Sync {
    /// Persist one batch.
    ///
    /// # Errors
    /// Returns `TesseraError::Sink` when the batch could not be accepted;
    /// the orchestrator stops the hand-off at the first failed batch.
    async fn store_batch(&self, batch: &[R]) -> Result<(), TesseraError>;
}
