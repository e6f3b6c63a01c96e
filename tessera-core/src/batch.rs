//! Size-bounded batch slicing for storage hand-off.

use serde::Serialize;

use crate::TesseraError;

/// Records per batch for a byte ceiling, estimated from the serialized size
/// of the first record (size-uniformity assumption). Floor division, clamped
/// to at least one record so oversized rows still flow.
#[must_use]
pub fn batch_len(max_bytes: usize, first_record_bytes: usize) -> usize {
    (max_bytes / first_record_bytes.max(1)).max(1)
}

/// Slice `records` into consecutive batches bounded by `max_bytes`.
///
/// The batch length is computed once from the first record's serialized JSON
/// size; every record lands in exactly one batch, batch order matches input
/// order, and only the last batch may be shorter. An empty input yields no
/// batches and is not an error.
///
/// # Errors
/// Returns `TesseraError::InvalidArg` for a zero byte ceiling and
/// `TesseraError::Data` if the first record cannot be serialized.
pub fn batches<T: Serialize>(
    records: &[T],
    max_bytes: usize,
) -> Result<std::slice::Chunks<'_, T>, TesseraError> {
    if max_bytes == 0 {
        return Err(TesseraError::InvalidArg(
            "batch byte ceiling must be positive".into(),
        ));
    }
    let Some(first) = records.first() else {
        return Ok(records.chunks(1));
    };
    let estimate = serde_json::to_vec(first)
        .map_err(|e| TesseraError::Data(format!("record not serializable: {e}")))?
        .len();
    Ok(records.chunks(batch_len(max_bytes, estimate)))
}
