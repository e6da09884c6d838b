//! Decoding of raw signal records into [`SocialSignal`]s.
//!
//! Records arrive as loosely-typed JSON from ingestion collaborators. Each one
//! is decoded on its own so a single malformed record never sinks the batch.

use serde_json::Value;

use crate::types::{SignalBatch, SocialSignal};

/// Decode one raw record, returning a reason string when it is unusable.
///
/// # Errors
///
/// Returns `Err` when a required field is missing or mistyped, or when the
/// post id is blank.
pub fn decode_record(record: Value) -> Result<SocialSignal, String> {
    let signal: SocialSignal = serde_json::from_value(record).map_err(|e| e.to_string())?;
    if signal.post_id.trim().is_empty() {
        return Err("post_id must be non-empty".to_string());
    }
    Ok(signal)
}

/// Decode a batch of raw records, skipping (and counting) the malformed ones.
#[must_use]
pub fn decode_records(source_name: &str, records: Vec<Value>) -> SignalBatch {
    let mut batch = SignalBatch::default();

    for (index, record) in records.into_iter().enumerate() {
        match decode_record(record) {
            Ok(signal) => batch.signals.push(signal),
            Err(reason) => {
                tracing::warn!(
                    source = source_name,
                    index,
                    reason = %reason,
                    "rejecting malformed signal record"
                );
                batch.rejected += 1;
            }
        }
    }

    batch
}
