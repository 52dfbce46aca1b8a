// Error type for the normalization pipeline.

use thiserror::Error;

/// The only failure the pipeline can produce. Per-cell anomalies (missing
/// columns, nulls, zero denominators) are absorbed as zeros and never surface
/// here; this is reserved for payloads that do not contain a table at all.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("malformed stats payload: {reason}")]
    MalformedInput { reason: String },
}

impl NormalizeError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        NormalizeError::MalformedInput {
            reason: reason.into(),
        }
    }
}
