use thiserror::Error;

/// Failure of one aggregation cycle.
///
/// Either underlying fetch failing surfaces as exactly one of these; no partial
/// record accompanies it.
#[derive(Debug, Error)]
pub enum AggregationError {
    /// The request could not be sent, or timed out.
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success status, unparseable body, or an unusable field value.
    #[error("Response error: {0}")]
    Response(String),

    /// An expected location entry or field is absent from a well-formed payload.
    #[error("Missing field: {0}")]
    FieldMissing(String),
}
