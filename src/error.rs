/// Errors raised while turning labeled records into sentiment metrics.
///
/// Every variant is a local computation failure: nothing here is retried,
/// and a failed compilation never yields a `MetricsRow`.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum MetricsError {
    #[error("Invalid input: no sentiment records to compile")]
    EmptyInput,

    #[error("Invalid input: day bucket holds no records")]
    EmptyBucket,

    #[error("Invalid input: unknown sentiment label {0} (expected 0, 1 or 2)")]
    InvalidLabel(i64),

    #[error("Invalid input: confidence {0} outside [0, 1]")]
    InvalidConfidence(f64),

    #[error("Invalid input: cannot read a YYYY-MM-DD day from timestamp {0:?}")]
    InvalidTimestamp(String),

    #[error("Ordering violation: record for {found} follows record for {previous}")]
    OrderingViolation {
        previous: chrono::NaiveDate,
        found: chrono::NaiveDate,
    },

    #[error("Classifier failed: {0}")]
    Classifier(String),
}
