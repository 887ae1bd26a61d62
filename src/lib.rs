//! Daily and per-query sentiment metrics from classified social-media posts.
//!
//! Labeled records are bucketed by calendar day, each day is scored under
//! three competing formulas, and the daily scores are averaged into one
//! [`MetricsRow`] per query.

pub mod classifier;
pub mod csv_processor;
pub mod error;
pub mod file_processing;
pub mod metrics;
pub mod normalize;
pub mod progress;
pub mod scoring;
pub mod sentiment;
pub mod utils;

pub use classifier::{Classification, SentimentClassifier};
pub use error::MetricsError;
pub use metrics::{DailyScores, MetricsReport, MetricsRow, compile, compile_detailed, compile_texts};
pub use scoring::ScoringVariant;
pub use sentiment::{DayBucket, SentimentLabel, SentimentRecord};
