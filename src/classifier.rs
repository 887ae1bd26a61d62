//! Seam between raw text and labeled records.
//!
//! The model that produces labels lives outside this crate. Callers hand it in
//! as a [`SentimentClassifier`], either a type of their own or a plain closure.

use crate::error::MetricsError;
use crate::sentiment::{SentimentLabel, SentimentRecord, parse_day_key};

/// Label and confidence reported for one piece of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub label: SentimentLabel,
    pub confidence: f64,
}

/// Anything that can label a single text.
pub trait SentimentClassifier {
    fn classify(&self, text: &str) -> anyhow::Result<Classification>;
}

impl<F> SentimentClassifier for F
where
    F: Fn(&str) -> anyhow::Result<Classification>,
{
    fn classify(&self, text: &str) -> anyhow::Result<Classification> {
        self(text)
    }
}

/// Classifies `(timestamp, text)` pairs into records, keeping their order.
///
/// # Errors
/// * `InvalidTimestamp` if a timestamp has no `YYYY-MM-DD` prefix.
/// * `Classifier` if the classifier fails on any text.
/// * `InvalidConfidence` if the classifier reports a confidence outside `[0, 1]`.
pub fn label_texts<'a, P, C>(posts: P, classifier: &C) -> Result<Vec<SentimentRecord>, MetricsError>
where
    P: IntoIterator<Item = (&'a str, &'a str)>,
    C: SentimentClassifier + ?Sized,
{
    posts
        .into_iter()
        .map(|(timestamp, text)| {
            let date = parse_day_key(timestamp)?;
            let classification = classifier
                .classify(text)
                .map_err(|e| MetricsError::Classifier(format!("{e:#}")))?;
            SentimentRecord::new(date, classification.label, classification.confidence)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedLabel(SentimentLabel);

    impl SentimentClassifier for FixedLabel {
        fn classify(&self, _text: &str) -> anyhow::Result<Classification> {
            Ok(Classification { label: self.0, confidence: 0.5 })
        }
    }

    #[test]
    fn trait_objects_label_every_post() {
        let classifier: Box<dyn SentimentClassifier> = Box::new(FixedLabel(SentimentLabel::Negative));
        let records = label_texts(
            [("2022-09-01 10:00", "a"), ("2022-09-02 10:00", "b")],
            classifier.as_ref(),
        )
        .unwrap();

        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.label() == SentimentLabel::Negative));
        assert_eq!(records[1].date(), chrono::NaiveDate::from_ymd_opt(2022, 9, 2).unwrap());
    }

    #[test]
    fn bad_confidence_from_classifier_is_rejected() {
        let classifier = |_: &str| -> anyhow::Result<Classification> {
            Ok(Classification { label: SentimentLabel::Neutral, confidence: 1.2 })
        };
        let err = label_texts([("2022-09-01", "x")], &classifier).unwrap_err();
        assert_eq!(err, MetricsError::InvalidConfidence(1.2));
    }
}
