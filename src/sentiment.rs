use crate::error::MetricsError;

/// Sentiment class assigned to a single message by the upstream classifier.
///
/// The ordinal is the integer the classifier writes to the `SentimentLabel`
/// column and doubles as the weight used by the sum scoring variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// All labels in ordinal order.
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Neutral,
        SentimentLabel::Negative,
    ];

    /// Integer code of the label as written by the classifier.
    ///
    /// # Returns
    /// * `u8` - `0` for positive, `1` for neutral, `2` for negative.
    pub fn ordinal(self) -> u8 {
        match self {
            SentimentLabel::Positive => 0,
            SentimentLabel::Neutral => 1,
            SentimentLabel::Negative => 2,
        }
    }
}

impl TryFrom<i64> for SentimentLabel {
    type Error = MetricsError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SentimentLabel::Positive),
            1 => Ok(SentimentLabel::Neutral),
            2 => Ok(SentimentLabel::Negative),
            other => Err(MetricsError::InvalidLabel(other)),
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
        };
        f.write_str(name)
    }
}

/// One classified message, reduced to the day it was posted on.
///
/// Fields are private so every record goes through [`SentimentRecord::new`]
/// and carries a confidence inside `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentRecord {
    date: chrono::NaiveDate,
    label: SentimentLabel,
    confidence: f64,
}

impl SentimentRecord {
    /// Builds a record, rejecting confidences outside `[0, 1]` (NaN included).
    pub fn new(
        date: chrono::NaiveDate,
        label: SentimentLabel,
        confidence: f64,
    ) -> Result<Self, MetricsError> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(MetricsError::InvalidConfidence(confidence));
        }
        Ok(SentimentRecord { date, label, confidence })
    }

    pub fn date(&self) -> chrono::NaiveDate {
        self.date
    }

    pub fn label(&self) -> SentimentLabel {
        self.label
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Builds a record from a raw `YYYY-MM-DD...` timestamp and integer label.
    ///
    /// Only the first 10 characters of `timestamp` are read, so time-of-day and
    /// offset suffixes are ignored for bucketing.
    ///
    /// # Errors
    /// * `InvalidTimestamp` if the day prefix is missing or not a calendar date.
    /// * `InvalidLabel` / `InvalidConfidence` for out-of-range values.
    pub fn from_raw(timestamp: &str, label: i64, confidence: f64) -> Result<Self, MetricsError> {
        let date = parse_day_key(timestamp)?;
        let label = SentimentLabel::try_from(label)?;
        SentimentRecord::new(date, label, confidence)
    }
}

/// Extracts the calendar day from the first 10 characters of a timestamp.
pub fn parse_day_key(timestamp: &str) -> Result<chrono::NaiveDate, MetricsError> {
    let key = timestamp
        .get(..10)
        .ok_or_else(|| MetricsError::InvalidTimestamp(timestamp.to_string()))?;
    chrono::NaiveDate::parse_from_str(key, "%Y-%m-%d")
        .map_err(|_| MetricsError::InvalidTimestamp(timestamp.to_string()))
}

/// Confidence sum and record count for one label.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LabelTally {
    pub confidence_sum: f64,
    pub count: u64,
}

/// Per-label tallies for a single calendar day.
///
/// All three labels are always present, starting at zero, so the counts
/// across labels add up to the number of records folded in.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DayBucket {
    tallies: [LabelTally; 3],
}

impl DayBucket {
    /// Creates a bucket with every label at zero.
    pub fn new() -> Self {
        DayBucket::default()
    }

    /// Builds a bucket from explicit `(count, confidence_sum)` pairs.
    pub fn from_tallies(positive: (u64, f64), neutral: (u64, f64), negative: (u64, f64)) -> Self {
        let tally = |(count, confidence_sum): (u64, f64)| LabelTally { confidence_sum, count };
        DayBucket {
            tallies: [tally(positive), tally(neutral), tally(negative)],
        }
    }

    /// Folds one record into the tally of its label.
    ///
    /// # Arguments
    /// * `record` - Record to count; its confidence is added to the label's sum.
    pub fn add(&mut self, record: &SentimentRecord) {
        let tally = &mut self.tallies[record.label.ordinal() as usize];
        tally.confidence_sum += record.confidence;
        tally.count += 1;
    }

    /// Returns the confidence sum and count recorded for `label`.
    pub fn tally(&self, label: SentimentLabel) -> LabelTally {
        self.tallies[label.ordinal() as usize]
    }

    /// Number of records carrying `label`.
    pub fn count(&self, label: SentimentLabel) -> u64 {
        self.tally(label).count
    }

    pub fn confidence_sum(&self, label: SentimentLabel) -> f64 {
        self.tally(label).confidence_sum
    }

    /// Number of records folded in, across all labels.
    ///
    /// # Returns
    /// * `u64` - Sum of the three label counts.
    pub fn total(&self) -> u64 {
        self.tallies.iter().map(|t| t.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}
