use crate::classifier::{self, SentimentClassifier};
use crate::error::MetricsError;
use crate::file_processing::CsvHeader;
use crate::normalize::round_to;
use crate::scoring::ScoringVariant;
use crate::sentiment::{DayBucket, SentimentLabel, SentimentRecord};

/// Summary metrics for one query, written as one row of the metrics CSV.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MetricsRow {
    #[serde(rename = "Query")]
    pub query: String,
    #[serde(rename = "Confidence %")]
    pub confidence_pct: i64,
    #[serde(rename = "# Tweets")]
    pub tweets: u64,
    #[serde(rename = "% Positive")]
    pub positive_pct: f64,
    #[serde(rename = "% Neutral")]
    pub neutral_pct: f64,
    #[serde(rename = "% Negative")]
    pub negative_pct: f64,
    #[serde(rename = "Average Sentiment % OG")]
    pub avg_sentiment_og: f64,
    #[serde(rename = "Average Sentiment % Sum")]
    pub avg_sentiment_sum: f64,
    #[serde(rename = "Average Sentiment % OG With Subtraction of Sentiments")]
    pub avg_sentiment_og_with_subtraction: f64,
}

impl CsvHeader for MetricsRow {
    const HEADERS: &'static [&'static str] = &[
        "Query",
        "Confidence %",
        "# Tweets",
        "% Positive",
        "% Neutral",
        "% Negative",
        "Average Sentiment % OG",
        "Average Sentiment % Sum",
        "Average Sentiment % OG With Subtraction of Sentiments",
    ];
}

/// Scores of a single day under every variant.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DailyScores {
    #[serde(rename = "Query")]
    pub query: String,
    #[serde(rename = "Date")]
    pub date: chrono::NaiveDate,
    #[serde(rename = "# Tweets")]
    pub tweets: u64,
    #[serde(rename = "Sentiment % OG")]
    pub og: f64,
    #[serde(rename = "Sentiment % Sum")]
    pub sum: f64,
    #[serde(rename = "Sentiment % OG With Subtraction of Sentiments")]
    pub og_with_subtraction: f64,
}

impl CsvHeader for DailyScores {
    const HEADERS: &'static [&'static str] = &[
        "Query",
        "Date",
        "# Tweets",
        "Sentiment % OG",
        "Sentiment % Sum",
        "Sentiment % OG With Subtraction of Sentiments",
    ];
}

/// Summary row plus the per-day scores it was averaged from.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsReport {
    pub row: MetricsRow,
    pub days: Vec<DailyScores>,
}

/// A finished calendar day and everything recorded on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletedDay {
    pub date: chrono::NaiveDate,
    pub bucket: DayBucket,
}

enum SegmentState {
    Idle,
    Accumulating {
        day: chrono::NaiveDate,
        bucket: DayBucket,
    },
    Finished,
}

/// Splits a date-ordered record stream into one [`CompletedDay`] per calendar day.
///
/// While the day stays the same, records are folded into the current bucket.
/// A record for a later day emits the finished bucket and starts a new one;
/// running out of input emits the last bucket, however small. A record for an
/// earlier day yields `OrderingViolation` and ends the stream.
pub struct DaySegments<I> {
    records: I,
    state: SegmentState,
}

impl<I> DaySegments<I>
where
    I: Iterator<Item = SentimentRecord>,
{
    pub fn new(records: I) -> Self {
        DaySegments {
            records,
            state: SegmentState::Idle,
        }
    }
}

fn start_day(record: &SentimentRecord) -> SegmentState {
    let mut bucket = DayBucket::new();
    bucket.add(record);
    SegmentState::Accumulating {
        day: record.date(),
        bucket,
    }
}

impl<I> Iterator for DaySegments<I>
where
    I: Iterator<Item = SentimentRecord>,
{
    type Item = Result<CompletedDay, MetricsError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (day, mut bucket) = match std::mem::replace(&mut self.state, SegmentState::Finished) {
                SegmentState::Finished => return None,
                SegmentState::Idle => {
                    let record = self.records.next()?;
                    self.state = start_day(&record);
                    continue;
                }
                SegmentState::Accumulating { day, bucket } => (day, bucket),
            };

            match self.records.next() {
                None => return Some(Ok(CompletedDay { date: day, bucket })),
                Some(record) if record.date() == day => {
                    bucket.add(&record);
                    self.state = SegmentState::Accumulating { day, bucket };
                }
                Some(record) if record.date() < day => {
                    return Some(Err(MetricsError::OrderingViolation {
                        previous: day,
                        found: record.date(),
                    }));
                }
                Some(record) => {
                    self.state = start_day(&record);
                    return Some(Ok(CompletedDay { date: day, bucket }));
                }
            }
        }
    }
}

fn percent(count: u64, total: u64) -> f64 {
    round_to(count as f64 / total as f64 * 100.0, 1)
}

/// Compiles a query's records into its summary row.
///
/// See [`compile_detailed`] for the ordering precondition and errors.
pub fn compile<R>(query: &str, records: R) -> Result<MetricsRow, MetricsError>
where
    R: IntoIterator<Item = SentimentRecord>,
{
    compile_detailed(query, records).map(|report| report.row)
}

/// Compiles a query's records into its summary row and per-day scores.
///
/// Records must be sorted by date, ascending. Each calendar day is scored under
/// every [`ScoringVariant`] and the moving averages are the mean of those daily
/// scores. Label percentages and the confidence mean are taken over all records,
/// not per day.
///
/// # Arguments
/// * `query` - Name of the query the records were collected for.
/// * `records` - Date-ordered labeled records.
///
/// # Returns
/// * `Result<MetricsReport, MetricsError>` - The summary row with its daily breakdown.
///
/// # Errors
/// * `EmptyInput` if `records` is empty.
/// * `OrderingViolation` if a record's date precedes the one before it.
pub fn compile_detailed<R>(query: &str, records: R) -> Result<MetricsReport, MetricsError>
where
    R: IntoIterator<Item = SentimentRecord>,
{
    let mut overall = DayBucket::new();
    let mut moving_sums = [0.0f64; 3];
    let mut days = Vec::new();

    let segments = DaySegments::new(records.into_iter().inspect(|record| overall.add(record)));
    for completed in segments {
        let completed = completed?;
        let mut scores = [0.0f64; 3];
        for (slot, variant) in ScoringVariant::ALL.iter().enumerate() {
            scores[slot] = variant.score(&completed.bucket)?;
            moving_sums[slot] += scores[slot];
        }
        tracing::debug!(
            query,
            date = %completed.date,
            records = completed.bucket.total(),
            og = scores[0],
            sum = scores[1],
            og_with_subtraction = scores[2],
            "scored day"
        );
        days.push(DailyScores {
            query: query.to_string(),
            date: completed.date,
            tweets: completed.bucket.total(),
            og: scores[0],
            sum: scores[1],
            og_with_subtraction: scores[2],
        });
    }

    let tweets = overall.total();
    if tweets == 0 {
        return Err(MetricsError::EmptyInput);
    }

    let confidence_sum: f64 = SentimentLabel::ALL
        .iter()
        .map(|&label| overall.confidence_sum(label))
        .sum();
    let day_count = days.len() as f64;
    let moving_average = |slot: usize| round_to(moving_sums[slot] / day_count, 1);

    let row = MetricsRow {
        query: query.to_string(),
        confidence_pct: round_to(confidence_sum / tweets as f64 * 100.0, 0) as i64,
        tweets,
        positive_pct: percent(overall.count(SentimentLabel::Positive), tweets),
        neutral_pct: percent(overall.count(SentimentLabel::Neutral), tweets),
        negative_pct: percent(overall.count(SentimentLabel::Negative), tweets),
        avg_sentiment_og: moving_average(0),
        avg_sentiment_sum: moving_average(1),
        avg_sentiment_og_with_subtraction: moving_average(2),
    };

    tracing::debug!(query, tweets, days = days.len(), "compiled metrics");
    Ok(MetricsReport { row, days })
}

/// Classifies raw posts and compiles the resulting records.
///
/// `posts` yields `(timestamp, text)` pairs in timestamp order; every text is
/// passed to `classifier` before any metrics are computed.
///
/// # Errors
/// * Any error from [`classifier::label_texts`] or [`compile_detailed`].
pub fn compile_texts<'a, P, C>(
    query: &str,
    posts: P,
    classifier: &C,
) -> Result<MetricsReport, MetricsError>
where
    P: IntoIterator<Item = (&'a str, &'a str)>,
    C: SentimentClassifier + ?Sized,
{
    let records = classifier::label_texts(posts, classifier)?;
    compile_detailed(query, records)
}
