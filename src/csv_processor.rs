use anyhow::Context;

use crate::metrics;
use crate::sentiment::SentimentRecord;

/// Represents a single row of a labeled input CSV.
///
/// Only the three columns below are read; any other columns the labeling
/// step left in the file (text, user, etc.) are ignored.
#[derive(Debug, serde::Deserialize)]
pub struct CsvRecord {
    #[serde(rename = "Timestamp")]
    timestamp: String,
    #[serde(rename = "SentimentLabel")]
    label: i64,
    #[serde(rename = "SentimentConfidence")]
    confidence: f64,
}

/// Reads every row of a labeled CSV into sentiment records, in file order.
///
/// # Arguments
/// * `reader` - CSV reader positioned before the header row.
///
/// # Returns
/// * `anyhow::Result<Vec<SentimentRecord>>` - Parsed records or the first bad row.
///
/// # Errors
/// * If a row cannot be deserialized.
/// * If a row carries an invalid timestamp, label or confidence.
pub fn read_records<R: std::io::Read>(
    reader: &mut csv::Reader<R>,
) -> anyhow::Result<Vec<SentimentRecord>> {
    let mut records = Vec::new();
    for (row, result) in reader.deserialize::<CsvRecord>().enumerate() {
        // header is line 1
        let line = row + 2;
        let record = result.with_context(|| format!("Failed to parse CSV line {line}"))?;
        let record = SentimentRecord::from_raw(&record.timestamp, record.label, record.confidence)
            .with_context(|| format!("Invalid record on CSV line {line}"))?;
        records.push(record);
    }
    anyhow::Ok(records)
}

/// Derives the query name from a labeled file's name.
///
/// Collected files are named `<query><start date>-<end date>...`, so the query
/// is everything before the first `"20"`. Names without a date stamp fall back
/// to the file stem.
///
/// # Examples
///
/// ```
/// use sentiment_metrics::csv_processor::query_from_path;
///
/// let query = query_from_path("data/$AAPL20220901-20221001 Labeled.csv").unwrap();
/// assert_eq!(query, "$AAPL");
/// ```
pub fn query_from_path<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<String> {
    let path = path.as_ref();
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow::anyhow!("Path has no UTF-8 file name: {}", path.display()))?;

    match file_name.find("20") {
        Some(end) => Ok(file_name[..end].to_string()),
        None => path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("Path has no UTF-8 file stem: {}", path.display())),
    }
}

/// Reads a labeled CSV file and compiles its metrics.
///
/// This function:
/// 1. Derives the query name from the file name.
/// 2. Reads all rows into sentiment records.
/// 3. Compiles the summary row and per-day scores.
///
/// # Arguments
/// * `path` - Path to the labeled CSV file.
///
/// # Returns
/// * `anyhow::Result<metrics::MetricsReport>` - Metrics for the file or an error.
///
/// # Errors
/// * If the file cannot be opened or parsed.
/// * If compilation fails (empty file, out-of-order days).
pub fn metrics_from_file<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<metrics::MetricsReport> {
    let path = path.as_ref();
    let query = query_from_path(path)?;

    let input_file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(input_file);
    let records = read_records(&mut reader).with_context(|| format!("Failed to read {}", path.display()))?;
    tracing::debug!(file = %path.display(), query = %query, records = records.len(), "read labeled file");

    let report = metrics::compile_detailed(&query, records)
        .with_context(|| format!("Failed to compile metrics for {}", path.display()))?;
    anyhow::Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MetricsError;
    use crate::sentiment::SentimentLabel;

    fn reader(data: &str) -> csv::Reader<&[u8]> {
        csv::ReaderBuilder::new().has_headers(true).from_reader(data.as_bytes())
    }

    #[test]
    fn reads_required_columns_and_ignores_others() {
        let data = "\
Timestamp,Text,SentimentLabel,SentimentConfidence
2022-09-01 14:02:11+00:00,great quarter,0,0.91
2022-09-02 09:15:00+00:00,meh,1,0.55
";
        let records = read_records(&mut reader(data)).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].label(), SentimentLabel::Positive);
        assert_eq!(records[1].label(), SentimentLabel::Neutral);
        assert_eq!(records[1].date(), chrono::NaiveDate::from_ymd_opt(2022, 9, 2).unwrap());
    }

    #[test]
    fn bad_label_reports_line_number() {
        let data = "\
Timestamp,SentimentLabel,SentimentConfidence
2022-09-01,0,0.9
2022-09-01,7,0.9
";
        let err = read_records(&mut reader(data)).unwrap_err();
        assert!(err.to_string().contains("line 3"), "{err}");
        assert_eq!(err.downcast_ref::<MetricsError>(), Some(&MetricsError::InvalidLabel(7)));
    }

    #[test]
    fn missing_column_is_an_error() {
        let data = "Timestamp,SentimentLabel\n2022-09-01,0\n";
        assert!(read_records(&mut reader(data)).is_err());
    }

    #[test]
    fn query_is_prefix_before_date_stamp() {
        assert_eq!(query_from_path("/tmp/$TSLA20220901-20221001_Labeled.csv").unwrap(), "$TSLA");
        assert_eq!(query_from_path("Apple Inc 2022 Labeled.csv").unwrap(), "Apple Inc ");
        assert_eq!(query_from_path("/tmp/nvidia_Labeled.csv").unwrap(), "nvidia_Labeled");
    }
}
