use crate::csv_processor;
use crate::metrics;

use rayon::prelude::*;

/// Result of processing a batch of labeled files.
///
/// `reports` keeps the input order of the files that succeeded; a failed file
/// contributes no row and is listed in `failures` instead.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub reports: Vec<metrics::MetricsReport>,
    pub failures: Vec<(std::path::PathBuf, anyhow::Error)>,
}

impl BatchOutcome {
    pub fn rows(&self) -> Vec<metrics::MetricsRow> {
        self.reports.iter().map(|report| report.row.clone()).collect()
    }

    pub fn daily_scores(&self) -> Vec<metrics::DailyScores> {
        self.reports
            .iter()
            .flat_map(|report| report.days.iter().cloned())
            .collect()
    }
}

/// Builds the progress bar shown while files are processed.
fn progress_bar(len: usize, visible: bool) -> anyhow::Result<indicatif::ProgressBar> {
    if !visible {
        return Ok(indicatif::ProgressBar::hidden());
    }
    let pb = indicatif::ProgressBar::new(len as u64);
    pb.set_style(
        indicatif::ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({eta})",
        )?
        .progress_chars("#>-"),
    );
    Ok(pb)
}

/// Compiles metrics for every file, one rayon task per file.
///
/// Runs on the current rayon pool, so wrapping the call in
/// `ThreadPool::install` limits the number of threads used.
///
/// # Arguments
/// * `files` - Labeled CSV files to process.
/// * `show_progress` - Draw a progress bar on stderr.
///
/// # Returns
/// * `anyhow::Result<BatchOutcome>` - Per-file reports and failures.
///
/// # Errors
/// * Only if the progress bar template is invalid; per-file errors are
///   collected in the outcome.
pub fn process_files(files: &[std::path::PathBuf], show_progress: bool) -> anyhow::Result<BatchOutcome> {
    let pb = progress_bar(files.len(), show_progress)?;

    let results = files
        .par_iter()
        .map(|path| {
            tracing::debug!(file = %path.display(), thread = ?std::thread::current().id(), "processing");
            let result = csv_processor::metrics_from_file(path);
            pb.inc(1);
            (path.clone(), result)
        })
        .collect::<Vec<_>>();
    pb.finish_and_clear();

    let mut outcome = BatchOutcome::default();
    for (path, result) in results {
        match result {
            Ok(report) => {
                tracing::info!(
                    file = %path.display(),
                    query = %report.row.query,
                    tweets = report.row.tweets,
                    days = report.days.len(),
                    "compiled metrics"
                );
                outcome.reports.push(report);
            }
            Err(e) => {
                tracing::error!(file = %path.display(), "skipping file: {e:#}");
                outcome.failures.push((path, e));
            }
        }
    }
    anyhow::Ok(outcome)
}
