mod cli;

use sentiment_metrics::{file_processing, progress, utils};

/// Main entry point of the application.
///
/// This function orchestrates the entire workflow:
/// 1. Parses command-line arguments and sets up logging.
/// 2. Validates input/output paths and lists the labeled files.
/// 3. Determines the number of threads to use.
/// 4. Compiles one metrics row per file.
/// 5. Writes the metrics CSV and, optionally, the per-day scores CSV.
///
/// # Returns
///
/// * `anyhow::Result<()>` - Success, or an error if any step or any file fails.
fn main() -> anyhow::Result<()> {
    let total_start = std::time::Instant::now();
    let args = cli::Args::parse()?;
    utils::init_tracing("info");
    println!("Start compiling metrics...");

    file_processing::check_path(&args.input)?;
    file_processing::ensure_parent_dir_exist(&args.output)?;
    if let Some(daily) = &args.daily {
        file_processing::ensure_parent_dir_exist(daily)?;
    }
    let files = file_processing::collect_input_files(&args.input, &args.pattern)?;
    println!("📂 Found {} labeled file(s)", files.len());

    let effective_threads = utils::effective_threads(args.threads)?;
    println!("🚀 Using {} thread(s)", effective_threads);

    let show_progress = !args.quiet;
    let outcome = if args.threads.is_some() {
        let local_pool = utils::configure_thread_pool(effective_threads)?;
        local_pool.install(|| progress::process_files(&files, show_progress))?
    } else {
        progress::process_files(&files, show_progress)?
    };

    file_processing::write_csv_rows(&args.output, &outcome.rows(), args.append)?;
    println!("📝 Wrote {} metrics row(s) to {}", outcome.reports.len(), args.output.display());

    if let Some(daily) = &args.daily {
        let days = outcome.daily_scores();
        file_processing::write_csv_rows(daily, &days, args.append)?;
        println!("📝 Wrote {} daily score row(s) to {}", days.len(), daily.display());
    }

    let duration = total_start.elapsed();
    if !outcome.failures.is_empty() {
        return Err(anyhow::anyhow!(
            "{} of {} file(s) failed after {:?} seconds",
            outcome.failures.len(),
            files.len(),
            duration.as_secs_f64()
        ));
    }

    println!("✅ Metrics completed in {:?} seconds", duration.as_secs_f64());
    Ok(())
}
