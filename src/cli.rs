/// Structure representing command-line arguments.
#[derive(Debug)]
pub struct Args {
    pub input: std::path::PathBuf,
    pub output: std::path::PathBuf,
    pub pattern: String,
    pub daily: Option<std::path::PathBuf>,
    pub threads: Option<usize>,
    pub append: bool,
    pub quiet: bool,
}

/// Builds the command-line interface.
fn command() -> clap::Command {
    clap::Command::new("sentiment-metrics")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compile daily and per-query sentiment metrics from labeled CSV files")
        .arg(
            clap::Arg::new("input")
                .short('i')
                .long("input")
                .help("Labeled CSV file, or directory of labeled CSV files")
                .required(true)
                .num_args(1)
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::Arg::new("output")
                .short('o')
                .long("output")
                .help("Path of the metrics CSV to write")
                .required(true)
                .num_args(1)
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::Arg::new("pattern")
                .short('p')
                .long("pattern")
                .help("Only process files whose name contains this text")
                .num_args(1)
                .default_value("Labeled"),
        )
        .arg(
            clap::Arg::new("daily")
                .short('d')
                .long("daily")
                .help("Also write per-day scores to this CSV")
                .num_args(1)
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::Arg::new("threads")
                .short('t')
                .long("threads")
                .help("Number of threads to use (default: all available)")
                .num_args(1)
                .value_parser(clap::builder::ValueParser::new(parse_usize_positive)),
        )
        .arg(
            clap::Arg::new("append")
                .short('a')
                .long("append")
                .help("Append to existing output files instead of overwriting them")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Hide the progress bar")
                .action(clap::ArgAction::SetTrue),
        )
}

impl Args {
    /// Parses the process arguments, exiting with usage on invalid input.
    pub fn parse() -> anyhow::Result<Self> {
        Self::from_matches(&command().get_matches())
    }

    fn from_matches(matches: &clap::ArgMatches) -> anyhow::Result<Self> {
        let path = |id: &str| matches.get_one::<std::path::PathBuf>(id).cloned();
        Ok(Args {
            input: path("input").ok_or_else(|| anyhow::anyhow!("--input is required"))?,
            output: path("output").ok_or_else(|| anyhow::anyhow!("--output is required"))?,
            pattern: matches
                .get_one::<String>("pattern")
                .cloned()
                .unwrap_or_default(),
            daily: path("daily"),
            threads: matches.get_one::<usize>("threads").cloned(),
            append: matches.get_flag("append"),
            quiet: matches.get_flag("quiet"),
        })
    }
}

/// Validates that the number of threads is a positive integer.
///
/// # Arguments
/// * `s` - String representation of the number of threads.
///
/// # Returns
/// * `Result<usize>` - Validated number of threads.
fn parse_usize_positive(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("Must be a positive integer".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(format!("Not a valid number: {}", e)),
    }
}
