/// Configures a custom Rayon thread pool with specified size.
///
/// Lets `--threads` bound the parallelism of one run without touching the
/// global Rayon pool.
///
/// # Arguments
/// * `num_threads` - Desired number of threads for the pool.
///
/// # Returns
/// * `Result<ThreadPool>` - Created thread pool or an error if creation fails.
pub fn configure_thread_pool(num_threads: usize) -> anyhow::Result<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build thread pool: {}", e))
}

/// Resolves the number of worker threads for a run.
///
/// A requested count above the number of CPUs is capped with a warning; no
/// request means the global Rayon pool size.
///
/// # Arguments
/// * `requested` - Value of `--threads`, if given.
///
/// # Returns
/// * `anyhow::Result<usize>` - Thread count to use.
///
/// # Errors
/// * If the requested count is zero.
pub fn effective_threads(requested: Option<usize>) -> anyhow::Result<usize> {
    match requested {
        Some(n) if n > 0 => {
            let max_threads = num_cpus::get();
            if n > max_threads {
                tracing::warn!("Limiting thread count to {} (max available)", max_threads);
                Ok(max_threads)
            } else {
                Ok(n)
            }
        }
        Some(_) => Err(anyhow::anyhow!("Number of threads must be a positive integer")),
        None => Ok(rayon::current_num_threads()),
    }
}

/// Installs the global tracing subscriber.
///
/// The filter comes from `RUST_LOG`, falling back to `default_level`. Logs go to stderr.
pub fn init_tracing(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    // a subscriber already set by the host process or an earlier call stays in place
    if let Err(e) = installed {
        tracing::debug!("tracing subscriber already installed: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thread_count_is_capped_and_validated() {
        assert_eq!(effective_threads(Some(1)).unwrap(), 1);
        assert_eq!(effective_threads(Some(usize::MAX)).unwrap(), num_cpus::get());
        assert!(effective_threads(Some(0)).is_err());
        assert!(effective_threads(None).unwrap() >= 1);
    }

    #[test]
    fn thread_pool_has_requested_size() {
        let pool = configure_thread_pool(3).unwrap();
        assert_eq!(pool.current_num_threads(), 3);
    }

    #[test]
    fn repeated_tracing_init_keeps_first_subscriber() {
        init_tracing("info");
        init_tracing("debug");
        tracing::info!("still logging after a second init");
    }
}
