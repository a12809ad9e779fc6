use tracing_subscriber::EnvFilter;

/// Initialize the process-wide tracing subscriber.
///
/// `RUST_LOG` overrides the `--log-level` flag when set. Events go to
/// stderr; subcommand output owns stdout.
pub fn init(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
