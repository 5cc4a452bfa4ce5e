//! Logging setup using `tracing-subscriber`.

use tracing_subscriber::{EnvFilter, fmt};

/// Install a stderr subscriber.
///
/// `RUST_LOG` takes precedence; otherwise gridcheck targets log at `warn`,
/// or `debug` with `--verbose`.
pub fn init(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("gridcheck={level},gridcheck_cli={level}")));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .without_time()
        .try_init();
}
