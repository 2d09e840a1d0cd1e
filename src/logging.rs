use tracing_subscriber::EnvFilter;

/// Diagnostics go to stderr. `RUST_LOG` wins over `--debug`.
pub fn init(debug: bool) {
    let default_directive = if debug { "memewall=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
