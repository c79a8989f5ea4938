use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "bike_tracker=info";

/// Console logging; `RUST_LOG` overrides the default filter.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    // stdout carries command output (JSON exports, rendered HTML)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
