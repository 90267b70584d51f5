use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "chatter=info,chatter_sync=info";

/// `RUST_LOG` wins, then `CHATTER_LOG`, then the default. Logs go to stderr so
/// they never interleave with the rendered chat on stdout.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_from_env("CHATTER_LOG"))
        .unwrap_or_else(|_| DEFAULT_FILTER.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
