use std::sync::Once;

use tracing_subscriber::EnvFilter;

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVE: &str = "finans=info";

/// Initializes the global tracing subscriber with sensible defaults.
///
/// `RUST_LOG` is used as-is when set and valid; otherwise the `finans`
/// targets log at `info`. A subscriber installed elsewhere is left in place.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let filter = env_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref());
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    });
}

fn env_filter(configured: Option<&str>) -> EnvFilter {
    configured
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}
