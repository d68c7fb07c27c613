//! Crate-standard logging setup.

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// `level` is any `EnvFilter` directive (`info`, `chp_gen=debug`, ...); a `RUST_LOG` environment
/// variable takes precedence over it. Calling this twice is harmless: the second subscriber is
/// simply not installed.
pub fn setup(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .try_init();

    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
