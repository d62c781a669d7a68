//! Tracing subscriber setup for the binary.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a global `fmt` subscriber filtered by `RUST_LOG`.
///
/// An unset or unparseable `RUST_LOG` falls back to `info`.
pub fn init() {
    let default_level = LevelFilter::INFO;
    let filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) => EnvFilter::try_new(&directives).unwrap_or_else(|err| {
            eprintln!(
                "invalid {}, falling back to level '{default_level}': {err}",
                EnvFilter::DEFAULT_ENV
            );
            EnvFilter::new(default_level.to_string())
        }),
        Err(_) => EnvFilter::new(default_level.to_string()),
    };

    let result = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .try_init();
    if let Err(err) = result {
        eprintln!("tracing subscriber already installed: {err}");
    }
}
