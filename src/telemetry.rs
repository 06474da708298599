//! Tracing subscriber setup for hosts that do not install their own.

use crate::config::Config;
use tracing_subscriber::EnvFilter;

/// Installs a global `fmt` subscriber.
///
/// `RUST_LOG` wins when set. Otherwise library logs are shown at `debug` when
/// `config.debug_logging` is on and at `warn` when it is off. Does nothing if
/// a global subscriber is already installed.
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config)));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = if config.log_format == "json" {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if installed.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

fn default_directive(config: &Config) -> &'static str {
    if config.debug_logging {
        "linklab=debug"
    } else {
        "linklab=warn"
    }
}
