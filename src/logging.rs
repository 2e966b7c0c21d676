//! Tracing subscriber setup for the Authgate binary
//!
//! Logs go to stderr so that `verify` output on stdout stays machine
//! readable.

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is unset
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "authgate=debug"
    } else {
        "authgate=info"
    }
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `verbose`. With `json` set, events are
/// written as JSON lines including the current span.
///
/// # Errors
///
/// Returns an error if a subscriber was already installed.
pub fn init_logging(verbose: bool, json: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter(verbose)))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }

    Ok(())
}
