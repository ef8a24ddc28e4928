//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the process, filtered by `RUST_LOG` (default `info`).
///
/// Safe to call multiple times: when a global subscriber is already
/// installed the new one is dropped and the existing one keeps logging.
/// Returns whether this call installed the subscriber.
pub fn init(json: bool) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    match installed {
        Ok(()) => true,
        Err(err) => {
            tracing::debug!("keeping existing tracing subscriber: {}", err);
            false
        }
    }
}
