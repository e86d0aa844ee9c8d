//! Structured logging setup.
//!
//! The library only emits `tracing` events. Binaries embedding it call
//! [`init`] once at startup to print them.

use tracing_subscriber::EnvFilter;

/// Installs a global `fmt` subscriber.
///
/// The filter is read from `RUST_LOG`, falling back to `default_filter`
/// (for example `"info"` or `"nearby_core=debug"`).
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init(default_filter: &str) -> Result<(), tracing_subscriber::util::TryInitError> {
    use tracing_subscriber::util::SubscriberInitExt;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .finish()
        .try_init()
}
