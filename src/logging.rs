//! Log output for hosts that do not install their own subscriber

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install a stderr subscriber filtered by `RUST_LOG` (default `info`)
///
/// Safe to call more than once. Leaves an already installed global
/// subscriber in place.
pub fn init() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(false)
            .with_level(true)
            .try_init();
    });
}
