//! Tracing setup for test runs.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "instance_probe=info,warn";

/// Install a compact fmt subscriber filtered by `RUST_LOG`.
///
/// Output goes through the test writer so `cargo test` captures it. Calling
/// this more than once is harmless; later calls leave the first subscriber in
/// place.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_test_writer()
                .with_target(true)
                .with_thread_ids(false)
                .compact(),
        )
        .try_init();
}
