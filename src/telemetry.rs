//! Tracing bootstrap for binaries and test harnesses.
//!
//! The engine itself only emits `tracing` records (and decision events,
//! see [`crate::decision`]); installing a subscriber is the embedder's
//! choice. This helper wires the conventional fmt + env-filter stack.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a fmt subscriber filtered by `RUST_LOG`, defaulting to
/// `error,lexweave=info`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("error,lexweave=info"))
        .expect("default env filter is valid");

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
