//! Structured logging setup.
//!
//! The engine emits [`tracing`] events with structured fields (`order_id`,
//! `trade_id`, `symbol`) at submission, cancellation, trade execution, and
//! BBO-change points. This module only wires up a default subscriber for
//! binaries embedding the engine directly; library consumers with their
//! own `tracing` subscriber can skip it entirely.

use tracing_subscriber::EnvFilter;

/// Install a default `tracing_subscriber` layered on `RUST_LOG`, falling
/// back to `info` when the variable is unset or invalid.
///
/// Safe to call more than once; subsequent calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
