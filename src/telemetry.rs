//! `tracing` initialization helper, grounded in the
//! teacher's example binaries' `EnvFilter`/`fmt`/`ansi` subscriber setup.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a global `tracing` subscriber: `RUST_LOG`-driven filtering,
/// falling back to `info,reviewloom=debug` when unset, with ANSI-colored
/// `fmt` output. Idempotent-safe to call more than once in a single
/// process (later calls are no-ops; `try_init` swallows the "already set"
/// error rather than panicking, since test binaries routinely call this
/// from more than one test).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,reviewloom=debug"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_ansi(true))
        .try_init();
}
