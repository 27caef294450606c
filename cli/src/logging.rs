//! Logging setup for the REPL.
//!
//! Logs go to stderr so they do not interleave with command output. Set
//! `DEBUG_LOGGING=1` to enable debug output for skirmish crates.

use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

pub fn init() {
    let debug_logging = std::env::var("DEBUG_LOGGING").is_ok();

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    let filter_directive = if debug_logging {
        // debug for skirmish crates, warn for dependencies
        "warn,skirmish_core=debug,skirmish_cli=debug"
    } else {
        "warn,skirmish_core=info"
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(EnvFilter::new(filter_directive))
        .init();

    tracing::debug!(debug_logging, "Skirmish logging initialized");
}
