//! CLI command implementations for alarmq.
//!
//! - [`run`] - Execute driver scenarios against the alarm queue
//! - [`check`] - Validate a scenario config file
//! - [`scenarios`] - The concurrent producer/consumer drivers

pub mod check;
pub mod run;
pub mod scenarios;

/// Initialize stdout logging.
///
/// Honours `RUST_LOG`, defaulting to `info`. With `json` set, events are
/// emitted as JSON lines.
pub fn init_logging(json: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // try_init: a subscriber may already be installed (tests, embedding)
    let registry = tracing_subscriber::registry().with(filter);
    let _ = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer()).try_init()
    };
}
