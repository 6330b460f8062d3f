//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
///
/// `quiet` drops the per-tick status lines; each `-v` raises the detail.
#[must_use]
pub fn default_filter(verbose: u8, quiet: bool) -> &'static str {
    match (quiet, verbose) {
        (true, _) => "rotary_servo=info,warn",
        (false, 0) => "rotary_servo=debug,info",
        (false, 1) => "rotary_servo=trace,debug",
        (false, _) => "trace",
    }
}

/// Install the global fmt subscriber. `RUST_LOG` takes precedence.
pub fn init(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose, quiet)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
