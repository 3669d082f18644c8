//! `tracing-subscriber` setup.
//!
//! Comparisons log under the `simval::compare` target at `info`, so
//! `RUST_LOG=simval::compare=info` shows the audit lines alone.

use tracing::Level;
use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt};

/// Install a global fmt subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `level` is used. Returns `false`
/// when a subscriber was already installed, which is not an error.
pub fn init_logging(level: Level) -> bool {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();
    fmt().with_env_filter(filter).with_target(true).try_init().is_ok()
}

/// Like [`init_logging`] at `debug`, writing through the libtest capture.
pub fn init_test_logging() -> bool {
    let filter =
        EnvFilter::builder().with_default_directive(LevelFilter::DEBUG.into()).from_env_lossy();
    fmt().with_env_filter(filter).with_test_writer().try_init().is_ok()
}
