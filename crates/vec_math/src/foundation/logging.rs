//! Logging utilities
//!
//! The library only logs through the `log` facade. Binaries decide whether a
//! logger is installed; tests install a capture-friendly one.

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize logging for unit tests
///
/// Safe to call from every test: only the first call installs the logger.
pub fn init_for_tests() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Debug)
        .try_init();
}
