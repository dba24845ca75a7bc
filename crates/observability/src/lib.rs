//! Logging setup for the stocktake binaries and test harnesses.

pub mod tracing;

pub use crate::tracing::LogFormat;

/// Install the global subscriber using `STOCKTAKE_LOG_FORMAT` and `RUST_LOG`.
///
/// Repeated calls keep the first subscriber.
pub fn init() {
    tracing::init(LogFormat::from_env());
}
