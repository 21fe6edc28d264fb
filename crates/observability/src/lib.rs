//! Process-wide logging setup shared by the binaries.

/// Install the global tracing subscriber.
///
/// Safe to call more than once; only the first call installs anything.
pub fn init() {
    tracing::init();
}

/// Subscriber construction (filter and JSON formatting).
pub mod tracing;
