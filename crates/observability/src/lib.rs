//! Tracing/logging setup shared by binaries and tests.

/// Initialize process-wide logging.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::LogFormat::Json);
}

/// Subscriber configuration (filters, output format).
pub mod tracing;
