//! Logging setup shared by the console binaries.

/// Initialize process-wide logging.
///
/// Safe to call multiple times; later calls are no-ops.
pub fn init() {
    let _ = tracing::init();
}

/// Subscriber configuration (filter, format, writer).
pub mod tracing;
