//! Process-wide tracing/logging setup for binaries and test harnesses.

/// Tracing configuration (filters, layers).
pub mod tracing;

/// Initialize process-wide observability (tracing/logging).
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}
