//! Progress reporting trait for long-running imports.
//!
//! Decouples the ingestion pipeline's human-readable progress lines from
//! any rendering backend. The route layer forwards lines to the log; CLI
//! callers can render a bar; tests capture them.

use std::sync::Arc;

/// Sink for progress updates from a long-running import.
///
/// Implementations must be `Send + Sync` so they can cross spawned tokio
/// tasks behind an `Arc`.
pub trait ProgressCallback: Send + Sync {
    /// Set the total expected units of work (locations, here).
    fn set_total(&self, total: u64);

    /// Advance progress by `delta` units.
    fn inc(&self, delta: u64);

    /// Emit a human-readable progress line.
    fn message(&self, msg: String);

    /// Mark the import as complete with a final summary line.
    fn finish(&self, msg: String);
}

/// A no-op [`ProgressCallback`] that silently ignores all updates.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}

/// Returns a shared [`NullProgress`] instance for convenient use.
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}

/// A [`ProgressCallback`] that forwards every line to the `log` facade.
///
/// Used by the administrative import endpoint, where there is no terminal
/// to draw on but operators still want to follow along.
pub struct LogProgress;

impl ProgressCallback for LogProgress {
    fn set_total(&self, total: u64) {
        log::info!("Import started: {total} locations queued");
    }

    fn inc(&self, _delta: u64) {}

    fn message(&self, msg: String) {
        log::info!("{msg}");
    }

    fn finish(&self, msg: String) {
        log::info!("{msg}");
    }
}
