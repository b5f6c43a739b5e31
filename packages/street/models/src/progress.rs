//! Progress reports from index builds and sector matching.
//!
//! Library crates only ever say how much work there is, how much is done,
//! and how it ended. Rendering is left to the binary.

use std::sync::Arc;

/// Receives progress from a long-running build or match.
///
/// Shared with blocking worker tasks through an `Arc`, hence `Send + Sync`.
pub trait ProgressCallback: Send + Sync {
    /// Number of units the operation will process, once known.
    fn set_total(&self, total: u64);

    /// `delta` more units are done.
    fn inc(&self, delta: u64);

    /// Replaces the label shown next to the indicator.
    fn set_message(&self, msg: String);

    /// The operation completed; `msg` summarizes the result.
    fn finish(&self, msg: String);
}

/// Discards every report.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}

#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
