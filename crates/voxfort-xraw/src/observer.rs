//! Collaborator interface for progress and completion reporting during encodes.

use std::path::Path;

/// Receives callbacks from a running XRAW encode.
///
/// Both callbacks are invoked synchronously from the encode loop.
/// Implementations driving a UI are responsible for marshalling to their own
/// context; the encoder itself has no threading.
pub trait EncodeObserver {
    /// Called once per completed z-layer with a completion fraction scaled to
    /// a fixed maximum of 2048 units, and a status message naming the
    /// destination.
    fn progress(&mut self, units: u32, message: &str);

    /// Called exactly once after a successful save: destination path, number
    /// of unique palette colors, and total non-empty voxels written.
    fn finished(&mut self, path: &Path, unique_colors: usize, voxel_count: u64);
}

/// `()` is the observer for callers that don't report progress.
impl EncodeObserver for () {
    fn progress(&mut self, _units: u32, _message: &str) {}

    fn finished(&mut self, _path: &Path, _unique_colors: usize, _voxel_count: u64) {}
}

/// Observer that forwards callbacks to `tracing` events: per-layer progress
/// at debug level, the end-of-run summary at info level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl EncodeObserver for TracingObserver {
    fn progress(&mut self, units: u32, message: &str) {
        tracing::debug!(units, "{message}");
    }

    fn finished(&mut self, path: &Path, unique_colors: usize, voxel_count: u64) {
        tracing::info!(
            unique_colors,
            voxel_count,
            "saved {}",
            path.display()
        );
    }
}
