//! Scheduler configuration.

use crate::command::DEFAULT_BACKGROUND_DEPTH_THRESHOLD;

/// Configuration for a [`FrameGraph`](crate::graph::FrameGraph).
///
/// The defaults suit regular scenes and only need changing for tooling or
/// unusual content.
///
/// ```
/// use framepass_graphics::SchedulerConfig;
///
/// let config = SchedulerConfig::new()
///     .with_background_depth_threshold(10_000.0)
///     .with_log_passes(true);
/// assert_eq!(config.background_depth_threshold, 10_000.0);
/// assert!(config.merge_same_target);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulerConfig {
    /// Depth difference above which opaque draws are ordered back to front.
    pub background_depth_threshold: f32,
    /// Merge topologically adjacent passes that share a render target.
    pub merge_same_target: bool,
    /// Emit one info-level log line per executed pass.
    pub log_passes: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            background_depth_threshold: DEFAULT_BACKGROUND_DEPTH_THRESHOLD,
            merge_same_target: true,
            log_passes: false,
        }
    }
}

impl SchedulerConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the background depth threshold.
    pub fn with_background_depth_threshold(mut self, threshold: f32) -> Self {
        self.background_depth_threshold = threshold;
        self
    }

    /// Enable or disable same-target pass merging.
    pub fn with_merge_same_target(mut self, merge: bool) -> Self {
        self.merge_same_target = merge;
        self
    }

    /// Enable or disable per-pass log lines.
    pub fn with_log_passes(mut self, log_passes: bool) -> Self {
        self.log_passes = log_passes;
        self
    }
}
