//! Scheduler error types.

use thiserror::Error;

use crate::graph::PassHandle;

/// Errors that can occur while compiling a frame graph.
///
/// These indicate an authoring bug upstream (pass construction), not a
/// runtime condition: there is no recovery other than discarding the frame
/// with [`FrameGraph::clear`](crate::graph::FrameGraph::clear).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A pass was reached again while its own dependencies were being sorted.
    ///
    /// Frame graphs must be directed acyclic graphs.
    #[error("cyclic dependency detected at pass {pass:?}")]
    CyclicDependency {
        /// The pass found on the current traversal path a second time.
        pass: PassHandle,
    },

    /// A pass handle that does not belong to this frame graph.
    #[error("invalid pass handle: {0:?}")]
    InvalidPassHandle(PassHandle),
}
