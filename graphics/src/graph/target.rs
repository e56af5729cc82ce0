//! Render target abstraction for passes.
//!
//! The scheduler never owns or creates render targets. A pass holds a shared
//! reference to its target and only talks to it through [`RenderTarget`].

use std::sync::Arc;

/// A destination surface that passes render into.
///
/// Implemented by the surrounding renderer. The scheduler uses it to decide
/// whether a clear is a full clear, how many layers to replay and to
/// activate the target before running a pass's commands.
pub trait RenderTarget {
    /// Debug name used in log lines and debug markers.
    fn name(&self) -> &str;

    /// Whether the target has a depth buffer.
    fn has_depth(&self) -> bool;

    /// Number of array layers (1 for a plain 2D target).
    fn layer_count(&self) -> u32;

    /// Bind the target for rendering into `layer`.
    ///
    /// Layer 0 is also used when the device renders all layers at once.
    fn activate(&self, layer: u32);

    /// Make the depth buffer available for sampling by later passes.
    fn prepare_depth_readback(&self);
}

/// Check whether two passes address the same render target.
///
/// Targets are compared by identity, never by value.
pub fn same_target<T: ?Sized>(a: &Arc<T>, b: &Arc<T>) -> bool {
    Arc::ptr_eq(a, b)
}
