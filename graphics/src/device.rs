//! Rendering device capabilities used by the pass executor.

/// The GPU device the frame executes on.
///
/// Only the capabilities the executor needs are exposed; command encoding
/// itself happens inside [`RenderCommand::execute`](crate::command::RenderCommand::execute).
pub trait RenderDevice {
    /// Whether a multi-layer target can be rendered in one go (e.g. via
    /// layered rendering in the geometry/vertex stage).
    ///
    /// When `false`, passes on multi-layer targets are replayed once per layer.
    fn supports_layered_rendering(&self) -> bool;

    /// Whether debug marker regions are available.
    fn supports_debug_markers(&self) -> bool;

    /// Open a named debug marker region.
    fn push_debug_marker(&self, label: &str);

    /// Close the innermost debug marker region.
    fn pop_debug_marker(&self);
}

/// A device without layered rendering or debug marker support.
///
/// Useful for headless tooling and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDevice;

impl RenderDevice for NullDevice {
    fn supports_layered_rendering(&self) -> bool {
        false
    }

    fn supports_debug_markers(&self) -> bool {
        false
    }

    fn push_debug_marker(&self, label: &str) {
        log::trace!("NullDevice: ignoring debug marker '{}'", label);
    }

    fn pop_debug_marker(&self) {}
}
