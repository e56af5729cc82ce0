//! Render commands and their in-pass ordering.
//!
//! The scheduler treats commands as opaque units of GPU work. It only reads
//! the classification and ordering attributes exposed by [`RenderCommand`]
//! and asks the command to execute itself.

mod order;

pub use order::{CommandOrderer, DEFAULT_BACKGROUND_DEPTH_THRESHOLD};

/// A single draw, clear or copy submitted to a pass.
///
/// Implemented by the renderer's command type. Commands are owned by exactly
/// one pass at a time and are moved, never cloned, when passes merge.
pub trait RenderCommand {
    /// `true` for draw commands, `false` for clears and copies.
    fn is_draw(&self) -> bool;

    /// Overlay/UI draws are always rendered last in a pass.
    fn is_overlay(&self) -> bool;

    /// Draws using a technique that disables depth testing so they stay
    /// visible through geometry in front of them.
    ///
    /// They are rendered before every other draw so that dynamic objects
    /// depth-test correctly against them.
    fn is_depth_disabling_occluder(&self) -> bool;

    /// Shader technique identifier, used to cluster draws sharing a shader.
    fn shader_technique(&self) -> u32;

    /// Legacy transparency classification.
    ///
    /// This is an authoring flag, not derived from the actual blend or depth
    /// state of the draw.
    fn is_transparent(&self) -> bool;

    /// View depth combined with the authoring depth bias.
    fn depth(&self) -> f32;

    /// Sort key of the mesh buffer for mesh draws, `None` for other commands.
    fn mesh_sort_key(&self) -> Option<u32>;

    /// Packed render state key, used as the final ordering tiebreak.
    fn render_state(&self) -> u64;

    /// Whether this command overwrites everything previously rendered into
    /// a target, given whether that target has a depth buffer.
    fn is_full_clear(&self, target_has_depth: bool) -> bool;

    /// Issue the command for the given target layer.
    fn execute(&mut self, layer: u32, log: bool);
}
