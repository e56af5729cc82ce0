//! Minimal command and target used by the unit tests.
//!
//! Recording mocks for whole-frame behavior live with the integration tests
//! in `tests/common`.

use framepass_core::pool::Poolable;

use crate::command::RenderCommand;
use crate::graph::RenderTarget;

#[derive(Debug, Clone, Default)]
pub(crate) struct TestCommand {
    pub id: u32,
    pub draw: bool,
    pub overlay: bool,
    pub occluder: bool,
    pub technique: u32,
    pub transparent: bool,
    pub depth: f32,
    pub mesh: Option<u32>,
    pub state: u64,
    pub clears_color: bool,
    pub clears_depth: bool,
}

impl TestCommand {
    fn draw(id: u32) -> Self {
        Self {
            id,
            draw: true,
            ..Self::default()
        }
    }

    pub(crate) fn opaque(id: u32, technique: u32, depth: f32) -> Self {
        Self {
            technique,
            depth,
            ..Self::draw(id)
        }
    }

    pub(crate) fn transparent(id: u32, depth: f32) -> Self {
        Self {
            transparent: true,
            depth,
            ..Self::draw(id)
        }
    }

    pub(crate) fn overlay(id: u32) -> Self {
        Self {
            overlay: true,
            ..Self::draw(id)
        }
    }

    pub(crate) fn occluder(id: u32, depth: f32) -> Self {
        Self {
            occluder: true,
            depth,
            ..Self::draw(id)
        }
    }

    /// Clears color and depth.
    pub(crate) fn clear(id: u32) -> Self {
        Self {
            id,
            clears_color: true,
            clears_depth: true,
            ..Self::default()
        }
    }

    /// Clears color only, a full clear only on targets without depth.
    pub(crate) fn color_clear(id: u32) -> Self {
        Self {
            id,
            clears_color: true,
            ..Self::default()
        }
    }

    pub(crate) fn copy(id: u32) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub(crate) fn with_mesh(mut self, key: u32) -> Self {
        self.mesh = Some(key);
        self
    }

    pub(crate) fn with_state(mut self, state: u64) -> Self {
        self.state = state;
        self
    }
}

impl RenderCommand for TestCommand {
    fn is_draw(&self) -> bool {
        self.draw
    }

    fn is_overlay(&self) -> bool {
        self.overlay
    }

    fn is_depth_disabling_occluder(&self) -> bool {
        self.occluder
    }

    fn shader_technique(&self) -> u32 {
        self.technique
    }

    fn is_transparent(&self) -> bool {
        self.transparent
    }

    fn depth(&self) -> f32 {
        self.depth
    }

    fn mesh_sort_key(&self) -> Option<u32> {
        self.mesh
    }

    fn render_state(&self) -> u64 {
        self.state
    }

    fn is_full_clear(&self, target_has_depth: bool) -> bool {
        self.clears_color && (self.clears_depth || !target_has_depth)
    }

    fn execute(&mut self, _layer: u32, _log: bool) {}
}

impl Poolable for TestCommand {
    fn new_empty() -> Self {
        Self::default()
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug)]
pub(crate) struct TestTarget {
    name: String,
    depth: bool,
}

impl TestTarget {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            depth: false,
        }
    }

    pub(crate) fn with_depth(mut self) -> Self {
        self.depth = true;
        self
    }
}

impl RenderTarget for TestTarget {
    fn name(&self) -> &str {
        &self.name
    }

    fn has_depth(&self) -> bool {
        self.depth
    }

    fn layer_count(&self) -> u32 {
        1
    }

    fn activate(&self, _layer: u32) {}

    fn prepare_depth_readback(&self) {}
}
