//! Common utilities for scheduler integration tests.
//!
//! Provides recording implementations of the renderer-side traits so tests
//! can assert on the exact sequence of target activations, commands and
//! debug markers a frame produces.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use framepass_core::pool::Poolable;
use framepass_graphics::{RenderCommand, RenderDevice, RenderTarget};

/// Initialize logging once for the test binary.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ============================================================================
// Event Log
// ============================================================================

/// Ordered record of GPU-side events, shared between mocks.
#[derive(Debug, Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn push(&self, event: String) {
        self.0.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    /// Ids of executed draws, in execution order.
    pub fn executed_ids(&self) -> Vec<u32> {
        self.events()
            .iter()
            .filter_map(|event| event.strip_prefix("cmd "))
            .filter_map(|rest| rest.split('@').next())
            .filter_map(|id| id.parse().ok())
            .collect()
    }

    /// Target names in activation order.
    pub fn activations(&self) -> Vec<String> {
        self.events()
            .iter()
            .filter_map(|event| event.strip_prefix("activate "))
            .filter_map(|rest| rest.split(':').next())
            .map(str::to_string)
            .collect()
    }
}

// ============================================================================
// Commands
// ============================================================================

/// What a [`Cmd`] does when executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CmdKind {
    /// Clears color and depth.
    #[default]
    Clear,
    Copy,
    Opaque,
    Transparent,
    Overlay,
    Occluder,
}

#[derive(Debug, Clone, Default)]
pub struct Cmd {
    pub id: u32,
    pub kind: CmdKind,
    pub technique: u32,
    pub depth: f32,
    pub mesh: Option<u32>,
    pub state: u64,
    pub log: Option<EventLog>,
}

impl Cmd {
    pub fn new(id: u32, kind: CmdKind) -> Self {
        Self {
            id,
            kind,
            ..Self::default()
        }
    }

    pub fn opaque(id: u32, technique: u32, depth: f32) -> Self {
        Self {
            technique,
            depth,
            ..Self::new(id, CmdKind::Opaque)
        }
    }

    pub fn transparent(id: u32, depth: f32) -> Self {
        Self {
            depth,
            ..Self::new(id, CmdKind::Transparent)
        }
    }

    pub fn logged(mut self, log: &EventLog) -> Self {
        self.log = Some(log.clone());
        self
    }
}

impl RenderCommand for Cmd {
    fn is_draw(&self) -> bool {
        !matches!(self.kind, CmdKind::Clear | CmdKind::Copy)
    }

    fn is_overlay(&self) -> bool {
        self.kind == CmdKind::Overlay
    }

    fn is_depth_disabling_occluder(&self) -> bool {
        self.kind == CmdKind::Occluder
    }

    fn shader_technique(&self) -> u32 {
        self.technique
    }

    fn is_transparent(&self) -> bool {
        self.kind == CmdKind::Transparent
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

    fn is_full_clear(&self, _target_has_depth: bool) -> bool {
        self.kind == CmdKind::Clear
    }

    fn execute(&mut self, layer: u32, _log: bool) {
        if let Some(log) = &self.log {
            log.push(format!("cmd {}@{}", self.id, layer));
        }
    }
}

impl Poolable for Cmd {
    fn new_empty() -> Self {
        Self::default()
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

// ============================================================================
// Targets and Device
// ============================================================================

#[derive(Debug)]
pub struct Surface {
    pub name: String,
    pub depth: bool,
    pub layers: u32,
    pub log: EventLog,
}

impl Surface {
    pub fn new(name: &str, log: &EventLog) -> Arc<Self> {
        Self::layered(name, 1, log)
    }

    pub fn layered(name: &str, layers: u32, log: &EventLog) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            depth: true,
            layers,
            log: log.clone(),
        })
    }
}

impl RenderTarget for Surface {
    fn name(&self) -> &str {
        &self.name
    }

    fn has_depth(&self) -> bool {
        self.depth
    }

    fn layer_count(&self) -> u32 {
        self.layers
    }

    fn activate(&self, layer: u32) {
        self.log.push(format!("activate {}:{}", self.name, layer));
    }

    fn prepare_depth_readback(&self) {
        self.log.push(format!("readback {}", self.name));
    }
}

#[derive(Debug, Default)]
pub struct Gpu {
    pub layered_rendering: bool,
    pub debug_markers: bool,
    pub log: EventLog,
}

impl Gpu {
    pub fn new(log: &EventLog) -> Self {
        Self {
            log: log.clone(),
            ..Self::default()
        }
    }
}

impl RenderDevice for Gpu {
    fn supports_layered_rendering(&self) -> bool {
        self.layered_rendering
    }

    fn supports_debug_markers(&self) -> bool {
        self.debug_markers
    }

    fn push_debug_marker(&self, label: &str) {
        self.log.push(format!("push {}", label));
    }

    fn pop_debug_marker(&self) {
        self.log.push("pop".to_string());
    }
}

// ============================================================================
// Graph Generation
// ============================================================================

/// Small deterministic generator for randomized graph shapes.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed.wrapping_mul(6364136223846793005).wrapping_add(1))
    }

    pub fn next_u32(&mut self) -> u32 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) as u32
    }

    pub fn below(&mut self, bound: u32) -> u32 {
        self.next_u32() % bound
    }
}
