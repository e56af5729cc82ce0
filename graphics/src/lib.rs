//! # framepass graphics
//!
//! Render pass scheduling for a single frame.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`FrameGraph`] - Passes, their render targets and dependency edges
//! - [`compiler`] - Depth-first linearization with same-target pass merging
//! - [`CommandOrderer`] - Stable multi-key draw ordering inside a pass
//! - [`executor`] - Replays finalized passes against their targets
//!
//! Render targets, commands and the device are supplied by the renderer
//! through the [`RenderTarget`], [`RenderCommand`] and [`RenderDevice`]
//! traits.
//!
//! ## Example
//!
//! ```ignore
//! use framepass_core::pool::RecyclePool;
//! use framepass_graphics::{FrameGraph, SchedulerConfig};
//!
//! let config = SchedulerConfig::default();
//! let mut pool = RecyclePool::new();
//! let mut graph = FrameGraph::with_config(config);
//!
//! let shadows = graph.add_pass("shadows", shadow_map.clone());
//! let scene = graph.add_pass("scene", back_buffer.clone());
//! graph.add_dependency(scene, shadows);
//! graph.submit(scene, clear_command);
//!
//! let stats = graph.execute_frame(&device, &mut pool)?;
//! ```

pub mod command;
pub mod compiler;
pub mod config;
pub mod device;
pub mod error;
pub mod executor;
pub mod graph;

#[cfg(test)]
pub(crate) mod testing;

// Re-export main types for convenience
pub use command::{CommandOrderer, RenderCommand};
pub use compiler::CompiledGraph;
pub use config::SchedulerConfig;
pub use device::{NullDevice, RenderDevice};
pub use error::GraphError;
pub use graph::{FrameGraph, FrameStats, PassHandle, PassNode, RenderTarget, VisitState};

/// Graphics library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the scheduler's logging output.
pub fn init() {
    log::info!("framepass graphics v{} initialized", VERSION);
}
