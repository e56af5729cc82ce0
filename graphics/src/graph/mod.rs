//! Frame graph construction.
//!
//! A [`FrameGraph`] holds the passes authored for one frame and the
//! dependency edges between them. Each pass renders into a render target and
//! owns the commands submitted to it.
//!
//! # Architecture
//!
//! | Stage | Entry point | Purpose |
//! |-------|-------------|---------|
//! | Build | [`FrameGraph::add_pass`], [`FrameGraph::submit`], [`FrameGraph::add_dependency`] | Author passes (this module) |
//! | Compile | [`FrameGraph::compile`] | Linearize and merge same-target passes ([`compiler`](crate::compiler)) |
//! | Order | [`FrameGraph::sort_commands`] | Draw order inside each pass ([`command`](crate::command)) |
//! | Execute | [`FrameGraph::execute`] | Replay passes against their targets ([`executor`](crate::executor)) |
//! | Recycle | [`FrameGraph::clear`] | Return commands to the pool for the next frame |
//!
//! # Example
//!
//! ```ignore
//! let mut graph = FrameGraph::new();
//! let shadows = graph.add_pass("shadows", shadow_map.clone());
//! let scene = graph.add_pass("scene", back_buffer.clone());
//! graph.add_dependency(scene, shadows);
//!
//! graph.submit(scene, clear_command);
//! graph.submit(scene, draw_command);
//!
//! let stats = graph.execute_frame(&device, &mut pool)?;
//! ```

mod pass;
mod target;

use std::sync::Arc;

use framepass_core::pool::{Poolable, Pooled, RecyclePool};

pub use pass::{PassNode, VisitState};
pub use target::{RenderTarget, same_target};

use crate::command::{CommandOrderer, RenderCommand};
use crate::compiler::{self, CompiledGraph};
use crate::config::SchedulerConfig;
use crate::device::RenderDevice;
use crate::error::GraphError;
use crate::executor;

/// Handle to a pass in the frame graph.
///
/// `PassHandle` is `Copy` and cheap to pass around. It is only valid within
/// the `FrameGraph` that created it, until the graph is cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PassHandle(u32);

impl PassHandle {
    pub(crate) fn new(index: u32) -> Self {
        Self(index)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Summary of one [`FrameGraph::execute_frame`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Passes authored for the frame.
    pub passes_declared: usize,
    /// Passes left in the compiled order after merging.
    pub passes_scheduled: usize,
    /// Passes folded into a preceding same-target pass.
    pub passes_merged: usize,
    /// Scheduled passes that had commands to execute.
    pub passes_executed: usize,
    /// Commands issued, counting each layer replay once.
    pub commands_executed: usize,
    /// Commands retained by the recycle pool.
    pub commands_recycled: usize,
}

/// The frame graph describes one frame's render passes and their ordering.
///
/// # Construction
///
/// ```ignore
/// let mut graph = FrameGraph::new();
/// let geometry = graph.add_pass("geometry", gbuffer.clone());
/// let lighting = graph.add_pass("lighting", hdr.clone());
/// graph.add_dependency(lighting, geometry);
/// ```
///
/// # Execution
///
/// ```ignore
/// let compiled = graph.compile()?;
/// graph.sort_commands(&compiled);
/// graph.execute(&compiled, &device, false);
/// graph.clear(&mut pool);
/// ```
#[derive(Debug)]
pub struct FrameGraph<C, T: ?Sized> {
    /// All passes of the current frame, indexed by `PassHandle`.
    passes: Vec<PassNode<C, T>>,
    /// Passes from previous frames kept for their allocations.
    retired: Vec<PassNode<C, T>>,
    config: SchedulerConfig,
    orderer: CommandOrderer,
    /// Pass order reused by `execute_frame`.
    compiled: Pooled<CompiledGraph>,
}

impl<C, T: ?Sized> Default for FrameGraph<C, T> {
    fn default() -> Self {
        Self::with_config(SchedulerConfig::default())
    }
}

impl<C, T: ?Sized> FrameGraph<C, T> {
    /// Create an empty frame graph with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty frame graph with the given configuration.
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self {
            passes: Vec::new(),
            retired: Vec::new(),
            config,
            orderer: CommandOrderer::new(config.background_depth_threshold),
            compiled: Pooled::default(),
        }
    }

    /// Get the scheduler configuration.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Add a pass rendering into `target`.
    ///
    /// Storage of passes from previous frames is reused when available.
    pub fn add_pass(&mut self, name: &str, target: Arc<T>) -> PassHandle {
        let index = self.passes.len() as u32;
        let pass = match self.retired.pop() {
            Some(mut pass) => {
                pass.reset(name, target);
                pass
            }
            None => PassNode::new(name, target),
        };
        self.passes.push(pass);
        PassHandle::new(index)
    }

    /// Restore an existing pass to a fresh state with a new name and target.
    ///
    /// The pass's commands are dropped and its dependency list is cleared.
    pub fn reset_pass(&mut self, handle: PassHandle, name: &str, target: Arc<T>) {
        self.pass_mut(handle).reset(name, target);
    }

    /// Get a pass by handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle does not belong to this graph.
    pub fn pass(&self, handle: PassHandle) -> &PassNode<C, T> {
        self.get(handle).expect("Invalid pass handle")
    }

    /// Get a pass by handle, or `None` if the handle is not valid.
    pub fn get(&self, handle: PassHandle) -> Option<&PassNode<C, T>> {
        self.passes.get(handle.index())
    }

    fn pass_mut(&mut self, handle: PassHandle) -> &mut PassNode<C, T> {
        self.passes
            .get_mut(handle.index())
            .expect("Invalid pass handle")
    }

    /// Get all passes in the graph, in creation order.
    pub fn passes(&self) -> &[PassNode<C, T>] {
        &self.passes
    }

    /// Get the number of passes in the graph.
    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    /// Request the pass's target depth buffer be prepared for sampling after
    /// the pass executes.
    pub fn set_depth_readback(&mut self, handle: PassHandle) {
        self.pass_mut(handle).set_depth_readback(true);
    }

    /// Add a dependency between passes.
    ///
    /// The `dependent` pass will execute after the `dependency` pass.
    ///
    /// # Panics
    ///
    /// Panics if either handle is invalid or if a pass is made to depend on
    /// itself.
    pub fn add_dependency(&mut self, dependent: PassHandle, dependency: PassHandle) {
        assert!(
            dependent.index() < self.passes.len(),
            "Invalid dependent handle"
        );
        assert!(
            dependency.index() < self.passes.len(),
            "Invalid dependency handle"
        );
        assert!(dependent != dependency, "Pass cannot depend on itself");

        self.passes[dependent.index()].dependencies.push(dependency);
    }

    /// Get dependencies of a pass.
    pub fn dependencies(&self, handle: PassHandle) -> &[PassHandle] {
        self.pass(handle).dependencies()
    }

    /// Redirect every edge pointing at `old` to `new`.
    ///
    /// Edges pointing at passes rendering into `target` are followed so the
    /// rewrite reaches their own dependency lists as well. Each pass is
    /// rewritten at most once per call, even when reachable along several
    /// paths. Edges from `new` to itself are removed afterwards.
    pub fn rewrite_dependency(&mut self, target: &Arc<T>, old: PassHandle, new: PassHandle) {
        rewrite_dependency(&mut self.passes, target, old, new);
    }

    /// Compile the graph: linearize all passes and merge adjacent passes
    /// that share a render target.
    ///
    /// Passes are visited in creation order. On error the graph is left
    /// partially merged and must be cleared.
    pub fn compile(&mut self) -> Result<CompiledGraph, GraphError> {
        let mut compiled = CompiledGraph::default();
        self.compile_into(None, &mut compiled)?;
        Ok(compiled)
    }

    /// Compile only the passes reachable from `roots`.
    ///
    /// Passes that no root depends on, directly or transitively, are left
    /// out of the order and never execute.
    pub fn compile_from(&mut self, roots: &[PassHandle]) -> Result<CompiledGraph, GraphError> {
        let mut compiled = CompiledGraph::default();
        self.compile_into(Some(roots), &mut compiled)?;
        Ok(compiled)
    }

    /// Compile into an existing [`CompiledGraph`], reusing its allocation.
    pub fn compile_into(
        &mut self,
        roots: Option<&[PassHandle]>,
        compiled: &mut CompiledGraph,
    ) -> Result<(), GraphError> {
        compiler::compile_into(
            &mut self.passes,
            roots,
            self.config.merge_same_target,
            compiled,
        )
    }

    /// Return every pass's commands to `pool` and empty the graph for the
    /// next frame.
    ///
    /// Pass storage is kept and reused by later [`add_pass`](Self::add_pass)
    /// calls. The pool's own capacity bounds what is retained; the rest is
    /// dropped. Returns the number of commands the pool retained.
    pub fn clear(&mut self, pool: &mut RecyclePool<C>) -> usize
    where
        C: Poolable,
    {
        let mut recycled = 0;
        for mut pass in self.passes.drain(..) {
            recycled += pass.recycle_commands(pool);
            pass.dependencies.clear();
            self.retired.push(pass);
        }
        recycled
    }
}

impl<C: RenderCommand, T: RenderTarget + ?Sized> FrameGraph<C, T> {
    /// Submit a command to a pass.
    ///
    /// See [`PassNode::submit`] for how full clears are handled.
    pub fn submit(&mut self, handle: PassHandle, command: C) {
        self.pass_mut(handle).submit(command);
    }

    /// Sort the commands of every pass in a compiled order.
    pub fn sort_commands(&mut self, compiled: &CompiledGraph) {
        framepass_core::profile_scope!("sort_pass_commands");
        for &handle in compiled.pass_order() {
            let orderer = self.orderer;
            orderer.sort(&mut self.pass_mut(handle).commands);
        }
    }

    /// Execute a single pass against its target.
    ///
    /// Returns `false` without touching the target or device if the pass has
    /// no commands.
    pub fn execute_pass<D>(&mut self, handle: PassHandle, device: &D, log: bool) -> bool
    where
        D: RenderDevice + ?Sized,
    {
        executor::execute_pass(&mut self.passes, handle, device, log).is_some()
    }

    /// Execute every pass of a compiled order. Returns the number of passes
    /// that had commands to execute.
    pub fn execute<D>(&mut self, compiled: &CompiledGraph, device: &D, log: bool) -> usize
    where
        D: RenderDevice + ?Sized,
    {
        let mut executed = 0;
        for &handle in compiled.pass_order() {
            if executor::execute_pass(&mut self.passes, handle, device, log).is_some() {
                executed += 1;
            }
        }
        executed
    }

    /// Run the whole frame: compile, order commands, execute, then recycle
    /// every command into `pool` and clear the graph.
    ///
    /// On a cyclic dependency nothing is executed and the error is returned;
    /// the graph is left for inspection and must be cleared by the caller.
    pub fn execute_frame<D>(
        &mut self,
        device: &D,
        pool: &mut RecyclePool<C>,
    ) -> Result<FrameStats, GraphError>
    where
        D: RenderDevice + ?Sized,
        C: Poolable,
    {
        framepass_core::profile_scope!("execute_frame");

        let mut compiled = std::mem::take(self.compiled.activate());
        let result = self.compile_into(None, &mut compiled);

        let stats = result.map(|()| {
            self.sort_commands(&compiled);

            let mut stats = FrameStats {
                passes_declared: self.passes.len(),
                passes_scheduled: compiled.pass_count(),
                passes_merged: compiled.merged_count(),
                ..FrameStats::default()
            };
            for &handle in compiled.pass_order() {
                if let Some(issued) =
                    executor::execute_pass(&mut self.passes, handle, device, self.config.log_passes)
                {
                    stats.passes_executed += 1;
                    stats.commands_executed += issued;
                }
            }
            stats.commands_recycled = self.clear(pool);
            stats
        });

        *self.compiled.activate() = compiled;
        self.compiled.release();

        if let Ok(stats) = &stats {
            log::trace!(
                "Frame executed: {} passes declared, {} scheduled ({} merged), {} commands",
                stats.passes_declared,
                stats.passes_scheduled,
                stats.passes_merged,
                stats.commands_executed
            );
        }
        framepass_core::frame_mark!();
        stats
    }
}

/// Redirect every edge pointing at `old` to `new`, see
/// [`FrameGraph::rewrite_dependency`].
pub(crate) fn rewrite_dependency<C, T: ?Sized>(
    passes: &mut [PassNode<C, T>],
    target: &Arc<T>,
    old: PassHandle,
    new: PassHandle,
) {
    for pass in passes.iter_mut() {
        pass.rewritten = false;
    }

    let mut stack = Vec::new();
    for start in 0..passes.len() {
        stack.push(start);
        while let Some(index) = stack.pop() {
            if passes[index].rewritten {
                continue;
            }
            passes[index].rewritten = true;

            for edge in 0..passes[index].dependencies.len() {
                let dependency = passes[index].dependencies[edge];
                if dependency == old {
                    passes[index].dependencies[edge] = new;
                } else if same_target(&passes[dependency.index()].target, target) {
                    stack.push(dependency.index());
                }
            }
        }
    }

    passes[new.index()].dependencies.retain(|&d| d != new);
}
