//! Frame graph compilation.
//!
//! This module linearizes the passes of a [`FrameGraph`](crate::graph::FrameGraph)
//! into an execution order ([`CompiledGraph`]).
//!
//! The compiler performs:
//!
//! 1. **Topological Sort** - Depth-first, so every pass lands after the
//!    passes it depends on
//! 2. **Cycle Detection** - Reaching a pass that is still being visited
//!    means the graph is not a DAG
//! 3. **Same-Target Merge** - A pass whose render target matches the last
//!    pass in the order is folded into it, saving a target switch
//!
//! # Merging
//!
//! While visiting a pass, the first dependency that renders into the same
//! target is visited last. That maximizes the chance it ends up directly
//! before the pass in the output, where the two can be merged.
//!
//! When a pass is merged into the preceding (surviving) pass:
//! - its commands are moved to the end of the survivor's commands,
//! - its dependencies are appended to the survivor's dependencies,
//! - its depth readback request is OR'ed into the survivor,
//! - every edge in the graph pointing at it is redirected to the survivor.
//!
//! The absorbed pass is left empty and never appears in the order.
//!
//! # Example
//!
//! ```ignore
//! let mut graph = FrameGraph::new();
//! let opaque = graph.add_pass("opaque", scene.clone());
//! let decals = graph.add_pass("decals", scene.clone());
//! let post = graph.add_pass("post", back_buffer.clone());
//! graph.add_dependency(decals, opaque);
//! graph.add_dependency(post, decals);
//!
//! let compiled = graph.compile()?;
//! // `decals` was merged into `opaque`
//! assert_eq!(compiled.pass_order(), &[opaque, post]);
//! ```

use framepass_core::pool::Poolable;

use crate::error::GraphError;
use crate::graph::{self, PassHandle, PassNode, VisitState, same_target};

/// A compiled frame graph ready for execution.
///
/// Contains a topologically sorted pass order that respects all
/// dependencies. Passes merged into a preceding pass are not part of it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CompiledGraph {
    /// Pass execution order as handles.
    pass_order: Vec<PassHandle>,
    merged_count: usize,
}

impl CompiledGraph {
    #[cfg(test)]
    pub(crate) fn new(pass_order: Vec<PassHandle>) -> Self {
        Self {
            pass_order,
            merged_count: 0,
        }
    }

    /// Get the pass execution order as handles.
    pub fn pass_order(&self) -> &[PassHandle] {
        &self.pass_order
    }

    /// Get the number of passes in the compiled graph.
    pub fn pass_count(&self) -> usize {
        self.pass_order.len()
    }

    /// Get the number of passes folded into a preceding same-target pass.
    pub fn merged_count(&self) -> usize {
        self.merged_count
    }

    /// Check if the compiled graph is empty.
    pub fn is_empty(&self) -> bool {
        self.pass_order.is_empty()
    }
}

impl Poolable for CompiledGraph {
    fn new_empty() -> Self {
        Self::default()
    }

    fn reset(&mut self) {
        self.pass_order.clear();
        self.merged_count = 0;
    }
}

/// Compile `passes` into `compiled`, reusing its allocation.
///
/// With `roots`, only passes reachable from them are scheduled. Otherwise
/// every pass is visited in creation order.
///
/// On error `compiled` is left empty and `passes` may be partially merged.
pub(crate) fn compile_into<C, T: ?Sized>(
    passes: &mut [PassNode<C, T>],
    roots: Option<&[PassHandle]>,
    merge_same_target: bool,
    compiled: &mut CompiledGraph,
) -> Result<(), GraphError> {
    framepass_core::profile_scope!("compile_graph");

    compiled.reset();

    if let Some(roots) = roots {
        if let Some(&invalid) = roots.iter().find(|root| root.index() >= passes.len()) {
            return Err(GraphError::InvalidPassHandle(invalid));
        }
    }

    for pass in passes.iter_mut() {
        pass.visit = VisitState::Unvisited;
    }

    let mut sorter = Sorter {
        passes,
        compiled: &mut *compiled,
        merge_same_target,
    };
    let result = match roots {
        Some(roots) => roots.iter().try_for_each(|&root| sorter.visit(root)),
        None => (0..sorter.passes.len() as u32)
            .map(PassHandle::new)
            .try_for_each(|handle| sorter.visit(handle)),
    };

    if let Err(err) = &result {
        log::error!("Frame graph compilation failed: {}", err);
        compiled.reset();
    }
    result
}

/// Depth-first sorter state for one compilation.
struct Sorter<'a, C, T: ?Sized> {
    passes: &'a mut [PassNode<C, T>],
    compiled: &'a mut CompiledGraph,
    merge_same_target: bool,
}

impl<C, T: ?Sized> Sorter<'_, C, T> {
    fn visit(&mut self, handle: PassHandle) -> Result<(), GraphError> {
        match self.passes[handle.index()].visit {
            VisitState::Done => return Ok(()),
            VisitState::Visiting => return Err(GraphError::CyclicDependency { pass: handle }),
            VisitState::Unvisited => {}
        }
        self.passes[handle.index()].visit = VisitState::Visiting;

        // Edges are read by position on every step: merges further down may
        // redirect them while this pass is on the stack.
        let deferred = {
            let pass = &self.passes[handle.index()];
            pass.dependencies
                .iter()
                .position(|dep| same_target(&self.passes[dep.index()].target, &pass.target))
        };

        let mut edge = 0;
        while edge < self.passes[handle.index()].dependencies.len() {
            if Some(edge) != deferred {
                let dependency = self.passes[handle.index()].dependencies[edge];
                self.visit(dependency)?;
            }
            edge += 1;
        }
        if let Some(edge) = deferred {
            let dependency = self.passes[handle.index()].dependencies[edge];
            self.visit(dependency)?;
        }

        self.passes[handle.index()].visit = VisitState::Done;

        match self.compiled.pass_order.last().copied() {
            Some(last)
                if self.merge_same_target
                    && same_target(
                        &self.passes[last.index()].target,
                        &self.passes[handle.index()].target,
                    ) =>
            {
                self.merge(handle, last);
            }
            _ => self.compiled.pass_order.push(handle),
        }
        Ok(())
    }

    /// Fold `absorbed` into `survivor`, the last pass of the order.
    fn merge(&mut self, absorbed: PassHandle, survivor: PassHandle) {
        let (commands, mut dependencies, depth_readback) = {
            let pass = &mut self.passes[absorbed.index()];
            (
                std::mem::take(&mut pass.commands),
                std::mem::take(&mut pass.dependencies),
                pass.depth_readback,
            )
        };
        dependencies.retain(|&dep| dep != survivor);

        log::trace!(
            "Merging pass '{}' into '{}' ({} commands)",
            self.passes[absorbed.index()].name,
            self.passes[survivor.index()].name,
            commands.len()
        );

        let pass = &mut self.passes[survivor.index()];
        pass.depth_readback |= depth_readback;
        pass.commands.extend(commands);
        pass.dependencies.extend(dependencies);

        let target = pass.target.clone();
        graph::rewrite_dependency(&mut *self.passes, &target, absorbed, survivor);

        self.compiled.merged_count += 1;
    }
}
