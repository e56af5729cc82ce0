//! Pass nodes of the frame graph.

use std::sync::Arc;

use framepass_core::pool::{Poolable, RecyclePool};

use super::PassHandle;
use super::target::RenderTarget;
use crate::command::RenderCommand;

/// Traversal state of a pass during compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisitState {
    /// Not reached yet in the current compilation.
    #[default]
    Unvisited,
    /// On the current traversal path; reaching it again means a cycle.
    Visiting,
    /// Placed in the output order (possibly merged into another pass).
    Done,
}

/// A unit of scheduled draw work targeting one render destination.
///
/// A pass owns its commands and lists the passes that must execute before
/// it. Passes live in a [`FrameGraph`](super::FrameGraph) and are addressed
/// by [`PassHandle`].
#[derive(Debug)]
pub struct PassNode<C, T: ?Sized> {
    pub(crate) name: String,
    pub(crate) target: Arc<T>,
    pub(crate) commands: Vec<C>,
    pub(crate) dependencies: Vec<PassHandle>,
    pub(crate) depth_readback: bool,
    pub(crate) visit: VisitState,
    pub(crate) rewritten: bool,
}

impl<C, T: ?Sized> PassNode<C, T> {
    /// Create an empty pass rendering into `target`.
    pub fn new(name: impl Into<String>, target: Arc<T>) -> Self {
        Self {
            name: name.into(),
            target,
            commands: Vec::new(),
            dependencies: Vec::new(),
            depth_readback: false,
            visit: VisitState::Unvisited,
            rewritten: false,
        }
    }

    /// Restore the pass to a fresh per-frame state, keeping its allocations.
    pub fn reset(&mut self, name: &str, target: Arc<T>) {
        self.name.clear();
        self.name.push_str(name);
        self.target = target;
        self.commands.clear();
        self.dependencies.clear();
        self.depth_readback = false;
        self.visit = VisitState::Unvisited;
        self.rewritten = false;
    }

    /// Get the pass name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the render target this pass renders into.
    pub fn target(&self) -> &Arc<T> {
        &self.target
    }

    /// Get the submitted commands, in their current order.
    pub fn commands(&self) -> &[C] {
        &self.commands
    }

    /// Get the number of submitted commands.
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Get the passes that must execute before this one.
    pub fn dependencies(&self) -> &[PassHandle] {
        &self.dependencies
    }

    /// Whether the target's depth buffer is prepared for sampling after execution.
    pub fn depth_readback(&self) -> bool {
        self.depth_readback
    }

    /// Request the target's depth buffer be prepared for sampling after execution.
    pub fn set_depth_readback(&mut self, readback: bool) {
        self.depth_readback = readback;
    }

    /// Traversal state from the last compilation.
    pub fn visit_state(&self) -> VisitState {
        self.visit
    }

    /// Hand this pass's commands to `pool`. Returns how many were retained.
    pub fn recycle_commands(&mut self, pool: &mut RecyclePool<C>) -> usize
    where
        C: Poolable,
    {
        pool.recycle(self.commands.drain(..))
    }
}

impl<C: RenderCommand, T: RenderTarget + ?Sized> PassNode<C, T> {
    /// Append a command to this pass.
    ///
    /// A full clear of the target makes every previously submitted command
    /// moot, so those are dropped before the clear is appended.
    pub fn submit(&mut self, command: C) {
        if command.is_full_clear(self.target.has_depth()) {
            if !self.commands.is_empty() {
                log::trace!(
                    "Pass '{}': full clear discards {} commands",
                    self.name,
                    self.commands.len()
                );
            }
            self.commands.clear();
        }
        self.commands.push(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{TestCommand, TestTarget};

    fn color_target() -> Arc<TestTarget> {
        Arc::new(TestTarget::new("color"))
    }

    #[test]
    fn test_new_pass_is_empty() {
        let pass = PassNode::<TestCommand, _>::new("main", color_target());
        assert_eq!(pass.name(), "main");
        assert_eq!(pass.command_count(), 0);
        assert!(pass.dependencies().is_empty());
        assert!(!pass.depth_readback());
        assert_eq!(pass.visit_state(), VisitState::Unvisited);
    }

    #[test]
    fn test_full_clear_discards_previous_commands() {
        let mut pass = PassNode::new("main", color_target());
        for id in 0..5 {
            pass.submit(TestCommand::opaque(id, 0, 1.0));
        }
        pass.submit(TestCommand::clear(10));
        assert_eq!(pass.command_count(), 1);
        assert_eq!(pass.commands()[0].id, 10);

        pass.submit(TestCommand::opaque(11, 0, 1.0));
        assert_eq!(pass.command_count(), 2);
    }

    #[test]
    fn test_partial_clear_depends_on_target_depth() {
        let mut without_depth = PassNode::new("color_only", color_target());
        without_depth.submit(TestCommand::opaque(1, 0, 1.0));
        without_depth.submit(TestCommand::color_clear(2));
        assert_eq!(without_depth.command_count(), 1);

        let depth_target = Arc::new(TestTarget::new("scene").with_depth());
        let mut with_depth = PassNode::new("scene", depth_target);
        with_depth.submit(TestCommand::opaque(1, 0, 1.0));
        with_depth.submit(TestCommand::color_clear(2));
        assert_eq!(with_depth.command_count(), 2);
    }

    #[test]
    fn test_reset_restores_fresh_state() {
        let mut pass = PassNode::new("old", color_target());
        pass.submit(TestCommand::opaque(1, 0, 1.0));
        pass.dependencies.push(PassHandle::new(4));
        pass.set_depth_readback(true);
        pass.visit = VisitState::Done;
        pass.rewritten = true;

        let other = color_target();
        pass.reset("new", other.clone());

        assert_eq!(pass.name(), "new");
        assert!(Arc::ptr_eq(pass.target(), &other));
        assert_eq!(pass.command_count(), 0);
        assert!(pass.dependencies().is_empty());
        assert!(!pass.depth_readback());
        assert_eq!(pass.visit_state(), VisitState::Unvisited);
        assert!(!pass.rewritten);
    }

    #[test]
    fn test_recycle_commands_empties_pass() {
        let mut pool = RecyclePool::with_capacity(3);
        let mut pass = PassNode::new("main", color_target());
        for id in 0..5 {
            pass.submit(TestCommand::opaque(id, 0, 1.0));
        }

        assert_eq!(pass.recycle_commands(&mut pool), 3);
        assert_eq!(pass.command_count(), 0);
        assert_eq!(pool.len(), 3);
    }
}
