//! Pass execution.
//!
//! Replays the sorted commands of a finalized pass against its render
//! target. Execution at this level cannot fail; errors raised by the GPU are
//! the concern of the command and device implementations.

use crate::command::RenderCommand;
use crate::device::RenderDevice;
use crate::graph::{PassHandle, PassNode, RenderTarget};

/// Execute one pass. Returns the number of commands issued (counting each
/// layer replay), or `None` if the pass had nothing to execute.
pub(crate) fn execute_pass<C, T, D>(
    passes: &mut [PassNode<C, T>],
    handle: PassHandle,
    device: &D,
    log: bool,
) -> Option<usize>
where
    C: RenderCommand,
    T: RenderTarget + ?Sized,
    D: RenderDevice + ?Sized,
{
    let Some(pass) = passes.get(handle.index()) else {
        log::warn!("Skipping execution of invalid pass handle {:?}", handle);
        return None;
    };
    if pass.commands.is_empty() {
        return None;
    }

    if log {
        let dependencies = pass
            .dependencies
            .iter()
            .map(|dep| passes[dep.index()].name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        log::info!(
            "Pass '{}' [RT={}, {} commands, Dependencies: {}]",
            pass.name,
            pass.target.name(),
            pass.commands.len(),
            dependencies
        );
    }

    framepass_core::profile_scope_dynamic!(pass.name.as_str());

    let markers = device.supports_debug_markers();
    if markers {
        device.push_debug_marker(&format!("{} [RT={}]", pass.name, pass.target.name()));
    }

    let pass = &mut passes[handle.index()];
    let target = &pass.target;
    let layers = target.layer_count();

    let issued = if layers > 1 && !device.supports_layered_rendering() {
        for layer in 0..layers {
            target.activate(layer);
            for command in pass.commands.iter_mut() {
                command.execute(layer, log);
            }
        }
        pass.commands.len() * layers as usize
    } else {
        target.activate(0);
        for command in pass.commands.iter_mut() {
            command.execute(0, log);
        }
        pass.commands.len()
    };

    if pass.depth_readback {
        target.prepare_depth_readback();
    }

    if markers {
        device.pop_debug_marker();
    }

    Some(issued)
}
