//! Draw order within a finalized pass.
//!
//! Commands are sorted to balance legacy visual correctness against GPU
//! efficiency. The rules, in priority order (first decisive rule wins):
//!
//! 1. Clears and copies before any draw.
//! 2. Overlay/UI draws after everything else.
//! 3. Depth-disabling occluders before all remaining draws.
//! 4. Transparent draws after opaque ones, back to front among themselves.
//!    Equal depths keep submission order so blending is stable across frames.
//! 5. Opaque draws whose depths differ by more than the background threshold
//!    are sorted back to front. Content with a very high depth bias (legacy
//!    backgrounds) is drawn before the rest of the opaque geometry.
//! 6. Shader technique, descending, to limit shader switches.
//! 7. Depth ascending (front to back) to benefit from early depth rejection.
//! 8. Mesh buffer sort key, ascending, when both are mesh draws.
//! 9. Render state key, ascending.

use std::cmp::Ordering;

use super::RenderCommand;

/// Depth difference above which two opaque draws are ordered back to front.
pub const DEFAULT_BACKGROUND_DEPTH_THRESHOLD: f32 = 50000.0;

/// Stable sorter for the commands of a single pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommandOrderer {
    background_depth_threshold: f32,
}

impl Default for CommandOrderer {
    fn default() -> Self {
        Self::new(DEFAULT_BACKGROUND_DEPTH_THRESHOLD)
    }
}

impl CommandOrderer {
    /// Create an orderer with a custom background depth threshold.
    pub fn new(background_depth_threshold: f32) -> Self {
        Self {
            background_depth_threshold,
        }
    }

    /// The depth difference above which opaque draws are sorted back to front.
    pub fn background_depth_threshold(&self) -> f32 {
        self.background_depth_threshold
    }

    /// Compare two commands. `Less` means `a` is issued before `b`.
    pub fn compare<C: RenderCommand>(&self, a: &C, b: &C) -> Ordering {
        match (a.is_draw(), b.is_draw()) {
            (false, false) => return Ordering::Equal,
            (false, true) => return Ordering::Less,
            (true, false) => return Ordering::Greater,
            (true, true) => {}
        }

        match (a.is_overlay(), b.is_overlay()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            (false, false) => {}
        }

        match (a.is_depth_disabling_occluder(), b.is_depth_disabling_occluder()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            (false, false) => {}
        }

        match (a.is_transparent(), b.is_transparent()) {
            (true, true) => return compare_depth(b.depth(), a.depth()),
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            (false, false) => {}
        }

        // Both opaque from here on.
        if (a.depth() - b.depth()).abs() > self.background_depth_threshold {
            return compare_depth(b.depth(), a.depth());
        }

        b.shader_technique()
            .cmp(&a.shader_technique())
            .then_with(|| compare_depth(a.depth(), b.depth()))
            .then_with(|| match (a.mesh_sort_key(), b.mesh_sort_key()) {
                (Some(ka), Some(kb)) => ka.cmp(&kb),
                _ => Ordering::Equal,
            })
            .then_with(|| a.render_state().cmp(&b.render_state()))
    }

    /// Sort a pass's commands in place.
    ///
    /// The sort is stable. It is a merge sort over indices instead of
    /// `slice::sort_by`: the background rule can make the comparison
    /// non-transitive for some inputs, and the standard sorts may panic on
    /// such comparators.
    pub fn sort<C: RenderCommand>(&self, commands: &mut Vec<C>) {
        if commands.len() < 2 {
            return;
        }
        framepass_core::profile_scope!("sort_commands");

        let order = stable_order(commands.as_slice(), |a, b| self.compare(a, b));
        if order.iter().enumerate().all(|(pos, &index)| pos == index) {
            return;
        }

        let mut slots: Vec<Option<C>> = commands.drain(..).map(Some).collect();
        commands.extend(order.into_iter().filter_map(|index| slots[index].take()));
    }
}

/// Depth comparison where equal depths (including `-0.0`/`0.0`) compare equal.
fn compare_depth(a: f32, b: f32) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Bottom-up merge sort returning the sorted permutation of `items`.
///
/// An element from the right run is only taken first when it compares
/// strictly less, which keeps equal elements in submission order.
fn stable_order<C>(items: &[C], mut compare: impl FnMut(&C, &C) -> Ordering) -> Vec<usize> {
    let len = items.len();
    let mut order: Vec<usize> = (0..len).collect();
    let mut scratch = vec![0usize; len];

    let mut width = 1;
    while width < len {
        let mut start = 0;
        while start < len {
            let mid = (start + width).min(len);
            let end = (start + 2 * width).min(len);
            let (left, right) = order[start..end].split_at(mid - start);
            let out = &mut scratch[start..end];

            let (mut i, mut j, mut k) = (0, 0, 0);
            while i < left.len() && j < right.len() {
                if compare(&items[right[j]], &items[left[i]]) == Ordering::Less {
                    out[k] = right[j];
                    j += 1;
                } else {
                    out[k] = left[i];
                    i += 1;
                }
                k += 1;
            }
            out[k..k + left.len() - i].copy_from_slice(&left[i..]);
            k += left.len() - i;
            out[k..].copy_from_slice(&right[j..]);

            start = end;
        }
        std::mem::swap(&mut order, &mut scratch);
        width *= 2;
    }

    order
}
