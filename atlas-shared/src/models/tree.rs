//! Stack-based drop, clone and equality for owned trees.
//!
//! Derived impls on a `Vec<Self>` field recurse once per nesting level, so a
//! long enough reply chain overflows the call stack. Types that nest
//! themselves implement [`Branching`] and route `Drop`, `Clone` and
//! `PartialEq` through the functions here instead.

use std::mem;

pub(crate) trait Branching: Sized {
    fn branches(&self) -> &[Self];
    fn branches_mut(&mut self) -> &mut Vec<Self>;
    /// Copy of this node without its branches.
    fn detached(&self) -> Self;
    /// Compares everything except branches.
    fn same_node(&self, other: &Self) -> bool;
}

/// Empties `node`'s subtree one level at a time. Every node handed to the
/// allocator already has no branches, so nested drops stay shallow.
pub(crate) fn dismantle<T: Branching>(node: &mut T) {
    let mut pending = mem::take(node.branches_mut());
    while let Some(mut next) = pending.pop() {
        pending.append(next.branches_mut());
    }
}

pub(crate) fn deep_clone<T: Branching>(root: &T) -> T {
    // `open[i]` is the copy being filled for the node whose branches `frames[i]` walks.
    let mut open = vec![root.detached()];
    let mut frames: Vec<(&[T], usize)> = vec![(root.branches(), 0)];

    while let Some(&(level, cursor)) = frames.last() {
        let top = frames.len() - 1;
        if let Some(child) = level.get(cursor) {
            frames[top].1 = cursor + 1;
            open.push(child.detached());
            frames.push((child.branches(), 0));
            continue;
        }

        frames.pop();
        if frames.is_empty() {
            break;
        }
        let Some(done) = open.pop() else { break };
        let Some(parent) = open.last_mut() else { break };
        parent.branches_mut().push(done);
    }

    open.pop().unwrap_or_else(|| root.detached())
}

pub(crate) fn deep_eq<T: Branching>(left: &T, right: &T) -> bool {
    let mut pairs = vec![(left, right)];
    while let Some((a, b)) = pairs.pop() {
        if !a.same_node(b) || a.branches().len() != b.branches().len() {
            return false;
        }
        pairs.extend(a.branches().iter().zip(b.branches()));
    }
    true
}
