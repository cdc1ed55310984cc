//! Array-backed tree storage in Eytzinger (breadth-first) order.
//!
//! The root lives at index 0 and the children of index `i` live at `2i + 1` and `2i + 2`, so
//! navigation needs no stored links at all. The price is paid by rotations: moving a subtree one
//! level up or down changes the index of every value inside it, so a rotation costs
//! O(size of the rotated subtree) instead of O(1). Red-black trees only rotate near the point of
//! change and keep their height logarithmic, which bounds that cost, but
//! [`Standard`][crate::Standard] is the better choice for trees that change a lot.
//!
//! # Memory
//!
//! The array is as long as the deepest occupied position requires: `2^(h + 1) - 1` slots for a
//! tree of height `h`. A red-black tree of `n` values may be up to `2 * log2(n + 1)` high, so in
//! the worst case the array needs O(n^2) slots, most of them empty. Ascending input comes close
//! to that bound: 4000 sorted inserts leave an array of about two million slots, and every
//! rotation near the root relabels most of them. In addition, inserting reserves capacity for the
//! level that rebalancing may add below the current deepest one (see
//! [`TreeStructure::try_reserve_for_insert`]), so the allocation can be up to four times the
//! array length.

use crate::InsertError;
use crate::structure::TreeStructure;
use crate::utils::Side;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

/// A tree structure stored in a flat array.
///
/// Handles are plain indices into the array. Unlike [`Standard`][crate::Standard], rotations move
/// values between indices, so a handle always names a *position*, never a particular value.
pub struct Eytzinger<V> {
    slots: Vec<Option<V>>,
}

impl<V> Default for Eytzinger<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for Eytzinger<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.slots
                    .iter()
                    .enumerate()
                    .filter_map(|(idx, slot)| slot.as_ref().map(|value| (idx, value))),
            )
            .finish()
    }
}

#[inline]
fn left_of(index: usize) -> usize {
    index.saturating_mul(2).saturating_add(1)
}

#[inline]
fn right_of(index: usize) -> usize {
    index.saturating_mul(2).saturating_add(2)
}

/// Maps the index `relative` of a subtree laid out on its own onto the absolute index it has when
/// the subtree is rooted at `root`.
///
/// Returns `None` if the absolute index does not fit in a `usize`.
fn relocate(root: usize, relative: usize) -> Option<usize> {
    let depth = relative.checked_add(1)?.ilog2();
    let offset = relative + 1 - (1 << depth);
    let first = root.checked_add(1)?.checked_mul(1 << depth)?;
    (first - 1).checked_add(offset)
}

impl<V> Eytzinger<V> {
    /// Creates a new, empty structure. Does not allocate.
    #[must_use]
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Creates a new, empty structure with room for `capacity` positions.
    ///
    /// # Panics
    ///
    /// Panics if the allocation fails.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        match Self::try_with_capacity(capacity) {
            Ok(this) => this,
            Err(err) => panic!("failed to allocate {capacity} positions: {err}"),
        }
    }

    /// Creates a new, empty structure with room for `capacity` positions.
    ///
    /// # Errors
    ///
    /// Returns an error if the allocation fails.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, InsertError> {
        let mut slots = Vec::new();
        slots.try_reserve(capacity)?;
        Ok(Self { slots })
    }

    /// Returns the number of positions the backing array can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Returns the length of the backing array, including empty positions.
    pub fn array_len(&self) -> usize {
        self.slots.len()
    }

    fn put(&mut self, index: usize, value: V) {
        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, || None);
        }
        self.slots[index] = Some(value);
    }

    /// Drops empty positions from the end of the array.
    fn trim(&mut self) {
        while let Some(None) = self.slots.last() {
            self.slots.pop();
        }
    }

    /// Removes every value of the subtree rooted at `root`.
    ///
    /// The values are returned together with their index relative to `root`, as if the subtree
    /// were stored on its own.
    fn detach(&mut self, root: usize) -> Vec<(usize, V)> {
        let mut values = Vec::new();
        let mut stack = vec![(root, 0)];

        while let Some((absolute, relative)) = stack.pop() {
            let Some(value) = self.slots.get_mut(absolute).and_then(Option::take) else {
                continue;
            };
            values.push((relative, value));
            stack.push((left_of(absolute), left_of(relative)));
            stack.push((right_of(absolute), right_of(relative)));
        }

        values
    }

    /// Stores a subtree returned by [`Self::detach`] at `root`.
    fn attach(&mut self, root: usize, values: Vec<(usize, V)>) {
        for (relative, value) in values {
            let Some(index) = relocate(root, relative) else {
                panic!("subtree moved to {root} exceeds the addressable range");
            };
            self.put(index, value);
        }
    }

    /// Rotates `node` down towards `side`, moving its opposite child up into its position.
    fn rotate(&mut self, node: usize, side: Side) -> usize {
        let pivot = self.child(node, side.opposite());
        if self.is_empty(node) || self.is_empty(pivot) {
            return node;
        }

        let kept = self.detach(self.child(node, side));
        let inner = self.detach(self.child(pivot, side));
        let outer = self.detach(self.child(pivot, side.opposite()));
        tracing::trace!(
            "relabeling {} values to rotate {side} at {node}",
            kept.len() + inner.len() + outer.len() + 2
        );

        let node_value = self.slots[node].take();
        let pivot_value = self.slots[pivot].take();
        let lowered = self.child(node, side);

        if let Some(value) = pivot_value {
            self.put(node, value);
        }
        if let Some(value) = node_value {
            self.put(lowered, value);
        }
        self.attach(self.child(lowered, side), kept);
        self.attach(self.child(lowered, side.opposite()), inner);
        self.attach(pivot, outer);

        self.trim();
        node
    }
}

impl<V> TreeStructure<V> for Eytzinger<V> {
    type Node = usize;

    fn root(&self) -> usize {
        0
    }

    fn parent(&self, node: usize) -> Option<usize> {
        node.checked_sub(1).map(|n| n / 2)
    }

    fn left(&self, node: usize) -> usize {
        left_of(node)
    }

    fn right(&self, node: usize) -> usize {
        right_of(node)
    }

    fn get(&self, node: usize) -> Option<&V> {
        self.slots.get(node).and_then(Option::as_ref)
    }

    fn get_mut(&mut self, node: usize) -> Option<&mut V> {
        self.slots.get_mut(node).and_then(Option::as_mut)
    }

    fn try_set(&mut self, node: usize, value: V) -> Result<usize, InsertError> {
        if node >= self.slots.len() {
            let len = node.checked_add(1).ok_or(InsertError::CapacityOverflow)?;
            self.slots.try_reserve(len - self.slots.len())?;
            self.slots.resize_with(len, || None);
        }
        self.slots[node] = Some(value);
        Ok(node)
    }

    fn try_reserve_for_insert(&mut self, node: usize) -> Result<(), InsertError> {
        let deepest = node.max(self.slots.len().saturating_sub(1));
        let depth = deepest
            .checked_add(1)
            .ok_or(InsertError::CapacityOverflow)?
            .ilog2();
        // rebalancing an insertion pushes a subtree at most one level deeper
        let len = 1usize
            .checked_shl(depth + 2)
            .ok_or(InsertError::CapacityOverflow)?
            - 1;
        if let Some(additional) = len.checked_sub(self.slots.len()) {
            self.slots.try_reserve(additional)?;
        }
        Ok(())
    }

    fn take(&mut self, node: usize) -> Option<V> {
        if self.is_empty(node) {
            return None;
        }

        assert!(
            self.is_empty(left_of(node)) && self.is_empty(right_of(node)),
            "cannot take the value at {node}, it still has children"
        );

        let value = self.slots[node].take();
        self.trim();
        value
    }

    fn rotate_left(&mut self, node: usize) -> usize {
        self.rotate(node, Side::Left)
    }

    fn rotate_right(&mut self, node: usize) -> usize {
        self.rotate(node, Side::Right)
    }

    fn follow_rotation(&self, handle: usize, node: usize, side: Side) -> usize {
        // path from `node` down to `handle`
        let mut path = Vec::new();
        let mut current = handle;
        while current > node {
            let parent = (current - 1) / 2;
            path.push(if current == left_of(parent) {
                Side::Left
            } else {
                Side::Right
            });
            current = parent;
        }
        if current != node {
            // not part of the rotated subtree
            return handle;
        }
        path.reverse();

        let down = side;
        let up = side.opposite();
        let moved: Vec<Side> = match path.as_slice() {
            // the rotated node moves one level down
            [] => vec![down],
            // so does the subtree it keeps
            [first, rest @ ..] if *first == down => [down, down].iter().chain(rest).copied().collect(),
            // the pivot takes its place
            [_] => Vec::new(),
            // the inner subtree of the pivot switches sides
            [_, second, rest @ ..] if *second == down => {
                [down, up].iter().chain(rest).copied().collect()
            }
            // the outer subtree of the pivot moves one level up
            [_, _, rest @ ..] => [up].iter().chain(rest).copied().collect(),
        };

        moved
            .into_iter()
            .fold(node, |position, side| self.child(position, side))
    }
}
