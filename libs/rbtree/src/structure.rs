use crate::InsertError;
use crate::utils::{self, Side};
use alloc::vec::Vec;
use core::{fmt, mem};

/// The physical layout a [`RedBlackTree`][crate::RedBlackTree] is stored in.
///
/// A tree structure is a binary tree of *positions*. Every position is addressed by a
/// [`Node`][TreeStructure::Node] handle and either holds a value or is *empty*. Empty positions
/// are still navigable: asking for the left or right child of any node always returns a handle,
/// which is empty if no value was stored there yet. Storing a value into such a position through
/// [`set`][TreeStructure::set] is what materializes it.
///
/// Two implementations ship with this crate:
///
/// - [`Standard`][crate::Standard] - an arena of nodes linked by parent/left/right indices.
///   Rotations are O(1).
/// - [`Eytzinger`][crate::Eytzinger] - a flat array where the children of position `i` live at
///   `2i + 1` and `2i + 2`. Navigation is pure arithmetic, but rotations have to move every value
///   of the rotated subtrees to a new index range.
///
/// # Handles
///
/// Handles are only meaningful to the structure instance that produced them. Mutating operations
/// (`set` on an empty position, `take`, rotations and pops) may invalidate handles. In particular
/// the root can change identity during a rotation, so always re-fetch [`root`][TreeStructure::root]
/// after mutating the structure instead of caching it.
pub trait TreeStructure<V> {
    /// Handle addressing a position in the tree.
    type Node: Copy + Eq + fmt::Debug;

    /// Returns the root position. The root is empty iff the tree holds no values.
    fn root(&self) -> Self::Node;

    /// Returns the parent of `node` or `None` if `node` is the root position.
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Returns the left child position of `node`.
    ///
    /// The children of an empty position are empty.
    fn left(&self, node: Self::Node) -> Self::Node;

    /// Returns the right child position of `node`.
    ///
    /// The children of an empty position are empty.
    fn right(&self, node: Self::Node) -> Self::Node;

    /// Returns the `side` child position of `node`.
    fn child(&self, node: Self::Node, side: Side) -> Self::Node {
        match side {
            Side::Left => self.left(node),
            Side::Right => self.right(node),
        }
    }

    /// Returns a reference to the value stored at `node`, `None` if the position is empty.
    fn get(&self, node: Self::Node) -> Option<&V>;

    /// Returns a mutable reference to the value stored at `node`, `None` if the position is empty.
    fn get_mut(&mut self, node: Self::Node) -> Option<&mut V>;

    /// Returns `true` if no value is stored at `node`.
    fn is_empty(&self, node: Self::Node) -> bool {
        self.get(node).is_none()
    }

    /// Stores `value` at `node`, replacing any previous value.
    ///
    /// Returns the handle by which the position is addressed from now on. For empty positions this
    /// may differ from `node`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage could not grow to hold the position.
    fn try_set(&mut self, node: Self::Node, value: V) -> Result<Self::Node, InsertError>;

    /// Reserves the storage needed to store a value at the empty position `node` and to then
    /// rebalance the tree with rotations along the path to the root.
    ///
    /// After this succeeds neither [`try_set`][TreeStructure::try_set] at `node` nor the rotations
    /// that follow it need to allocate more than what is already reserved. Structures whose
    /// rotations never allocate, like [`Standard`][crate::Standard], have nothing to reserve, which
    /// is the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage could not grow.
    fn try_reserve_for_insert(&mut self, _node: Self::Node) -> Result<(), InsertError> {
        Ok(())
    }

    /// Stores `value` at `node`, replacing any previous value.
    ///
    /// See [`try_set`][TreeStructure::try_set] for details.
    ///
    /// # Panics
    ///
    /// Panics if the backing storage could not grow to hold the position.
    fn set(&mut self, node: Self::Node, value: V) -> Self::Node {
        match self.try_set(node, value) {
            Ok(node) => node,
            Err(err) => panic!("failed to store value at {node:?}: {err}"),
        }
    }

    /// Removes the value stored at the leaf position `node`, turning it into an empty position.
    ///
    /// Returns `None` if `node` is already empty.
    ///
    /// # Panics
    ///
    /// Panics if `node` has a non-empty child, removing it would disconnect its subtree.
    fn take(&mut self, node: Self::Node) -> Option<V>;

    /// Performs a left rotation around `node`.
    ///
    /// The right child of `node` takes its position, `node` becomes the left child of its former
    /// right child and the left subtree of that child becomes the right subtree of `node`. The
    /// in-order sequence of values is unchanged.
    ///
    /// Returns the handle of the position `node` occupied before the rotation, which now holds the
    /// former right child. If `node` is empty or has an empty right child nothing happens and
    /// `node` is returned.
    fn rotate_left(&mut self, node: Self::Node) -> Self::Node;

    /// Performs a right rotation around `node`, the mirror image of
    /// [`rotate_left`][TreeStructure::rotate_left].
    fn rotate_right(&mut self, node: Self::Node) -> Self::Node;

    /// Returns the handle under which the value addressed by `handle` can be found after rotating
    /// `node` towards `side` (`Side::Left` for [`rotate_left`][TreeStructure::rotate_left]).
    ///
    /// Structures whose handles follow values through rotations, like
    /// [`Standard`][crate::Standard], return `handle` unchanged, which is the default.
    fn follow_rotation(&self, handle: Self::Node, _node: Self::Node, _side: Side) -> Self::Node {
        handle
    }

    /// Removes and returns the minimum value of the subtree rooted at `node`.
    ///
    /// Values below the minimum are shifted up one level at a time until a leaf can be cleared.
    /// Returns `None` if the subtree is empty.
    fn pop_min(&mut self, node: Self::Node) -> Option<V> {
        pop_extreme(self, node, Side::Left)
    }

    /// Removes and returns the maximum value of the subtree rooted at `node`.
    ///
    /// Returns `None` if the subtree is empty.
    fn pop_max(&mut self, node: Self::Node) -> Option<V> {
        pop_extreme(self, node, Side::Right)
    }
}

fn pop_extreme<V, S>(structure: &mut S, node: S::Node, side: Side) -> Option<V>
where
    S: TreeStructure<V> + ?Sized,
{
    if structure.is_empty(node) {
        return None;
    }

    // Every position in the chain hands its value to the one before it. The chain starts at the
    // extreme of the subtree and continues with the extreme of each other-side subtree, the last
    // entry is always a leaf.
    let mut chain = Vec::new();
    let mut current = utils::find_extreme(structure, node, side);
    loop {
        chain.push(current);

        let other = structure.child(current, side.opposite());
        if structure.is_empty(other) {
            break;
        }
        current = utils::find_extreme(structure, other, side);
    }

    let leaf = chain.pop()?;
    let mut carried = structure.take(leaf)?;
    for position in chain.into_iter().rev() {
        if let Some(value) = structure.get_mut(position) {
            mem::swap(value, &mut carried);
        }
    }

    Some(carried)
}
