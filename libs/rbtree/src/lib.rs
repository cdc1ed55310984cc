//! # A red-black tree over pluggable node storage.
//!
//! Red-black trees are *self-balancing binary search trees*: every node is colored red or black,
//! the root is black, no red node has a red child and every path from a node down to an empty
//! position passes through the same number of black nodes. Together these rules keep the height
//! within `2 * log2(n + 1)`, so lookups, insertions and removals are all O(log n).
//!
//! What sets this crate apart is that the balancing engine ([`RedBlackTree`]) never touches memory
//! directly. It only talks to a [`TreeStructure`], a binary tree of positions that can be navigated,
//! written and rotated. Two structures are provided:
//!
//! - [`Standard`] - nodes live in an arena and link to each other by index. Rotations relink three
//!   nodes and are O(1). This is the default and the right choice for most uses.
//! - [`Eytzinger`] - values live in a flat array in breadth-first order, children of index `i` are
//!   found at `2i + 1` and `2i + 2`. Navigation is free of pointer chasing, but every rotation
//!   relabels the rotated subtrees.
//!
//! Ordering is decided by a *less-than* predicate supplied at construction, values that compare
//! equal are kept and placed after the ones already in the tree.
//!
//! This crate is fully `no_std` but requires `alloc`.
//!
//! ## features
//!
//! The following features are available:
//!
//! | Feature | Default | Explanation                                                                                   |
//! |:--------|:--------|:----------------------------------------------------------------------------------------------|
//! | `dot`   | `false` | Enables the `RedBlackTree::dot` method, which allows display of the tree in [graphviz format] |
//!
//! [graphviz format]: https://graphviz.org/doc/info/lang.html

#![cfg_attr(not(test), no_std)]

extern crate alloc;

#[cfg(feature = "dot")]
mod dot;
mod eytzinger;
mod standard;
mod structure;
pub mod traverse;
mod utils;

use crate::traverse::InOrder;
use alloc::collections::TryReserveError;
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::{fmt, mem};

#[cfg(feature = "dot")]
pub use dot::Dot;
pub use eytzinger::Eytzinger;
pub use standard::{NodeId, NodeRef, Standard};
pub use structure::TreeStructure;
pub use utils::Side;

/// Errors that can occur when inserting into a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertError {
    /// The backing storage failed to allocate.
    AllocError,
    /// The tree grew beyond the number of positions its structure can address.
    CapacityOverflow,
}

impl fmt::Display for InsertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertError::AllocError => f.write_str("failed to allocate memory for the tree"),
            InsertError::CapacityOverflow => {
                f.write_str("tree capacity exceeds the addressable range")
            }
        }
    }
}

impl core::error::Error for InsertError {}

impl From<TryReserveError> for InsertError {
    fn from(_: TryReserveError) -> Self {
        Self::AllocError
    }
}

/// The color of a node.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Black,
}

/// What a [`RedBlackTree`] stores in each position of its structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData<T> {
    pub value: T,
    pub color: Color,
}

/// A plain less-than predicate, the default ordering of a [`RedBlackTree`].
pub type Less<T> = fn(&T, &T) -> bool;

/// A red-black tree of `T`, stored in the structure `S` and ordered by the predicate `F`.
///
/// `F` decides the order of the tree: `less(a, b)` must return `true` iff `a` sorts before `b`.
/// Values for which neither `less(a, b)` nor `less(b, a)` holds are considered equal, so the
/// predicate has to be a strict weak ordering.
///
/// Node handles returned by this tree are handles of the underlying structure, see
/// [`TreeStructure`] for how long they stay valid.
///
/// # Example
///
/// ```
/// use rbtree::{Eytzinger, NodeData, RedBlackTree};
///
/// let mut tree: RedBlackTree<u32> = RedBlackTree::default();
/// tree.extend([5, 1, 4, 2, 3]);
/// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 2, 3, 4, 5]);
///
/// // same tree, different storage, reversed order
/// let mut tree = RedBlackTree::new(|a: &u32, b: &u32| a > b, Eytzinger::<NodeData<u32>>::new());
/// tree.extend([5, 1, 4, 2, 3]);
/// assert_eq!(tree.remove(&4), Some(4));
/// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [5, 3, 2, 1]);
/// ```
pub struct RedBlackTree<T, S = Standard<NodeData<T>>, F = Less<T>> {
    structure: S,
    less: F,
    _value: PhantomData<fn() -> T>,
}

impl<T, S> Default for RedBlackTree<T, S, Less<T>>
where
    T: PartialOrd,
    S: TreeStructure<NodeData<T>> + Default,
{
    fn default() -> Self {
        Self::new(<T as PartialOrd>::lt, S::default())
    }
}

impl<T, S, F> RedBlackTree<T, S, F>
where
    S: TreeStructure<NodeData<T>>,
    F: Fn(&T, &T) -> bool,
{
    /// Creates a tree ordered by `less` on top of `structure`.
    ///
    /// `structure` is expected to be empty. Nodes already stored in it are left alone but would have
    /// to satisfy every red-black rule for the tree to behave.
    pub fn new(less: F, structure: S) -> Self {
        Self {
            structure,
            less,
            _value: PhantomData,
        }
    }

    /// Returns a reference to the underlying structure.
    pub fn structure(&self) -> &S {
        &self.structure
    }

    /// Consumes the tree, returning the underlying structure.
    pub fn into_structure(self) -> S {
        self.structure
    }

    /// Returns the root node, which is empty iff the tree is.
    pub fn root(&self) -> S::Node {
        self.structure.root()
    }

    /// Returns the parent of `node` or `None` for the root.
    pub fn parent(&self, node: S::Node) -> Option<S::Node> {
        self.structure.parent(node)
    }

    /// Returns the left child of `node`.
    pub fn left(&self, node: S::Node) -> S::Node {
        self.structure.left(node)
    }

    /// Returns the right child of `node`.
    pub fn right(&self, node: S::Node) -> S::Node {
        self.structure.right(node)
    }

    /// Returns the value stored at `node`, `None` if `node` is empty.
    pub fn get(&self, node: S::Node) -> Option<&T> {
        self.structure.get(node).map(|data| &data.value)
    }

    /// Returns the color of `node`. Empty positions count as black.
    pub fn color(&self, node: S::Node) -> Color {
        self.structure
            .get(node)
            .map_or(Color::Black, |data| data.color)
    }

    /// Returns `true` if `node` holds no value.
    pub fn is_empty(&self, node: S::Node) -> bool {
        self.structure.is_empty(node)
    }

    /// Returns a node holding a value equal to `value`, the first one met on the way down.
    pub fn find(&self, value: &T) -> Option<S::Node> {
        let mut node = self.structure.root();
        while let Some(current) = self.structure.get(node) {
            if (self.less)(value, &current.value) {
                node = self.structure.left(node);
            } else if (self.less)(&current.value, value) {
                node = self.structure.right(node);
            } else {
                return Some(node);
            }
        }
        None
    }

    /// Returns `true` if the tree holds a value equal to `value`.
    pub fn contains(&self, value: &T) -> bool {
        self.find(value).is_some()
    }

    /// Returns the smallest value in the tree.
    pub fn first(&self) -> Option<&T> {
        self.get(utils::find_minimum(&self.structure, self.structure.root()))
    }

    /// Returns the largest value in the tree.
    pub fn last(&self) -> Option<&T> {
        self.get(utils::find_maximum(&self.structure, self.structure.root()))
    }

    /// Returns an iterator over the values of the tree, in order.
    pub fn iter(&self) -> Iter<'_, T, S> {
        Iter {
            inner: InOrder::new(&self.structure),
        }
    }

    /// Inserts `value` into the tree and rebalances it.
    ///
    /// Values equal to ones already in the tree are kept and sort after them. Returns the node
    /// `value` is stored at once rebalancing finished.
    ///
    /// # Panics
    ///
    /// Panics if the structure fails to grow, see [`try_add`][Self::try_add] for a fallible version.
    pub fn add(&mut self, value: T) -> S::Node {
        match self.try_add(value) {
            Ok(node) => node,
            Err(err) => panic!("failed to insert into tree: {err}"),
        }
    }

    /// Inserts `value` into the tree and rebalances it.
    ///
    /// # Errors
    ///
    /// Returns an error if the structure fails to grow. All storage the insertion and the
    /// rebalancing after it need is reserved up front, so the tree is left unchanged in that case.
    pub fn try_add(&mut self, value: T) -> Result<S::Node, InsertError> {
        let mut node = self.structure.root();
        while let Some(current) = self.structure.get(node) {
            node = if (self.less)(&value, &current.value) {
                self.structure.left(node)
            } else {
                self.structure.right(node)
            };
        }

        self.structure.try_reserve_for_insert(node)?;
        let node = self.structure.try_set(
            node,
            NodeData {
                value,
                color: Color::Red,
            },
        )?;

        Ok(self.rebalance_after_insert(node))
    }

    /// Removes one value equal to `value` from the tree and returns it.
    pub fn remove(&mut self, value: &T) -> Option<T> {
        let node = self.find(value)?;
        Some(self.remove_at(node))
    }

    /// Removes and returns the smallest value in the tree.
    pub fn pop_first(&mut self) -> Option<T> {
        let node = utils::find_minimum(&self.structure, self.structure.root());
        if self.structure.is_empty(node) {
            return None;
        }
        Some(self.remove_at(node))
    }

    /// Removes and returns the largest value in the tree.
    pub fn pop_last(&mut self) -> Option<T> {
        let node = utils::find_maximum(&self.structure, self.structure.root());
        if self.structure.is_empty(node) {
            return None;
        }
        Some(self.remove_at(node))
    }

    /// Returns a [`Dot`] representation of the tree for visualization with graphviz.
    #[cfg(feature = "dot")]
    pub fn dot(&self) -> Dot<'_, T, S, F> {
        Dot { tree: self }
    }

    /// Asserts as many of the tree's invariants as possible.
    ///
    /// Checks that children link back to their parents, that the in-order sequence respects the
    /// ordering, that the root is black, that no red node has a red child and that all paths have
    /// the same number of black nodes.
    ///
    /// # Panics
    ///
    /// Panics with a description of the first violated invariant.
    #[track_caller]
    pub fn assert_valid(&self) {
        let root = self.structure.root();
        if self.structure.is_empty(root) {
            return;
        }

        assert_eq!(
            self.structure.parent(root),
            None,
            "root {root:?} has a parent"
        );
        assert_eq!(
            self.color(root),
            Color::Black,
            "red-black violation: root {root:?} is red"
        );

        self.assert_valid_at(root);

        let mut values = self.iter();
        if let Some(mut previous) = values.next() {
            for value in values {
                assert!(
                    !(self.less)(value, previous),
                    "ordering violation: in-order successor sorts before its predecessor"
                );
                previous = value;
            }
        }
    }

    /// Checks the links and colors of the subtree at `node` and returns its black height.
    #[track_caller]
    fn assert_valid_at(&self, node: S::Node) -> usize {
        if self.structure.is_empty(node) {
            return 1;
        }

        let color = self.color(node);
        let mut heights = [0; 2];
        for (height, side) in heights.iter_mut().zip([Side::Left, Side::Right]) {
            let child = self.structure.child(node, side);
            if !self.structure.is_empty(child) {
                assert_eq!(
                    self.structure.parent(child),
                    Some(node),
                    "{side} child {child:?} of {node:?} does not link back to it"
                );
                assert!(
                    color == Color::Black || self.color(child) == Color::Black,
                    "red-black violation: red {node:?} has red {side} child {child:?}"
                );
            }
            *height = self.assert_valid_at(child);
        }

        assert_eq!(
            heights[0], heights[1],
            "red-black violation: black heights below {node:?} differ"
        );
        heights[0] + usize::from(color == Color::Black)
    }

    fn set_color(&mut self, node: S::Node, color: Color) {
        if let Some(data) = self.structure.get_mut(node) {
            data.color = color;
        }
    }

    /// Rotates `node` towards `side`, returning the handle of the position it occupied.
    fn rotate(&mut self, node: S::Node, side: Side) -> S::Node {
        match side {
            Side::Left => self.structure.rotate_left(node),
            Side::Right => self.structure.rotate_right(node),
        }
    }

    /// Restores the red-black rules after the red `inserted` node was stored. Returns the handle
    /// `inserted` is reachable by afterwards.
    fn rebalance_after_insert(&mut self, mut inserted: S::Node) -> S::Node {
        let mut node = inserted;
        loop {
            let Some(parent) = self.structure.parent(node) else {
                self.set_color(node, Color::Black);
                return inserted;
            };
            if self.color(parent) == Color::Black {
                return inserted;
            }
            let Some(grandparent) = self.structure.parent(parent) else {
                self.set_color(parent, Color::Black);
                return inserted;
            };

            let parent_side = utils::side_of(&self.structure, parent, grandparent);
            let uncle = self.structure.child(grandparent, parent_side.opposite());

            if self.color(uncle) == Color::Red {
                tracing::trace!("red uncle {uncle:?}, recoloring and moving up to {grandparent:?}");
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grandparent, Color::Red);
                node = grandparent;
                continue;
            }

            if utils::side_of(&self.structure, node, parent) != parent_side {
                tracing::trace!("{node:?} is an inner grandchild, rotating {parent_side} at {parent:?}");
                inserted = self
                    .structure
                    .follow_rotation(inserted, parent, parent_side);
                self.rotate(parent, parent_side);
            }

            let side = parent_side.opposite();
            tracing::trace!("rotating {side} at {grandparent:?}");
            inserted = self.structure.follow_rotation(inserted, grandparent, side);
            let top = self.rotate(grandparent, side);
            self.set_color(top, Color::Black);
            let demoted = self.structure.child(top, side);
            self.set_color(demoted, Color::Red);
            return inserted;
        }
    }

    /// Removes the value at the non-empty `node`.
    fn remove_at(&mut self, node: S::Node) -> T {
        let left = self.structure.left(node);
        let right = self.structure.right(node);

        // with two children the in-order predecessor moves up to replace `node`
        let target = if self.structure.is_empty(left) || self.structure.is_empty(right) {
            node
        } else {
            utils::find_maximum(&self.structure, left)
        };

        let child = {
            let left = self.structure.left(target);
            if self.structure.is_empty(left) {
                self.structure.right(target)
            } else {
                left
            }
        };

        let mut fixup = None;
        let mut removed = if self.structure.is_empty(child) {
            let position = self
                .structure
                .parent(target)
                .map(|parent| (parent, utils::side_of(&self.structure, target, parent)));
            let Some(removed) = self.structure.take(target) else {
                unreachable!("removal target {target:?} is empty")
            };
            if removed.color == Color::Black {
                fixup = position;
            }
            removed
        } else {
            // a node with a single child is black, the child is a red leaf that takes its value
            let Some(mut removed) = self.structure.take(child) else {
                unreachable!("only child {child:?} of {target:?} is empty")
            };
            if let Some(data) = self.structure.get_mut(target) {
                mem::swap(&mut data.value, &mut removed.value);
            }
            removed
        };

        if target != node {
            if let Some(data) = self.structure.get_mut(node) {
                mem::swap(&mut data.value, &mut removed.value);
            }
        }

        if let Some((parent, side)) = fixup {
            self.rebalance_after_remove(parent, side);
        }

        removed.value
    }

    /// Restores the black height after a black leaf was removed from the `side` of `parent`.
    fn rebalance_after_remove(&mut self, mut parent: S::Node, mut side: Side) {
        loop {
            let node = self.structure.child(parent, side);
            if self.color(node) == Color::Red {
                self.set_color(node, Color::Black);
                return;
            }

            let mut sibling = self.structure.child(parent, side.opposite());
            if self.color(sibling) == Color::Red {
                tracing::trace!("red sibling {sibling:?}, rotating {side} at {parent:?}");
                self.set_color(sibling, Color::Black);
                self.set_color(parent, Color::Red);
                let top = self.rotate(parent, side);
                parent = self.structure.child(top, side);
                sibling = self.structure.child(parent, side.opposite());
            }

            let near = self.structure.child(sibling, side);
            let far = self.structure.child(sibling, side.opposite());

            if self.color(near) == Color::Black && self.color(far) == Color::Black {
                tracing::trace!("black nephews, recoloring {sibling:?} and moving up to {parent:?}");
                self.set_color(sibling, Color::Red);
                match self.structure.parent(parent) {
                    Some(grandparent) => {
                        side = utils::side_of(&self.structure, parent, grandparent);
                        parent = grandparent;
                    }
                    None => {
                        self.set_color(parent, Color::Black);
                        return;
                    }
                }
                continue;
            }

            if self.color(far) == Color::Black {
                let rotation = side.opposite();
                tracing::trace!("near nephew {near:?} is red, rotating {rotation} at {sibling:?}");
                self.set_color(near, Color::Black);
                self.set_color(sibling, Color::Red);
                sibling = self.rotate(sibling, rotation);
            }

            tracing::trace!("far nephew of {sibling:?} is red, rotating {side} at {parent:?}");
            let color = self.color(parent);
            self.set_color(sibling, color);
            self.set_color(parent, Color::Black);
            let far = self.structure.child(sibling, side.opposite());
            self.set_color(far, Color::Black);
            self.rotate(parent, side);
            return;
        }
    }
}

impl<T, S, F> Extend<T> for RedBlackTree<T, S, F>
where
    S: TreeStructure<NodeData<T>>,
    F: Fn(&T, &T) -> bool,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

impl<T, S> FromIterator<T> for RedBlackTree<T, S, Less<T>>
where
    T: PartialOrd,
    S: TreeStructure<NodeData<T>> + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::default();
        tree.extend(iter);
        tree
    }
}

impl<T, S, F> fmt::Debug for RedBlackTree<T, S, F>
where
    T: fmt::Debug,
    S: TreeStructure<NodeData<T>>,
    F: Fn(&T, &T) -> bool,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a, T, S, F> IntoIterator for &'a RedBlackTree<T, S, F>
where
    S: TreeStructure<NodeData<T>>,
    F: Fn(&T, &T) -> bool,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An in-order iterator over the values of a [`RedBlackTree`], returned by
/// [`RedBlackTree::iter`].
pub struct Iter<'a, T, S>
where
    S: TreeStructure<NodeData<T>>,
{
    inner: InOrder<'a, NodeData<T>, S>,
}

impl<'a, T, S> Iterator for Iter<'a, T, S>
where
    S: TreeStructure<NodeData<T>>,
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|data| &data.value)
    }
}

impl<'a, T, S> FusedIterator for Iter<'a, T, S>
where
    S: TreeStructure<NodeData<T>>,
    T: 'a,
{
}
