//! Pointer-linked tree storage.
//!
//! Nodes live in an arena and refer to each other through [`NodeId`] indices instead of
//! references, which side-steps the ownership problems of parent back-links. Freed arena slots
//! are threaded onto a free list and reused by later insertions.

use crate::InsertError;
use crate::structure::TreeStructure;
use crate::utils::Side;
use alloc::vec::Vec;
use core::{fmt, mem};

/// Index of a node in the arena of a [`Standard`] structure.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Handle to a position in a [`Standard`] structure.
///
/// Positions that hold no value are not backed by an arena node. They are described by where a
/// node *would* be attached, and only turn into a node when a value is stored there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRef {
    /// A position backed by an arena node.
    Occupied(NodeId),
    /// The root position of an empty tree.
    VacantRoot,
    /// The empty `side` child position of `parent`.
    VacantChild { parent: NodeId, side: Side },
}

struct Node<V> {
    value: V,
    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

impl<V> Node<V> {
    #[inline]
    fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    fn replace_child(&mut self, side: Side, child: Option<NodeId>) -> Option<NodeId> {
        match side {
            Side::Left => mem::replace(&mut self.left, child),
            Side::Right => mem::replace(&mut self.right, child),
        }
    }

    #[inline]
    fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

enum Slot<V> {
    Occupied(Node<V>),
    Free { next: Option<NodeId> },
}

/// A tree structure made of explicitly linked nodes.
///
/// Every node records its parent, left and right child, which makes rotations O(1): they only
/// re-link a handful of indices. Values never move between nodes during a rotation, so the
/// [`NodeRef`] of a value stays valid until the value is removed.
pub struct Standard<V> {
    slots: Vec<Slot<V>>,
    free: Option<NodeId>,
    root: Option<NodeId>,
}

impl<V> Default for Standard<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for Standard<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Standard")
            .field("slots", &self.slots.len())
            .field("free", &self.free)
            .field("root", &self.root)
            .finish()
    }
}

impl<V> Standard<V> {
    /// Creates a new, empty structure. Does not allocate.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: None,
            root: None,
        }
    }

    /// Creates a new, empty structure with room for at least `capacity` nodes.
    ///
    /// # Panics
    ///
    /// Panics if the allocation fails.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        match Self::try_with_capacity(capacity) {
            Ok(this) => this,
            Err(err) => panic!("failed to allocate {capacity} nodes: {err}"),
        }
    }

    /// Creates a new, empty structure with room for at least `capacity` nodes.
    ///
    /// # Errors
    ///
    /// Returns an error if the allocation fails.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, InsertError> {
        let mut slots = Vec::new();
        slots.try_reserve(capacity)?;
        Ok(Self {
            slots,
            free: None,
            root: None,
        })
    }

    #[inline]
    #[track_caller]
    fn node(&self, id: NodeId) -> &Node<V> {
        match &self.slots[id.index()] {
            Slot::Occupied(node) => node,
            Slot::Free { .. } => unreachable!("{id:?} refers to a freed node"),
        }
    }

    #[inline]
    #[track_caller]
    fn node_mut(&mut self, id: NodeId) -> &mut Node<V> {
        match &mut self.slots[id.index()] {
            Slot::Occupied(node) => node,
            Slot::Free { .. } => unreachable!("{id:?} refers to a freed node"),
        }
    }

    fn allocate(&mut self, node: Node<V>) -> Result<NodeId, InsertError> {
        if let Some(id) = self.free {
            let slot = mem::replace(&mut self.slots[id.index()], Slot::Occupied(node));
            let Slot::Free { next } = slot else {
                unreachable!("free list entry {id:?} is occupied");
            };
            self.free = next;
            return Ok(id);
        }

        let id = u32::try_from(self.slots.len())
            .map(NodeId)
            .map_err(|_| InsertError::CapacityOverflow)?;
        if self.slots.len() == self.slots.capacity() {
            tracing::trace!("arena full at {} nodes, growing...", self.slots.len());
        }
        self.slots.try_reserve(1)?;
        self.slots.push(Slot::Occupied(node));
        Ok(id)
    }

    fn release(&mut self, id: NodeId) -> V {
        let slot = mem::replace(&mut self.slots[id.index()], Slot::Free { next: self.free });
        self.free = Some(id);
        match slot {
            Slot::Occupied(node) => node.value,
            Slot::Free { .. } => unreachable!("{id:?} was released twice"),
        }
    }

    /// Points whatever referred to `old` (its parent's child slot or the root) at `new`.
    fn replace_in_parent(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        if let Some(parent) = parent {
            let parent_node = self.node_mut(parent);
            if parent_node.left == Some(old) {
                parent_node.left = new;
            } else {
                debug_assert_eq!(parent_node.right, Some(old));
                parent_node.right = new;
            }
        } else {
            self.root = new;
        }
    }

    /// Rotates `node` down towards `side`, moving its opposite child up into its position.
    fn rotate(&mut self, node: NodeRef, side: Side) -> NodeRef {
        let NodeRef::Occupied(x) = node else {
            return node;
        };
        let Some(y) = self.node(x).child(side.opposite()) else {
            return node;
        };

        let parent = self.node(x).parent;

        // the `side` subtree of y changes sides and becomes x's `side.opposite()` subtree
        let inner = self.node_mut(y).replace_child(side, Some(x));
        self.node_mut(x).replace_child(side.opposite(), inner);
        if let Some(inner) = inner {
            self.node_mut(inner).parent = Some(x);
        }

        // y takes x's place
        self.node_mut(x).parent = Some(y);
        self.node_mut(y).parent = parent;
        self.replace_in_parent(parent, x, Some(y));

        NodeRef::Occupied(y)
    }
}

impl<V> TreeStructure<V> for Standard<V> {
    type Node = NodeRef;

    fn root(&self) -> NodeRef {
        self.root.map_or(NodeRef::VacantRoot, NodeRef::Occupied)
    }

    fn parent(&self, node: NodeRef) -> Option<NodeRef> {
        match node {
            NodeRef::Occupied(id) => self.node(id).parent.map(NodeRef::Occupied),
            NodeRef::VacantRoot => None,
            NodeRef::VacantChild { parent, .. } => Some(NodeRef::Occupied(parent)),
        }
    }

    fn left(&self, node: NodeRef) -> NodeRef {
        self.child(node, Side::Left)
    }

    fn right(&self, node: NodeRef) -> NodeRef {
        self.child(node, Side::Right)
    }

    fn child(&self, node: NodeRef, side: Side) -> NodeRef {
        match node {
            NodeRef::Occupied(id) => match self.node(id).child(side) {
                Some(child) => NodeRef::Occupied(child),
                None => NodeRef::VacantChild { parent: id, side },
            },
            vacant => vacant,
        }
    }

    fn get(&self, node: NodeRef) -> Option<&V> {
        match node {
            NodeRef::Occupied(id) => Some(&self.node(id).value),
            _ => None,
        }
    }

    fn get_mut(&mut self, node: NodeRef) -> Option<&mut V> {
        match node {
            NodeRef::Occupied(id) => Some(&mut self.node_mut(id).value),
            _ => None,
        }
    }

    fn is_empty(&self, node: NodeRef) -> bool {
        !matches!(node, NodeRef::Occupied(_))
    }

    fn try_set(&mut self, node: NodeRef, value: V) -> Result<NodeRef, InsertError> {
        let parent = match node {
            NodeRef::Occupied(id) => {
                self.node_mut(id).value = value;
                return Ok(node);
            }
            NodeRef::VacantRoot => {
                debug_assert!(self.root.is_none(), "stale vacant root handle");
                None
            }
            NodeRef::VacantChild { parent, side } => {
                debug_assert!(
                    self.node(parent).child(side).is_none(),
                    "stale vacant {side} child handle of {parent:?}"
                );
                Some((parent, side))
            }
        };

        let id = self.allocate(Node {
            value,
            parent: parent.map(|(parent, _)| parent),
            left: None,
            right: None,
        })?;

        match parent {
            Some((parent, side)) => {
                self.node_mut(parent).replace_child(side, Some(id));
            }
            None => self.root = Some(id),
        }

        Ok(NodeRef::Occupied(id))
    }

    fn take(&mut self, node: NodeRef) -> Option<V> {
        let NodeRef::Occupied(id) = node else {
            return None;
        };

        let node = self.node(id);
        assert!(
            node.is_leaf(),
            "cannot take the value of {id:?}, it still has children"
        );

        let parent = node.parent;
        self.replace_in_parent(parent, id, None);
        Some(self.release(id))
    }

    fn rotate_left(&mut self, node: NodeRef) -> NodeRef {
        self.rotate(node, Side::Left)
    }

    fn rotate_right(&mut self, node: NodeRef) -> NodeRef {
        self.rotate(node, Side::Right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    /// root 2, left 1, right 3
    fn three() -> Standard<u32> {
        let mut s = Standard::new();
        let root = s.set(s.root(), 2);
        s.set(s.left(root), 1);
        s.set(s.right(root), 3);
        s
    }

    fn in_order(s: &Standard<u32>) -> Vec<u32> {
        let mut out = Vec::new();
        crate::traverse::for_each(s, |v| out.push(*v));
        out
    }

    #[test]
    fn empty_root() {
        let s: Standard<u32> = Standard::new();
        assert!(s.is_empty(s.root()));
        assert_eq!(s.root(), NodeRef::VacantRoot);
        assert_eq!(s.parent(s.root()), None);
    }

    #[test]
    fn single_value() {
        let mut s = Standard::new();
        s.set(s.root(), 123);

        let root = s.root();
        assert_eq!(s.get(root), Some(&123));
        assert!(s.is_empty(s.left(root)));
        assert!(s.is_empty(s.right(root)));
        assert_eq!(s.parent(s.left(root)), Some(root));
        assert_eq!(s.parent(s.right(root)), Some(root));
        assert_eq!(s.parent(root), None);
    }

    #[test]
    fn children_point_back_to_parent() {
        let s = three();
        let root = s.root();
        assert!(!s.is_empty(s.left(root)));
        assert!(!s.is_empty(s.right(root)));
        assert_eq!(s.parent(s.left(root)), Some(root));
        assert_eq!(s.parent(s.right(root)), Some(root));
    }

    #[test]
    fn vacant_children_are_not_materialized() {
        let s: Standard<u32> = Standard::new();
        let left = s.left(s.root());
        assert_eq!(left, NodeRef::VacantRoot);
        assert!(s.slots.is_empty());
    }

    #[test]
    fn rotate_empty_is_noop() {
        let mut s: Standard<u32> = Standard::new();
        let root = s.root();
        assert_eq!(s.rotate_left(root), root);
        assert_eq!(s.rotate_right(root), root);
        assert!(s.is_empty(s.root()));
    }

    #[test]
    fn rotate_single_is_noop() {
        let mut s = Standard::new();
        let root = s.set(s.root(), 123);
        s.rotate_left(root);
        s.rotate_right(root);

        assert_eq!(s.root(), root);
        assert_eq!(s.get(root), Some(&123));
        assert!(s.is_empty(s.left(root)));
        assert!(s.is_empty(s.right(root)));
    }

    #[test]
    fn rotate_left_promotes_right_child() {
        let mut s = Standard::new();
        let old_root = s.set(s.root(), 123);
        s.set(s.right(old_root), 124);

        let top = s.rotate_left(old_root);

        let root = s.root();
        assert_eq!(top, root);
        assert_eq!(s.get(root), Some(&124));
        assert_eq!(s.left(root), old_root);
        assert_eq!(s.parent(old_root), Some(root));
        assert_eq!(s.parent(root), None);
        assert!(s.is_empty(s.right(root)));
        assert!(s.is_empty(s.left(old_root)));
        assert!(s.is_empty(s.right(old_root)));
    }

    #[test]
    fn rotate_left_without_right_child_is_noop() {
        let mut s = Standard::new();
        let root = s.set(s.root(), 123);
        let left = s.set(s.left(root), 122);

        assert_eq!(s.rotate_left(root), root);

        assert_eq!(s.root(), root);
        assert_eq!(s.left(root), left);
        assert_eq!(s.parent(left), Some(root));
        assert!(s.is_empty(s.right(root)));
    }

    #[test]
    fn rotate_right_promotes_left_child() {
        let mut s = Standard::new();
        let old_root = s.set(s.root(), 123);
        s.set(s.left(old_root), 122);

        s.rotate_right(old_root);

        let root = s.root();
        assert_eq!(s.get(root), Some(&122));
        assert_eq!(s.right(root), old_root);
        assert_eq!(s.parent(old_root), Some(root));
        assert!(s.is_empty(s.left(root)));
    }

    #[test]
    fn rotate_inner_node_relinks_parent() {
        // 4 -> (2 -> (1, 3), 5), rotate right at 2
        let mut s = Standard::new();
        let root = s.set(s.root(), 4);
        let two = s.set(s.left(root), 2);
        s.set(s.right(root), 5);
        let one = s.set(s.left(two), 1);
        let three = s.set(s.right(two), 3);

        let top = s.rotate_right(two);

        assert_eq!(top, one);
        assert_eq!(s.root(), root);
        assert_eq!(s.left(root), one);
        assert_eq!(s.parent(one), Some(root));
        assert_eq!(s.right(one), two);
        assert!(s.is_empty(s.left(two)));
        assert_eq!(s.right(two), three);
        assert_eq!(s.parent(three), Some(two));
        assert_eq!(in_order(&s), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn rotate_left_then_right_restores_shape() {
        let mut s = Standard::new();
        let root = s.set(s.root(), 4);
        let two = s.set(s.left(root), 2);
        let six = s.set(s.right(root), 6);
        let one = s.set(s.left(two), 1);
        let three = s.set(s.right(two), 3);
        let five = s.set(s.left(six), 5);
        let seven = s.set(s.right(six), 7);

        let top = s.rotate_left(root);
        assert_eq!(top, six);
        let top = s.rotate_right(top);
        assert_eq!(top, root);

        assert_eq!(s.root(), root);
        assert_eq!((s.left(root), s.right(root)), (two, six));
        assert_eq!((s.left(two), s.right(two)), (one, three));
        assert_eq!((s.left(six), s.right(six)), (five, seven));
        assert_eq!(s.parent(five), Some(six));
        assert_eq!(s.parent(three), Some(two));
        assert_eq!(in_order(&s), vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn take_leaf_frees_slot() {
        let mut s = three();
        let root = s.root();
        let left = s.left(root);

        assert_eq!(s.take(left), Some(1));
        assert!(s.is_empty(s.left(root)));

        // the freed slot is reused
        let again = s.set(s.left(root), 0);
        assert_eq!(again, left);
        assert_eq!(s.slots.len(), 3);
    }

    #[test]
    fn take_root_leaf_empties_tree() {
        let mut s = Standard::new();
        let root = s.set(s.root(), 1);
        assert_eq!(s.take(root), Some(1));
        assert_eq!(s.root(), NodeRef::VacantRoot);
        assert_eq!(s.take(s.root()), None);
    }

    #[test]
    #[should_panic(expected = "still has children")]
    fn take_inner_node_panics() {
        let mut s = three();
        s.take(s.root());
    }

    #[test]
    fn pop_min_drains_in_order() {
        let mut s = Standard::new();
        // 5 -> (1 -> (_, 3 -> (2, 4)), 6)
        let root = s.set(s.root(), 5);
        let one = s.set(s.left(root), 1);
        s.set(s.right(root), 6);
        let three = s.set(s.right(one), 3);
        s.set(s.left(three), 2);
        s.set(s.right(three), 4);

        let mut popped = Vec::new();
        while let Some(v) = s.pop_min(s.root()) {
            popped.push(v);
        }

        assert_eq!(popped, vec![1, 2, 3, 4, 5, 6]);
        assert!(s.is_empty(s.root()));
        assert_eq!(s.pop_min(s.root()), None);
    }

    #[test]
    fn pop_max_of_subtree() {
        let mut s = three();
        let left = s.left(s.root());
        assert_eq!(s.pop_max(left), Some(1));
        assert_eq!(s.pop_max(s.left(s.root())), None);
        assert_eq!(s.pop_max(s.root()), Some(3));
        assert_eq!(in_order(&s), vec![2]);
    }
}
