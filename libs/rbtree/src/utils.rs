use crate::structure::TreeStructure;
use core::fmt;

/// One of the two child slots of a node.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

impl Side {
    /// Returns the other side.
    #[must_use]
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Returns which child of `parent` the given `node` is.
///
/// Anything that is not the left child of `parent` is reported as the right child, so callers
/// must only pass actual children.
pub(crate) fn side_of<V, S>(structure: &S, node: S::Node, parent: S::Node) -> Side
where
    S: TreeStructure<V> + ?Sized,
{
    if structure.left(parent) == node {
        Side::Left
    } else {
        debug_assert_eq!(
            structure.right(parent),
            node,
            "{node:?} is not a child of {parent:?}"
        );
        Side::Right
    }
}

/// Follows `side` children starting at `node` until the next one would be empty.
///
/// Returns `node` itself if it is empty.
pub(crate) fn find_extreme<V, S>(structure: &S, mut node: S::Node, side: Side) -> S::Node
where
    S: TreeStructure<V> + ?Sized,
{
    if structure.is_empty(node) {
        return node;
    }

    loop {
        let next = structure.child(node, side);
        if structure.is_empty(next) {
            return node;
        }
        node = next;
    }
}

pub(crate) fn find_minimum<V, S>(structure: &S, node: S::Node) -> S::Node
where
    S: TreeStructure<V> + ?Sized,
{
    find_extreme(structure, node, Side::Left)
}

pub(crate) fn find_maximum<V, S>(structure: &S, node: S::Node) -> S::Node
where
    S: TreeStructure<V> + ?Sized,
{
    find_extreme(structure, node, Side::Right)
}
