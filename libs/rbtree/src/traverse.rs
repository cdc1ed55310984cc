//! Read-only walks over any [`TreeStructure`].
//!
//! None of these helpers mutate the structure, they only use `root`, `left`, `right`, `get` and
//! `is_empty`. All of them are iterative, so degenerate (list-shaped) trees cannot overflow the
//! stack.

use crate::structure::TreeStructure;
use alloc::vec;
use alloc::vec::Vec;
use core::iter::FusedIterator;
use core::marker::PhantomData;

/// An in-order iterator over the values of a [`TreeStructure`].
pub struct InOrder<'a, V, S>
where
    S: TreeStructure<V> + ?Sized,
{
    structure: &'a S,
    /// Nodes whose left subtree has been pushed but who haven't been yielded yet.
    stack: Vec<S::Node>,
    _value: PhantomData<&'a V>,
}

impl<'a, V, S> InOrder<'a, V, S>
where
    S: TreeStructure<V> + ?Sized,
{
    /// Creates an iterator over the whole structure.
    pub fn new(structure: &'a S) -> Self {
        Self::from_node(structure, structure.root())
    }

    /// Creates an iterator over the subtree rooted at `node`.
    pub fn from_node(structure: &'a S, node: S::Node) -> Self {
        let mut this = Self {
            structure,
            stack: Vec::new(),
            _value: PhantomData,
        };
        this.push_left_spine(node);
        this
    }

    fn push_left_spine(&mut self, mut node: S::Node) {
        while !self.structure.is_empty(node) {
            self.stack.push(node);
            node = self.structure.left(node);
        }
    }
}

impl<'a, V, S> Iterator for InOrder<'a, V, S>
where
    S: TreeStructure<V> + ?Sized,
    V: 'a,
{
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        let structure = self.structure;
        let node = self.stack.pop()?;
        self.push_left_spine(structure.right(node));
        structure.get(node)
    }
}

impl<'a, V, S> FusedIterator for InOrder<'a, V, S>
where
    S: TreeStructure<V> + ?Sized,
    V: 'a,
{
}

/// Calls `f` with every value in the structure, in order.
pub fn for_each<V, S, F>(structure: &S, f: F)
where
    S: TreeStructure<V> + ?Sized,
    F: FnMut(&V),
{
    InOrder::new(structure).for_each(f);
}

/// Returns the first node, in pre-order, whose value satisfies `predicate`.
pub fn find_node<V, S, P>(structure: &S, mut predicate: P) -> Option<S::Node>
where
    S: TreeStructure<V> + ?Sized,
    P: FnMut(&V) -> bool,
{
    let root = structure.root();
    if structure.is_empty(root) {
        return None;
    }

    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if structure.get(node).is_some_and(&mut predicate) {
            return Some(node);
        }

        // right first so the left subtree is visited first
        let right = structure.right(node);
        if !structure.is_empty(right) {
            stack.push(right);
        }
        let left = structure.left(node);
        if !structure.is_empty(left) {
            stack.push(left);
        }
    }

    None
}

/// Returns `true` if every value in the structure satisfies `predicate`.
///
/// Returns `true` for an empty structure.
pub fn every<V, S, P>(structure: &S, mut predicate: P) -> bool
where
    S: TreeStructure<V> + ?Sized,
    P: FnMut(&V) -> bool,
{
    find_node(structure, |value| !predicate(value)).is_none()
}

/// Returns `true` if at least one value in the structure satisfies `predicate`.
pub fn some<V, S, P>(structure: &S, predicate: P) -> bool
where
    S: TreeStructure<V> + ?Sized,
    P: FnMut(&V) -> bool,
{
    find_node(structure, predicate).is_some()
}
