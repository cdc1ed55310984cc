use crate::utils::Side;
use crate::{Color, NodeData, RedBlackTree, TreeStructure};
use alloc::format;
use alloc::vec;
use core::fmt;

/// Displays a [`RedBlackTree`] in [graphviz format](https://graphviz.org/doc/info/lang.html).
pub struct Dot<'a, T, S, F> {
    pub(crate) tree: &'a RedBlackTree<T, S, F>,
}

impl<T, S, F> Dot<'_, T, S, F>
where
    T: fmt::Debug,
    S: TreeStructure<NodeData<T>>,
    F: Fn(&T, &T) -> bool,
{
    fn node_fmt(&self, f: &mut fmt::Formatter, node: S::Node) -> fmt::Result {
        let Some(value) = self.tree.get(node) else {
            return Ok(());
        };
        let label = format!("{value:?}");
        let color = match self.tree.color(node) {
            Color::Red => "red",
            Color::Black => "black",
        };
        writeln!(f, r#"  "{node:?}" [label={label:?}, color={color}];"#)?;

        for side in [Side::Left, Side::Right] {
            let child = self.tree.structure().child(node, side);
            if !self.tree.is_empty(child) {
                writeln!(f, r#"  "{node:?}" -> "{child:?}" [label="{side}"];"#)?;
            }
        }

        Ok(())
    }
}

impl<T, S, F> fmt::Display for Dot<'_, T, S, F>
where
    T: fmt::Debug,
    S: TreeStructure<NodeData<T>>,
    F: Fn(&T, &T) -> bool,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "digraph {{")?;

        let root = self.tree.root();
        let mut stack = if self.tree.is_empty(root) {
            vec![]
        } else {
            vec![root]
        };
        while let Some(node) = stack.pop() {
            self.node_fmt(f, node)?;
            for side in [Side::Right, Side::Left] {
                let child = self.tree.structure().child(node, side);
                if !self.tree.is_empty(child) {
                    stack.push(child);
                }
            }
        }

        f.write_str("}")
    }
}

impl<T, S, F> fmt::Debug for Dot<'_, T, S, F>
where
    T: fmt::Debug,
    S: TreeStructure<NodeData<T>>,
    F: Fn(&T, &T) -> bool,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use crate::RedBlackTree;

    #[test]
    fn dot_lists_nodes_and_edges() {
        let tree: RedBlackTree<u32> = [1, 2, 3].into_iter().collect();
        let dot = tree.dot().to_string();

        assert!(dot.starts_with("digraph {"));
        assert!(dot.ends_with('}'));
        assert_eq!(dot.matches("color=black").count(), 1);
        assert_eq!(dot.matches("color=red").count(), 2);
        assert_eq!(dot.matches("->").count(), 2);
        assert!(dot.contains(r#"label="left""#));
        assert!(dot.contains(r#"label="right""#));
    }
}
