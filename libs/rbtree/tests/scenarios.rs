mod common;

use rbtree::{Color, NodeData, RedBlackTree, TreeStructure};

use crate::common::{EytzingerTree, StandardTree, trace};

/// Returns `(value, color)` of the root and its two children.
fn top<S>(tree: &RedBlackTree<u32, S>) -> [(Option<u32>, Color); 3]
where
    S: TreeStructure<NodeData<u32>>,
{
    let root = tree.root();
    [root, tree.left(root), tree.right(root)]
        .map(|node| (tree.get(node).copied(), tree.color(node)))
}

fn single_insert<S>(mut tree: RedBlackTree<u32, S>)
where
    S: TreeStructure<NodeData<u32>>,
{
    tree.add(123);
    tree.assert_valid();

    let root = tree.root();
    assert_eq!(tree.get(root), Some(&123));
    assert_eq!(tree.parent(root), None);
    assert!(tree.is_empty(tree.left(root)));
    assert!(tree.is_empty(tree.right(root)));
}

fn second_insert_goes_right<S>(mut tree: RedBlackTree<u32, S>)
where
    S: TreeStructure<NodeData<u32>>,
{
    tree.extend([123, 124]);
    tree.assert_valid();

    let root = tree.root();
    assert_eq!(tree.get(root), Some(&123));
    assert_eq!(tree.get(tree.right(root)), Some(&124));
    assert!(tree.is_empty(tree.left(root)));
}

fn remove_with_predecessor<S>(mut tree: RedBlackTree<u32, S>)
where
    S: TreeStructure<NodeData<u32>>,
{
    tree.extend([3, 1, 5, 2, 4]);
    assert_eq!(tree.remove(&3), Some(3));
    tree.assert_valid();

    assert!(!tree.contains(&3));
    for value in [1, 2, 4, 5] {
        assert!(tree.contains(&value));
    }

    let root = tree.root();
    assert_eq!(tree.get(root), Some(&2));
    assert_eq!(tree.get(tree.left(root)), Some(&1));
    let five = tree.right(root);
    assert_eq!(tree.get(five), Some(&5));
    assert_eq!(tree.get(tree.left(five)), Some(&4));
}

fn remove_absent<S>(mut tree: RedBlackTree<u32, S>)
where
    S: TreeStructure<NodeData<u32>>,
{
    tree.extend([1, 2, 3]);
    let before = top(&tree);
    assert_eq!(tree.remove(&123), None);
    assert_eq!(top(&tree), before);
}

fn ascending_three<S>(mut tree: RedBlackTree<u32, S>)
where
    S: TreeStructure<NodeData<u32>>,
{
    for i in 1..=3 {
        tracing::debug!("adding {i}");
        tree.add(i);
        tree.assert_valid();
    }

    assert_eq!(
        top(&tree),
        [
            (Some(2), Color::Black),
            (Some(1), Color::Red),
            (Some(3), Color::Red)
        ]
    );
}

fn recolor_on_red_uncle<S>(mut tree: RedBlackTree<u32, S>)
where
    S: TreeStructure<NodeData<u32>>,
{
    tree.extend([2, 1, 3, 4]);
    tree.assert_valid();

    assert_eq!(
        top(&tree),
        [
            (Some(2), Color::Black),
            (Some(1), Color::Black),
            (Some(3), Color::Black)
        ]
    );
    let four = tree.right(tree.right(tree.root()));
    assert_eq!((tree.get(four), tree.color(four)), (Some(&4), Color::Red));
}

fn zig_zag<S>(mut tree: RedBlackTree<u32, S>)
where
    S: TreeStructure<NodeData<u32>>,
{
    tree.extend([3, 1, 2]);
    tree.assert_valid();

    assert_eq!(
        top(&tree),
        [
            (Some(2), Color::Black),
            (Some(1), Color::Red),
            (Some(3), Color::Red)
        ]
    );
}

fn remove_from_four<S>(mut tree: RedBlackTree<u32, S>)
where
    S: TreeStructure<NodeData<u32>>,
{
    tree.extend([1, 2, 3, 4]);
    assert_eq!(tree.remove(&3), Some(3));
    tree.assert_valid();

    assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 2, 4]);
    assert_eq!(tree.get(tree.root()), Some(&2));
}

fn drain_in_random_order<S>(mut tree: RedBlackTree<u32, S>)
where
    S: TreeStructure<NodeData<u32>>,
{
    use rand::seq::SliceRandom;

    let mut nums: Vec<u32> = (0..500).collect();
    nums.shuffle(&mut rand::rng());
    tree.extend(nums.iter().copied());
    tree.assert_valid();

    nums.shuffle(&mut rand::rng());
    for (removed, num) in nums.iter().enumerate() {
        assert_eq!(tree.remove(num), Some(*num));
        tree.assert_valid();

        if removed % 50 == 0 {
            for other in &nums[removed + 1..] {
                assert!(tree.contains(other));
            }
        }
    }
    assert!(tree.is_empty(tree.root()));
}

#[test]
fn standard_scenarios() {
    let _trace = trace();

    single_insert(StandardTree::default());
    second_insert_goes_right(StandardTree::default());
    ascending_three(StandardTree::default());
    recolor_on_red_uncle(StandardTree::default());
    zig_zag(StandardTree::default());
    remove_from_four(StandardTree::default());
    remove_with_predecessor(StandardTree::default());
    remove_absent(StandardTree::default());
    drain_in_random_order(StandardTree::default());
}

#[test]
fn eytzinger_scenarios() {
    let _trace = trace();

    single_insert(EytzingerTree::default());
    second_insert_goes_right(EytzingerTree::default());
    ascending_three(EytzingerTree::default());
    recolor_on_red_uncle(EytzingerTree::default());
    zig_zag(EytzingerTree::default());
    remove_from_four(EytzingerTree::default());
    remove_with_predecessor(EytzingerTree::default());
    remove_absent(EytzingerTree::default());
    drain_in_random_order(EytzingerTree::default());
}

#[test]
fn backends_agree_on_shape() {
    let _trace = trace();

    let mut standard = StandardTree::default();
    let mut eytzinger = EytzingerTree::default();
    for i in [50, 20, 80, 10, 30, 70, 90, 25, 35, 5, 1, 27] {
        standard.add(i);
        eytzinger.add(i);
    }
    for i in [20, 90, 50] {
        assert_eq!(standard.remove(&i), eytzinger.remove(&i));
    }

    // walk both trees in lock step
    let mut stack = vec![(standard.root(), eytzinger.root())];
    while let Some((s, e)) = stack.pop() {
        assert_eq!(standard.get(s), eytzinger.get(e));
        assert_eq!(standard.color(s), eytzinger.color(e));
        if !standard.is_empty(s) {
            stack.push((standard.left(s), eytzinger.left(e)));
            stack.push((standard.right(s), eytzinger.right(e)));
        }
    }
}
