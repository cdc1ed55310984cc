#![no_main]

use libfuzzer_sys::fuzz_target;
use rbtree::{Eytzinger, RedBlackTree};

fuzz_target!(|inserts: Vec<u16>| {
    let mut standard: RedBlackTree<u16> = RedBlackTree::default();
    let mut eytzinger: RedBlackTree<u16, Eytzinger<_>> = RedBlackTree::default();

    for i in inserts {
        let node = standard.add(i);
        assert_eq!(standard.get(node), Some(&i));
        standard.assert_valid();

        let node = eytzinger.add(i);
        assert_eq!(eytzinger.get(node), Some(&i));
        eytzinger.assert_valid();
    }

    assert!(standard.iter().eq(eytzinger.iter()));
});
