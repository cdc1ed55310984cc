#![no_main]

use libfuzzer_sys::fuzz_target;
use rbtree::{Eytzinger, RedBlackTree};

fuzz_target!(|inserts_removals: (Vec<u16>, Vec<u16>)| {
    let mut standard: RedBlackTree<u16> = RedBlackTree::default();
    let mut eytzinger: RedBlackTree<u16, Eytzinger<_>> = RedBlackTree::default();

    for i in inserts_removals.0 {
        standard.add(i);
        standard.assert_valid();
        eytzinger.add(i);
        eytzinger.assert_valid();
    }

    for i in inserts_removals.1 {
        let removed = standard.remove(&i);
        standard.assert_valid();
        assert_eq!(removed, eytzinger.remove(&i));
        eytzinger.assert_valid();
    }

    assert!(standard.iter().eq(eytzinger.iter()));
});
