#![allow(unused, reason = "not used by all tests")]

use rbtree::{Eytzinger, NodeData, RedBlackTree};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::SubscriberInitExt;

pub type StandardTree = RedBlackTree<u32>;
pub type EytzingerTree = RedBlackTree<u32, Eytzinger<NodeData<u32>>>;

/// Installs a subscriber for the current test, filtered by `RUST_LOG`.
pub fn trace() -> impl Drop {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .set_default()
}
