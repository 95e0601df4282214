//! Property-based invariant tests for marginal tree reconstruction.
//!
//! These tests verify invariants that must hold for any valid history
//! (random clonal frame plus conversions placed inside their branches):
//!
//! 1. Every block yields a binary tree on all leaves (2n-1 nodes).
//! 2. Reconstruction is deterministic.
//! 3. A block without conversions reproduces the clonal frame.
//! 4. Removing an overshadowed conversion does not change the tree.
//! 5. Valid histories never end with a lineage count other than one.

mod common;

use acgtree::marginal::{MarginalTreeBuilder, Validation};
use acgtree::model::{Block, TimeTree, same_shape};
use common::random_history;
use proptest::prelude::*;

fn history_params() -> impl Strategy<Value = (usize, usize, usize, u64)> {
    (2usize..=24, 0usize..=40, 1usize..=4, any::<u64>())
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Binary tree on all leaves
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn marginal_tree_is_binary_on_all_leaves(
        (leaves, num_conversions, blocks, seed) in history_params()
    ) {
        let (frame, conversions) = random_history(leaves, num_conversions, blocks, seed);
        let builder = MarginalTreeBuilder::new(&frame, &conversions);

        for block in 0..blocks {
            let tree = builder.build(&Block::new(block)).unwrap();
            prop_assert_eq!(tree.num_vertices(), 2 * leaves - 1);
            prop_assert_eq!(tree.num_leaves(), leaves);
            prop_assert_eq!(tree.post_order().count(), 2 * leaves - 1);

            for leaf in 0..leaves {
                prop_assert!(tree[leaf].is_leaf());
                prop_assert_eq!(tree[leaf].cf_node(), leaf);
                prop_assert_eq!(tree[leaf].height(), frame[leaf].height());
            }

            for node in tree.nodes() {
                if let Some(parent) = node.parent() {
                    prop_assert!(tree[parent].height() >= node.height());
                }
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Determinism
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn reconstruction_is_deterministic(
        (leaves, num_conversions, blocks, seed) in history_params()
    ) {
        let (frame, conversions) = random_history(leaves, num_conversions, blocks, seed);
        let builder = MarginalTreeBuilder::new(&frame, &conversions);
        let block = Block::new(seed as usize % blocks);

        let first = builder.build(&block).unwrap();
        let second = builder.with_validation(Validation::Skip).build(&block).unwrap();
        prop_assert_eq!(first, second);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Identity without conversions
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn block_without_conversions_reproduces_frame(
        (leaves, num_conversions, blocks, seed) in history_params()
    ) {
        let (frame, conversions) = random_history(leaves, num_conversions, blocks, seed);
        let unused = Block::new(blocks);

        let tree = MarginalTreeBuilder::new(&frame, &conversions).build(&unused).unwrap();
        prop_assert!(same_shape(&frame, &tree));
        prop_assert!((tree.total_branch_length() - frame.total_branch_length()).abs() < 1e-9);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Overshadowed conversions are irrelevant
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn removing_overshadowed_conversion_keeps_tree(
        (leaves, num_conversions, blocks, seed) in history_params()
    ) {
        let (frame, mut conversions) = random_history(leaves, num_conversions, blocks, seed);
        let block = Block::new(0);

        let builder = MarginalTreeBuilder::new(&frame, &conversions);
        let (tree, stats) = builder.build_with_stats(&block).unwrap();
        let handled = stats.conversion_coalescences + stats.conversion_pass_throughs;
        prop_assert_eq!(handled + stats.overshadowed.len(), stats.conversions);
        let cf_events = stats.cf_coalescences + stats.cf_pass_throughs + stats.cf_vacated;
        prop_assert_eq!(cf_events, leaves - 1);

        if let Some(&shadowed) = stats.overshadowed.first() {
            conversions.remove(shadowed);
            let without = MarginalTreeBuilder::new(&frame, &conversions).build(&block).unwrap();
            prop_assert_eq!(tree, without);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Termination invariant
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn valid_histories_end_in_one_lineage(
        (leaves, num_conversions, blocks, seed) in history_params()
    ) {
        let (frame, conversions) = random_history(leaves, num_conversions, blocks, seed);
        prop_assert!(conversions.validate_against(&frame).is_ok());

        let all: Vec<Block> = (0..blocks).map(Block::new).collect();
        let builder = MarginalTreeBuilder::new(&frame, &conversions)
            .with_validation(Validation::Skip);
        for result in builder.build_all(&all) {
            let tree = result.unwrap();
            // Every coalescence (of either kind) adds one node
            prop_assert_eq!(tree.num_internal(), leaves - 1);
        }
    }
}
