//! acgtree reconstructs the marginal trees of an ancestral conversion graph.
//!
//! An ancestral history is given by a clonal frame (a rooted binary tree
//! with node heights) and a set of conversions, lateral-transfer edges from
//! a donor branch to a recipient branch at some height, each tagged with the
//! data blocks it affects. The marginal tree of a block is the bifurcating
//! tree describing that block's actual inheritance; it is what a likelihood
//! computation for the block operates on.
//! Core functionality provided:
//! - Model: [ClonalFrame], [ConversionSet] and [Block] as inputs,
//!   [MarginalTree] as output. All trees use the arena pattern and share
//!   leaf ids, see [crate::model] for details.
//! - Reconstruction: a deterministic sweep over clonal frame events and
//!   block conversions, see [crate::marginal].
//! - Newick: read clonal frames (heights from branch lengths) and write
//!   any tree, see [crate::newick].
//!
//! Limitations:
//! - Only binary trees
//! - Conversions must attach strictly inside both of their branches
//!
//! # Usage patterns
//! 1. [marginal_tree] and [parse_clonal_frame] provide quick access with
//!    default settings.
//! 2. Configure a [MarginalTreeBuilder] for control over validation,
//!    statistics, or to reconstruct many blocks in parallel.
//!
//! ## Example
//! ```
//! use acgtree::{marginal_tree, parse_clonal_frame};
//! use acgtree::model::{Block, ConversionSet};
//! use acgtree::newick::{NewickStyle, to_newick};
//!
//! let frame = parse_clonal_frame("((A:1,B:1):1,C:2);").unwrap();
//! let (a, c) = (frame.leaf_id("A").unwrap(), frame.leaf_id("C").unwrap());
//!
//! let mut conversions = ConversionSet::new();
//! conversions.add(c, a, 0.5, [7]);
//!
//! let tree = marginal_tree(&frame, &conversions, &Block::new(7)).unwrap();
//! let newick = to_newick(NewickStyle::Label, &tree, Some(frame.labels()));
//! assert_eq!(newick, "((A:0.5,C:0.5):0.5,B:1);");
//!
//! // Other blocks are not affected by the conversion
//! let tree = marginal_tree(&frame, &conversions, &Block::new(0)).unwrap();
//! let newick = to_newick(NewickStyle::Label, &tree, Some(frame.labels()));
//! assert_eq!(newick, "((A:1,B:1):1,C:2);");
//! ```

pub mod marginal;
pub mod model;
pub mod newick;
pub mod parser;

use crate::marginal::{MarginalTreeBuilder, ReconstructionError};
use crate::model::{Block, ClonalFrame, ConversionSet, MarginalTree};
use crate::parser::ParsingError;

// ============================================================================
// Quick Reconstruction API
// ============================================================================
/// Reconstructs the marginal tree of `block` with default settings
/// (conversions are validated against the frame).
///
/// See [MarginalTreeBuilder::build] for full documentation.
pub fn marginal_tree(
    frame: &ClonalFrame,
    conversions: &ConversionSet,
    block: &Block,
) -> Result<MarginalTree, ReconstructionError> {
    MarginalTreeBuilder::new(frame, conversions).build(block)
}

// ============================================================================
// Quick Newick API
// ============================================================================
/// Parses a Newick string with branch lengths into a [ClonalFrame].
///
/// See [`newick::parse_str`] for full documentation of this convenience function.
pub fn parse_clonal_frame<S: AsRef<str>>(newick: S) -> Result<ClonalFrame, ParsingError> {
    newick::parse_str(newick)
}
