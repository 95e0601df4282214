//! Data model for ancestral histories with conversions.
//!
//! This module provides the inputs and the output of a marginal tree
//! reconstruction:
//! - [ClonalFrame]: Rooted binary tree with node heights ([CfNode] arena),
//!   built with a [ClonalFrameBuilder] or parsed from Newick.
//! - [ConversionSet]: Conversion edges ([Conversion]) tagged with the
//!   [Block]s they affect.
//! - [MarginalTree]: The tree of one block ([MarginalNode] arena).
//!
//! All trees use the arena pattern: nodes are stored in a vector and refer
//! to each other by index, never by reference. Leaves of a clonal frame and
//! of its marginal trees share ids, so one [LeafLabelMap] labels them all.
//! Both tree types implement the read interface [TimeTree].

/// Clonal frame nodes and events
pub mod cf_node;
/// Clonal frame tree
pub mod clonal_frame;
/// Validating construction of clonal frames
pub mod clonal_frame_builder;
/// Conversions, conversion sets and blocks
pub mod conversion;
/// Leaf label mapping to leaf ids
pub mod leaf_label_map;
/// Marginal tree of a block
pub mod marginal_tree;
/// Shared read interface and traversals
pub mod time_tree;

pub use cf_node::{CfEvent, CfEventKind, CfNode};
pub use clonal_frame::{CfNodeId, ClonalFrame};
pub use clonal_frame_builder::{BuilderHandle, ClonalFrameBuilder, ClonalFrameError};
pub use conversion::{Block, BlockId, Conversion, ConversionId, ConversionSet};
pub use leaf_label_map::LeafLabelMap;
pub use marginal_tree::{MarginalId, MarginalNode, MarginalTree};
pub use time_tree::{HEIGHT_EPSILON, PostOrderIter, PreOrderIter, TimeTree, same_shape};
