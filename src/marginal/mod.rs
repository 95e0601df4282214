//! Reconstruction of marginal trees.
//!
//! The marginal tree of a block is obtained by a single sweep, ascending by
//! height, over the events of the clonal frame merged with the conversions
//! of the block (see [builder] for the rules). The sweep keeps track of the
//! live lineages in a [LineageTracker] and allocates a new marginal node
//! whenever two live lineages meet.
//!
//! # Usage
//! * [MarginalTreeBuilder::build] - reconstruct the tree of one block
//! * [MarginalTreeBuilder::build_all] - reconstruct many blocks in parallel
//! * [block_conversions] - the conversions of a block in sweep order
//!
//! Reconstruction never mutates its inputs and always starts from scratch.

pub mod block_filter;
pub mod builder;
pub mod lineage_tracker;
pub mod reconstruction_error;

pub use block_filter::block_conversions;
pub use builder::{MarginalTreeBuilder, SweepStats, Validation};
pub use lineage_tracker::LineageTracker;
pub use reconstruction_error::{ReconstructionError, ReconstructionErrorType};
