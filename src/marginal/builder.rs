//! The sweep reconstructing a block's marginal tree.
//!
//! Clonal frame events are visited ascending by height. After each event,
//! every block conversion below the next event is folded into the lineage
//! bookkeeping:
//!
//! ```text
//! event at n (children l, r)     l, r live  → new node joining both, keyed n
//!                                one live   → its lineage is re-keyed to n
//!                                none live  → nothing
//! conversion donor d → recip. r  d, r live  → new node (r's, d's), keyed r
//!                                only d     → d's lineage is re-keyed to r
//!                                d not live → overshadowed, no effect
//! ```
//!
//! A conversion whose height equals the next event's height is folded in
//! after that event; conversions of equal height are taken by id.

use crate::marginal::block_filter::block_conversions;
use crate::marginal::lineage_tracker::LineageTracker;
use crate::marginal::reconstruction_error::ReconstructionError;
use crate::model::{
    Block, CfEvent, CfEventKind, ClonalFrame, Conversion, ConversionId, ConversionSet, MarginalId,
    MarginalNode, MarginalTree, TimeTree,
};
use rayon::prelude::*;
use tracing::{debug, debug_span, trace, warn};

/// Whether block conversions are checked against the clonal frame before the sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Validation {
    /// Check donor, recipient and height of every block conversion (default)
    #[default]
    Full,
    /// Trust the caller; lineage bookkeeping errors are still reported
    Skip,
}

/// Counts of what happened during one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Conversions of the block
    pub conversions: usize,
    /// Conversions joining two live lineages
    pub conversion_coalescences: usize,
    /// Conversions moving the donor lineage onto the recipient
    pub conversion_pass_throughs: usize,
    /// Ids of conversions without effect (donor lineage not live), in sweep order
    pub overshadowed: Vec<ConversionId>,
    /// Clonal frame coalescences with a marginal node
    pub cf_coalescences: usize,
    /// Clonal frame coalescences with only one live side
    pub cf_pass_throughs: usize,
    /// Clonal frame coalescences with no live side (both child branches vacated)
    pub cf_vacated: usize,
}

// =#========================================================================#=
// MARGINAL TREE BUILDER
// =#========================================================================#=
/// Reconstructs marginal trees of blocks from a clonal frame and a conversion set.
///
/// The builder only borrows its inputs; every call to [build](Self::build)
/// recomputes from scratch, and all sweep state is local to that call.
/// Different blocks can therefore be reconstructed concurrently, see
/// [build_all](Self::build_all).
///
/// # Example
/// ```
/// use acgtree::marginal::{MarginalTreeBuilder, Validation};
/// use acgtree::model::{Block, ConversionSet, TimeTree};
/// use acgtree::newick::parse_str;
///
/// let frame = parse_str("((A:1,B:1):1,C:2);").unwrap();
/// let (a, c) = (frame.leaf_id("A").unwrap(), frame.leaf_id("C").unwrap());
///
/// let mut conversions = ConversionSet::new();
/// conversions.add(c, a, 0.5, [0]);
///
/// let builder = MarginalTreeBuilder::new(&frame, &conversions).with_validation(Validation::Full);
/// let tree = builder.build(&Block::new(0)).unwrap();
/// assert_eq!(tree.num_vertices(), 5);
/// assert_eq!(tree.tree_height(), 1.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MarginalTreeBuilder<'a> {
    frame: &'a ClonalFrame,
    conversions: &'a ConversionSet,
    validation: Validation,
}

impl<'a> MarginalTreeBuilder<'a> {
    /// Creates a builder over the given (read-only) inputs with full validation.
    pub fn new(frame: &'a ClonalFrame, conversions: &'a ConversionSet) -> Self {
        Self {
            frame,
            conversions,
            validation: Validation::default(),
        }
    }

    /// Sets whether block conversions are validated before the sweep.
    pub fn with_validation(mut self, validation: Validation) -> Self {
        self.validation = validation;
        self
    }

    /// Reconstructs the marginal tree of `block`.
    ///
    /// # Errors
    /// * StructuralInconsistency - a block conversion does not fit the frame
    ///   (only detected with [Validation::Full])
    /// * InvariantViolation - the sweep did not end with exactly one lineage
    ///   at the clonal frame root
    pub fn build(&self, block: &Block) -> Result<MarginalTree, ReconstructionError> {
        self.build_with_stats(block).map(|(tree, _)| tree)
    }

    /// Reconstructs the marginal tree of `block` and reports [SweepStats].
    pub fn build_with_stats(
        &self,
        block: &Block,
    ) -> Result<(MarginalTree, SweepStats), ReconstructionError> {
        let conversions = block_conversions(self.conversions, block);

        let span = debug_span!(
            "marginal_tree",
            block = block.id(),
            conversions = conversions.len()
        );
        let _enter = span.enter();

        if self.validation == Validation::Full {
            for conversion in &conversions {
                conversion.check_against(self.frame)?;
            }
        }

        let result = Sweep::new(self.frame).run(&conversions);
        match &result {
            Ok((_, stats)) => debug!(
                coalescences = stats.conversion_coalescences,
                pass_throughs = stats.conversion_pass_throughs,
                overshadowed = stats.overshadowed.len(),
                cf_pass_throughs = stats.cf_pass_throughs,
                cf_vacated = stats.cf_vacated,
                "reconstructed marginal tree"
            ),
            Err(err) => warn!(block = block.id(), "marginal tree reconstruction failed: {err}"),
        }

        result
    }

    /// Reconstructs the marginal trees of all `blocks` in parallel.
    ///
    /// Results are returned in the order of `blocks`.
    pub fn build_all(&self, blocks: &[Block]) -> Vec<Result<MarginalTree, ReconstructionError>> {
        blocks.par_iter().map(|block| self.build(block)).collect()
    }
}


// =#========================================================================#=
// SWEEP (state of one reconstruction)
// =#========================================================================#=
struct Sweep<'a> {
    frame: &'a ClonalFrame,
    tracker: LineageTracker,
    /// Marginal nodes by id; filled during the sweep
    nodes: Vec<Option<MarginalNode>>,
    next_internal: MarginalId,
    stats: SweepStats,
}

impl<'a> Sweep<'a> {
    fn new(frame: &'a ClonalFrame) -> Self {
        Sweep {
            frame,
            tracker: LineageTracker::new(frame.num_nodes()),
            nodes: vec![None; frame.num_nodes()],
            next_internal: frame.num_leaves(),
            stats: SweepStats::default(),
        }
    }

    fn run(
        mut self,
        conversions: &[&Conversion],
    ) -> Result<(MarginalTree, SweepStats), ReconstructionError> {
        let events = self.frame.events();
        let root = self.frame.root_id();
        self.stats.conversions = conversions.len();

        let mut next_conversion = 0;
        for (i, event) in events.iter().enumerate() {
            match event.kind {
                CfEventKind::Sample => self.sample(event)?,
                CfEventKind::Coalescence => self.coalesce(event)?,
            }

            // Fold in conversions below the next event (all remaining after the root)
            let bound = match events.get(i + 1) {
                Some(next) if event.node != root => Some(next.height),
                _ => None,
            };
            while let Some(conversion) = conversions.get(next_conversion) {
                if bound.is_some_and(|bound| conversion.height() >= bound) {
                    break;
                }
                next_conversion += 1;
                self.convert(conversion)
                    .map_err(|err| err.at_height(conversion.height()))?;
            }
        }

        self.finish()
    }

    fn sample(&mut self, event: &CfEvent) -> Result<(), ReconstructionError> {
        let leaf = event.node;
        self.place(MarginalNode::new_leaf(leaf, event.height, leaf))?;
        self.tracker.activate(leaf, leaf)
            .map_err(|err| err.at_height(event.height))
    }

    fn coalesce(&mut self, event: &CfEvent) -> Result<(), ReconstructionError> {
        let node = event.node;
        let Some((left, right)) = self.frame[node].children() else {
            return Err(ReconstructionError::invariant_violation(
                format!("coalescence event at clonal frame node {node} without children"),
                Some(event.height),
            ));
        };

        match (self.tracker.lineage_of(left), self.tracker.lineage_of(right)) {
            (Some(left_lineage), Some(right_lineage)) => {
                let id = self.next_internal_id(event.height)?;
                let children = (left_lineage, right_lineage);
                self.place(MarginalNode::new_internal(id, event.height, children, node))?;
                self.tracker.deactivate(left);
                self.tracker.deactivate(right);
                self.tracker.activate(node, id)
                    .map_err(|err| err.at_height(event.height))?;
                self.stats.cf_coalescences += 1;
            }
            (Some(_), None) => {
                self.tracker.rekey(left, node).map_err(|err| err.at_height(event.height))?;
                self.stats.cf_pass_throughs += 1;
            }
            (None, Some(_)) => {
                self.tracker.rekey(right, node).map_err(|err| err.at_height(event.height))?;
                self.stats.cf_pass_throughs += 1;
            }
            (None, None) => self.stats.cf_vacated += 1,
        }

        Ok(())
    }

    fn convert(&mut self, conversion: &Conversion) -> Result<(), ReconstructionError> {
        let (donor, recipient) = (conversion.donor(), conversion.recipient());
        let height = conversion.height();
        for (role, node) in [("donor", donor), ("recipient", recipient)] {
            if !self.frame.contains(node) {
                return Err(ReconstructionError::invariant_violation(
                    format!("conversion {} references unknown {role} node {node}", conversion.id()),
                    Some(height),
                ));
            }
        }

        match (self.tracker.lineage_of(donor), self.tracker.lineage_of(recipient)) {
            (Some(donor_lineage), Some(recipient_lineage)) => {
                let id = self.next_internal_id(height)?;
                let children = (recipient_lineage, donor_lineage);
                self.place(MarginalNode::new_internal(id, height, children, recipient))?;
                self.tracker.deactivate(donor);
                self.tracker.deactivate(recipient);
                self.tracker.activate(recipient, id)?;
                self.stats.conversion_coalescences += 1;
                trace!(
                    conversion = conversion.id(),
                    donor,
                    recipient,
                    node = id,
                    "conversion joins lineages"
                );
            }
            (Some(_), None) => {
                self.tracker.rekey(donor, recipient)?;
                self.stats.conversion_pass_throughs += 1;
                trace!(
                    conversion = conversion.id(),
                    donor,
                    recipient,
                    "donor lineage continues at recipient"
                );
            }
            (None, _) => {
                self.stats.overshadowed.push(conversion.id());
                trace!(conversion = conversion.id(), donor, recipient, "conversion overshadowed");
            }
        }

        Ok(())
    }

    fn next_internal_id(&mut self, height: f64) -> Result<MarginalId, ReconstructionError> {
        let id = self.next_internal;
        if id >= self.nodes.len() {
            return Err(ReconstructionError::invariant_violation(
                format!("more than {} marginal nodes required", self.nodes.len()),
                Some(height),
            ));
        }
        self.next_internal += 1;
        Ok(id)
    }

    fn place(&mut self, node: MarginalNode) -> Result<(), ReconstructionError> {
        let id = node.id();
        match self.nodes.get_mut(id) {
            Some(slot) if slot.is_none() => {
                *slot = Some(node);
                Ok(())
            }
            _ => Err(ReconstructionError::invariant_violation(
                format!("marginal node {id} allocated twice or out of range"),
                Some(node.height()),
            )),
        }
    }

    /// Checks that exactly one lineage survived, keyed by the clonal frame
    /// root, and assembles the tree.
    fn finish(self) -> Result<(MarginalTree, SweepStats), ReconstructionError> {
        let root = self.frame.root_id();
        let top = self.frame.tree_height();

        let marginal_root = match self.tracker.sole_lineage() {
            Some((key, lineage)) if key == root => lineage,
            _ => {
                return Err(ReconstructionError::invariant_violation(
                    format!(
                        "sweep ended with {} live lineages at clonal frame nodes {:?}, \
                         expected one at root {root}",
                        self.tracker.num_active(),
                        self.tracker.active_nodes()
                    ),
                    Some(top),
                ));
            }
        };

        let num_nodes = self.nodes.len();
        let num_created = self.nodes.iter().filter(|slot| slot.is_some()).count();
        let Some(nodes) = self.nodes.into_iter().collect::<Option<Vec<MarginalNode>>>() else {
            return Err(ReconstructionError::invariant_violation(
                format!("only {num_created} of {num_nodes} marginal nodes were created"),
                Some(top),
            ));
        };

        let tree = MarginalTree::from_nodes(nodes, marginal_root, self.frame.num_leaves());
        Ok((tree, self.stats))
    }
}
