//! Conversion module: lateral-transfer edges overlaid on a clonal frame.
//!
//! - `Conversion`: An edge from a donor to a recipient lineage at some height,
//!   tagged with the blocks it affects.
//! - `ConversionSet`: All conversions of a history, looked up by [ConversionId].
//! - `Block`: A data partition; a filter key selecting the conversions tagged
//!   with its [BlockId].

use crate::marginal::ReconstructionError;
use crate::model::clonal_frame::{CfNodeId, ClonalFrame};
use std::collections::{BTreeMap, BTreeSet};

/// Id of a conversion in a [ConversionSet].
pub type ConversionId = usize;

/// Id of a [Block].
pub type BlockId = usize;

// =#========================================================================#=
// CONVERSION
// =#========================================================================#=
/// A conversion edge: at `height`, the history of the affected blocks on the
/// recipient's branch is inherited from the donor's branch.
///
/// Donor and recipient are the clonal frame nodes below the branches the
/// edge attaches to, so `height` must lie strictly inside both branches
/// (see [Conversion::check_against]).
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    id: ConversionId,
    donor: CfNodeId,
    recipient: CfNodeId,
    height: f64,
    blocks: BTreeSet<BlockId>,
}

impl Conversion {
    /// Returns the id of this conversion.
    pub fn id(&self) -> ConversionId {
        self.id
    }

    /// Returns the node below the donor branch.
    pub fn donor(&self) -> CfNodeId {
        self.donor
    }

    /// Returns the node below the recipient branch.
    pub fn recipient(&self) -> CfNodeId {
        self.recipient
    }

    /// Returns the height of this conversion.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Returns the blocks this conversion affects.
    pub fn blocks(&self) -> &BTreeSet<BlockId> {
        &self.blocks
    }

    /// Returns whether this conversion affects the given block.
    pub fn affects(&self, block: BlockId) -> bool {
        self.blocks.contains(&block)
    }

    /// Tags this conversion as affecting `block`.
    pub fn add_block(&mut self, block: BlockId) {
        self.blocks.insert(block);
    }

    /// Removes the tag for `block`, returning whether it was present.
    pub fn remove_block(&mut self, block: BlockId) -> bool {
        self.blocks.remove(&block)
    }

    /// Checks that this conversion fits onto the given clonal frame:
    /// - Donor and recipient are nodes of the frame and differ
    /// - The height is finite and lies strictly inside the donor branch and
    ///   the recipient branch (the branch above the root is unbounded)
    ///
    /// # Errors
    /// [StructuralInconsistency](crate::marginal::ReconstructionErrorType::StructuralInconsistency)
    /// describing the first violated condition.
    pub fn check_against(&self, frame: &ClonalFrame) -> Result<(), ReconstructionError> {
        if self.donor == self.recipient {
            return Err(ReconstructionError::structural_inconsistency(
                format!("conversion {} has donor and recipient {}", self.id, self.donor),
                Some(self.height),
            ));
        }

        if !self.height.is_finite() {
            return Err(ReconstructionError::structural_inconsistency(
                format!("conversion {} has non-finite height {}", self.id, self.height),
                None,
            ));
        }

        for (role, node) in [("donor", self.donor), ("recipient", self.recipient)] {
            let Some((lower, upper)) = frame.branch_range(node) else {
                return Err(ReconstructionError::structural_inconsistency(
                    format!("conversion {} references unknown {role} node {node}", self.id),
                    Some(self.height),
                ));
            };

            if self.height <= lower || self.height >= upper {
                return Err(ReconstructionError::structural_inconsistency(
                    format!(
                        "conversion {} at height {} lies outside the {role} branch \
                         ({lower}, {upper}) above node {node}",
                        self.id, self.height
                    ),
                    Some(self.height),
                ));
            }
        }

        Ok(())
    }
}


// =#========================================================================#=
// CONVERSION SET
// =#========================================================================#=
/// The conversions of a history, stored by [ConversionId] in ascending order.
///
/// Ids are assigned by [ConversionSet::add] in increasing order and are never
/// reused after [ConversionSet::remove], so an id keeps referring to the same
/// edge across proposals. The only exception is a set holding
/// `ConversionId::MAX`, where `add` falls back to the smallest unused id.
///
/// # Example
/// ```
/// use acgtree::model::{Block, ConversionSet};
///
/// let mut conversions = ConversionSet::new();
/// let first = conversions.add(2, 0, 0.5, [0]);
/// let second = conversions.add(1, 0, 0.25, [0, 1]);
///
/// assert_eq!(conversions.len(), 2);
/// assert_eq!(Block::new(1).conversion_ids(&conversions), vec![second]);
/// assert!(conversions.get(first).unwrap().affects(0));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionSet {
    conversions: BTreeMap<ConversionId, Conversion>,
    next_id: ConversionId,
}

impl ConversionSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a conversion with the next free id and returns that id.
    ///
    /// # Arguments
    /// * `donor` - Node below the donor branch
    /// * `recipient` - Node below the recipient branch
    /// * `height` - Height of the conversion
    /// * `blocks` - Blocks affected by the conversion
    pub fn add<I>(
        &mut self,
        donor: CfNodeId,
        recipient: CfNodeId,
        height: f64,
        blocks: I,
    ) -> ConversionId
    where
        I: IntoIterator<Item = BlockId>,
    {
        let id = self.free_id();
        self.insert(id, donor, recipient, height, blocks);
        id
    }

    /// Returns the next id for [ConversionSet::add].
    ///
    /// Once an explicit [insert](ConversionSet::insert) has claimed
    /// `ConversionId::MAX`, counting up is exhausted and the smallest unused
    /// id is taken instead.
    fn free_id(&self) -> ConversionId {
        if !self.conversions.contains_key(&self.next_id) {
            return self.next_id;
        }

        (0..)
            .zip(self.conversions.keys())
            .find(|&(expected, &id)| expected != id)
            .map_or(self.conversions.len(), |(expected, _)| expected)
    }

    /// Inserts a conversion under a caller-chosen id, replacing and returning
    /// any conversion previously stored under that id.
    pub fn insert<I>(
        &mut self,
        id: ConversionId,
        donor: CfNodeId,
        recipient: CfNodeId,
        height: f64,
        blocks: I,
    ) -> Option<Conversion>
    where
        I: IntoIterator<Item = BlockId>,
    {
        self.next_id = self.next_id.max(id.saturating_add(1));
        let conversion = Conversion {
            id,
            donor,
            recipient,
            height,
            blocks: blocks.into_iter().collect(),
        };
        self.conversions.insert(id, conversion)
    }

    /// Removes and returns the conversion with the given id.
    pub fn remove(&mut self, id: ConversionId) -> Option<Conversion> {
        self.conversions.remove(&id)
    }

    /// Returns the conversion with the given id.
    pub fn get(&self, id: ConversionId) -> Option<&Conversion> {
        self.conversions.get(&id)
    }

    /// Returns the conversion with the given id for modification of its block tags.
    pub fn get_mut(&mut self, id: ConversionId) -> Option<&mut Conversion> {
        self.conversions.get_mut(&id)
    }

    /// Returns an iterator over all conversions in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Conversion> {
        self.conversions.values()
    }

    /// Returns the number of conversions.
    pub fn len(&self) -> usize {
        self.conversions.len()
    }

    /// Returns whether the set holds no conversion.
    pub fn is_empty(&self) -> bool {
        self.conversions.is_empty()
    }

    /// Returns the ids of all conversions affecting `block`, ascending.
    pub fn ids_for_block(&self, block: BlockId) -> Vec<ConversionId> {
        self.iter()
            .filter(|conversion| conversion.affects(block))
            .map(Conversion::id)
            .collect()
    }

    /// Returns the number of conversions affecting `block`.
    pub fn count_for_block(&self, block: BlockId) -> usize {
        self.iter().filter(|conversion| conversion.affects(block)).count()
    }

    /// Checks every conversion against the frame, see [Conversion::check_against].
    pub fn validate_against(&self, frame: &ClonalFrame) -> Result<(), ReconstructionError> {
        self.iter().try_for_each(|conversion| conversion.check_against(frame))
    }
}

impl<'a> IntoIterator for &'a ConversionSet {
    type Item = &'a Conversion;
    type IntoIter = std::collections::btree_map::Values<'a, ConversionId, Conversion>;

    fn into_iter(self) -> Self::IntoIter {
        self.conversions.values()
    }
}


// =#========================================================================#=
// BLOCK
// =#========================================================================#=
/// A partition of the data (e.g. a genomic region) with its own marginal tree.
///
/// A block has no behaviour of its own: it selects the conversions of a
/// [ConversionSet] that are tagged with its id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Block {
    id: BlockId,
    name: Option<String>,
}

impl Block {
    /// Creates a block with the given id.
    pub fn new(id: BlockId) -> Self {
        Block { id, name: None }
    }

    /// Attaches a name to this block.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns the id of this block.
    pub fn id(&self) -> BlockId {
        self.id
    }

    /// Returns the name of this block, if set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the ids of the conversions this block claims, ascending.
    pub fn conversion_ids(&self, conversions: &ConversionSet) -> Vec<ConversionId> {
        conversions.ids_for_block(self.id)
    }
}
