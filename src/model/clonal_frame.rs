//! Clonal frame module.
//!
//! This module provides the clonal frame, the primary bifurcating ancestry
//! onto which conversions are overlaid:
//! - `ClonalFrame`: Immutable arena of [CfNode]s with heights and leaf labels.
//! - `CfNodeId` is used to identify (and index) its nodes.
//!
//! A frame is assembled with a [ClonalFrameBuilder](crate::model::ClonalFrameBuilder)
//! or parsed from a Newick string with [crate::newick::parse_str].

use crate::model::cf_node::{CfEvent, CfNode};
use crate::model::leaf_label_map::LeafLabelMap;
use crate::model::time_tree::TimeTree;

/// Id of a node in a [ClonalFrame], doubling as its arena index.
pub type CfNodeId = usize;


// =#========================================================================#=
// CLONAL FRAME
// =#========================================================================#=
/// A rooted binary tree with node heights, using the arena pattern on [CfNode].
///
/// # Structure
/// - Leaves have ids `0..num_leaves`, internal nodes `num_leaves..2*num_leaves-1`
/// - The label of leaf `i` is entry `i` of the frame's [LeafLabelMap]
/// - Internal nodes are strictly higher than their children
/// - The ordered event sequence (one [CfEvent] per node, ascending by height,
///   ties by id) is derived once at construction
///
/// A frame is immutable once built; reconstructions only read it, so it can be
/// shared between threads reconstructing different blocks.
///
/// # Example
/// ```
/// use acgtree::model::{ClonalFrameBuilder, TimeTree};
///
/// // ((A:1,B:1):1,C:2);
/// let mut builder = ClonalFrameBuilder::new(3);
/// let a = builder.add_leaf("A", 0.0);
/// let b = builder.add_leaf("B", 0.0);
/// let c = builder.add_leaf("C", 0.0);
/// let d = builder.add_internal((a, b), 1.0);
/// builder.add_root((d, c), 2.0);
/// let frame = builder.build().unwrap();
///
/// assert_eq!(frame.num_leaves(), 3);
/// assert_eq!(frame.num_vertices(), 5);
/// assert_eq!(frame.tree_height(), 2.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClonalFrame {
    /// Nodes of this frame (arena pattern), index == id
    nodes: Vec<CfNode>,
    /// Id of the root
    root: CfNodeId,
    /// Number of leaves
    num_leaves: usize,
    /// Leaf labels, label index == leaf id
    labels: LeafLabelMap,
    /// Events ordered by height
    events: Vec<CfEvent>,
}

impl ClonalFrame {
    /// Assembles a frame from nodes already numbered and validated by the builder.
    pub(crate) fn from_parts(nodes: Vec<CfNode>, root: CfNodeId, labels: LeafLabelMap) -> Self {
        let num_leaves = labels.num_labels();

        // Stable sort over id order, so equal heights keep ascending ids
        let mut events: Vec<CfEvent> = nodes.iter().map(CfEvent::of).collect();
        events.sort_by(|e1, e2| e1.height.total_cmp(&e2.height));

        ClonalFrame {
            nodes,
            root,
            num_leaves,
            labels,
            events,
        }
    }

    /// Returns the id of the root.
    pub fn root_id(&self) -> CfNodeId {
        self.root
    }

    /// Returns a reference to the root node.
    pub fn root(&self) -> &CfNode {
        &self.nodes[self.root]
    }

    /// Returns the node with the given id, or `None` if there is no such node.
    pub fn node(&self, id: CfNodeId) -> Option<&CfNode> {
        self.nodes.get(id)
    }

    /// Returns whether the frame has a node with this id.
    pub fn contains(&self, id: CfNodeId) -> bool {
        id < self.nodes.len()
    }

    /// Returns all nodes in id order.
    pub fn nodes(&self) -> &[CfNode] {
        &self.nodes
    }

    /// Returns the number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the leaf labels.
    pub fn labels(&self) -> &LeafLabelMap {
        &self.labels
    }

    /// Returns the id of the leaf with the given label.
    pub fn leaf_id(&self, label: &str) -> Option<CfNodeId> {
        self.labels.get_index(label)
    }

    /// Returns the events of this frame, ordered ascending by height (ties by id).
    pub fn events(&self) -> &[CfEvent] {
        &self.events
    }

    /// Returns the height range `(lower, upper)` of the branch above node `id`,
    /// that is, its own height and its parent's height.
    /// The branch above the root is unbounded.
    ///
    /// # Returns
    /// `None` if there is no node with this id
    pub fn branch_range(&self, id: CfNodeId) -> Option<(f64, f64)> {
        let node = self.nodes.get(id)?;
        let upper = match node.parent() {
            Some(parent) => self.nodes[parent].height(),
            None => f64::INFINITY,
        };
        Some((node.height(), upper))
    }
}

impl TimeTree for ClonalFrame {
    fn root_index(&self) -> usize {
        self.root
    }

    fn num_vertices(&self) -> usize {
        self.nodes.len()
    }

    fn num_leaves(&self) -> usize {
        self.num_leaves
    }

    fn height_of(&self, index: usize) -> f64 {
        self.nodes[index].height()
    }

    fn children_of(&self, index: usize) -> Option<(usize, usize)> {
        self.nodes[index].children()
    }

    fn parent_of(&self, index: usize) -> Option<usize> {
        self.nodes[index].parent()
    }

    fn leaf_id_of(&self, index: usize) -> Option<usize> {
        self.nodes[index].is_leaf().then_some(index)
    }
}

impl std::ops::Index<CfNodeId> for ClonalFrame {
    type Output = CfNode;

    fn index(&self, id: CfNodeId) -> &Self::Output {
        &self.nodes[id]
    }
}
