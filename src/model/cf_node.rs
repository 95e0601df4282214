//! Node module for the clonal frame.

use crate::model::clonal_frame::CfNodeId;

// =#========================================================================#=
// CF NODE
// =#========================================================================#=
/// Represents a node of a [ClonalFrame](crate::model::ClonalFrame).
///
/// A node is either:
/// - **Leaf**: A sampled taxon, has no children, label stored in the
///   frame's [LeafLabelMap](crate::model::LeafLabelMap) under its id
/// - **Internal**: A coalescence of two lineages, has two children
///
/// The root is the single node without parent. It is usually internal,
/// but a frame on one taxon consists of a single leaf root.
///
/// # Invariants
/// - `id` is index in arena; leaves have ids `0..num_leaves`
/// - `height` is finite and non-negative
/// - Internal nodes are strictly higher than both their children
#[derive(PartialEq, Debug, Clone)]
pub enum CfNode {
    /// Sampled taxon
    Leaf {
        /// Id of this node (index in the frame arena)
        id: CfNodeId,
        /// Id of the parent node, `None` for a single-leaf root
        parent: Option<CfNodeId>,
        /// Sampling height (age) of the taxon
        height: f64,
    },
    /// Coalescence of two lineages
    Internal {
        /// Id of this node (index in the frame arena)
        id: CfNodeId,
        /// Id of the parent node, `None` for the root
        parent: Option<CfNodeId>,
        /// Ids of the left and right child
        children: (CfNodeId, CfNodeId),
        /// Height (age) of the coalescence
        height: f64,
    },
}

impl CfNode {
    /// Returns the id of this node.
    pub fn id(&self) -> CfNodeId {
        match self {
            CfNode::Leaf { id, .. } | CfNode::Internal { id, .. } => *id,
        }
    }

    /// Returns the height of this node.
    pub fn height(&self) -> f64 {
        match self {
            CfNode::Leaf { height, .. } | CfNode::Internal { height, .. } => *height,
        }
    }

    /// Returns the id of the parent, or `None` for the root.
    pub fn parent(&self) -> Option<CfNodeId> {
        match self {
            CfNode::Leaf { parent, .. } | CfNode::Internal { parent, .. } => *parent,
        }
    }

    /// Returns the children if this is an internal node, else `None`.
    pub fn children(&self) -> Option<(CfNodeId, CfNodeId)> {
        match self {
            CfNode::Internal { children, .. } => Some(*children),
            CfNode::Leaf { .. } => None,
        }
    }

    /// Returns `true` if this node is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, CfNode::Leaf { .. })
    }

    /// Returns `true` if this node is internal (including an internal root).
    pub fn is_internal(&self) -> bool {
        matches!(self, CfNode::Internal { .. })
    }

    /// Returns `true` if this node has no parent.
    pub fn is_root(&self) -> bool {
        self.parent().is_none()
    }
}

// =#========================================================================#=
// CF EVENT
// =#========================================================================#=
/// Kind of a clonal frame event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CfEventKind {
    /// A taxon is sampled (leaf)
    Sample,
    /// Two lineages coalesce (internal node)
    Coalescence,
}

/// An event of the clonal frame, derived one-to-one from a [CfNode].
///
/// Events of a frame are ordered by height ascending;
/// ties are broken by node id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CfEvent {
    /// Whether a sample or a coalescence
    pub kind: CfEventKind,
    /// Height of the originating node
    pub height: f64,
    /// Id of the originating node
    pub node: CfNodeId,
}

impl CfEvent {
    /// Derives the event of a node.
    pub fn of(node: &CfNode) -> Self {
        let kind = if node.is_leaf() {
            CfEventKind::Sample
        } else {
            CfEventKind::Coalescence
        };

        CfEvent {
            kind,
            height: node.height(),
            node: node.id(),
        }
    }
}
