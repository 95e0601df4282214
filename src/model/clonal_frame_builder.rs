//! Construction of [ClonalFrame]s.
//!
//! Nodes can be added in any bottom-up order (as a Newick parser encounters
//! them). [ClonalFrameBuilder::build] validates the structure and renumbers
//! the nodes so that leaves come first:
//!
//! ```text
//! handles (insertion order)    ids in the frame
//!   0 A  leaf                    0 A
//!   1 B  leaf                    1 B
//!   2 (A,B)                      3 (A,B)
//!   3 C  leaf          ──→       2 C
//!   4 ((A,B),C) root             4 ((A,B),C)
//! ```

use crate::model::cf_node::CfNode;
use crate::model::clonal_frame::{CfNodeId, ClonalFrame};
use crate::model::leaf_label_map::LeafLabelMap;
use std::error::Error;
use std::fmt;

/// Handle of a node during construction (its insertion index).
pub type BuilderHandle = usize;

#[derive(Debug, Clone)]
struct PendingNode {
    label: Option<String>,
    children: Option<(BuilderHandle, BuilderHandle)>,
    height: f64,
}

// =#========================================================================#=
// CLONAL FRAME BUILDER
// =#========================================================================#=
/// Collects nodes of a clonal frame and turns them into a validated [ClonalFrame].
///
/// The `add_*` methods return a [BuilderHandle] to pass as child to later calls.
/// Handles are not the final [CfNodeId]s; after building, use
/// [ClonalFrame::leaf_id] to look up leaves by label.
#[derive(Debug, Clone, Default)]
pub struct ClonalFrameBuilder {
    pending: Vec<PendingNode>,
    root: Option<BuilderHandle>,
    num_roots: usize,
}

impl ClonalFrameBuilder {
    /// Creates a builder with capacity for a binary tree on `num_leaves` leaves.
    pub fn new(num_leaves: usize) -> Self {
        Self {
            pending: Vec::with_capacity((2 * num_leaves).saturating_sub(1)),
            root: None,
            num_roots: 0,
        }
    }

    /// Adds a leaf (sampled taxon) at the given height.
    pub fn add_leaf(&mut self, label: &str, height: f64) -> BuilderHandle {
        self.push(PendingNode {
            label: Some(label.to_string()),
            children: None,
            height,
        })
    }

    /// Adds an internal (non-root) node joining two previously added nodes.
    pub fn add_internal(
        &mut self,
        children: (BuilderHandle, BuilderHandle),
        height: f64,
    ) -> BuilderHandle {
        self.push(PendingNode {
            label: None,
            children: Some(children),
            height,
        })
    }

    /// Adds the root joining two previously added nodes.
    pub fn add_root(
        &mut self,
        children: (BuilderHandle, BuilderHandle),
        height: f64,
    ) -> BuilderHandle {
        let handle = self.push(PendingNode {
            label: None,
            children: Some(children),
            height,
        });
        self.root = Some(handle);
        self.num_roots += 1;
        handle
    }

    /// Returns the number of nodes added so far.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns whether no node has been added yet.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    fn push(&mut self, node: PendingNode) -> BuilderHandle {
        self.pending.push(node);
        self.pending.len() - 1
    }

    /// Validates the collected nodes and builds the frame.
    ///
    /// Checks:
    /// - At least one node, and exactly one root (a lone leaf is its own root)
    /// - All child handles exist and each node has at most one parent
    /// - Every node other than the root has a parent
    /// - Heights are finite and non-negative
    /// - Each internal node is strictly higher than both children
    /// - Leaf labels are unique
    ///
    /// # Errors
    /// A [ClonalFrameError] naming the offending builder handle.
    pub fn build(self) -> Result<ClonalFrame, ClonalFrameError> {
        let num_pending = self.pending.len();
        if num_pending == 0 {
            return Err(ClonalFrameError::Empty);
        }

        let root = match (self.num_roots, self.root) {
            (0, _) if num_pending == 1 && self.pending[0].children.is_none() => 0,
            (0, _) => return Err(ClonalFrameError::MissingRoot),
            (1, Some(root)) => root,
            _ => return Err(ClonalFrameError::MultipleRoots),
        };

        // Parent of each handle, checking heights on the way
        let mut parents: Vec<Option<BuilderHandle>> = vec![None; num_pending];
        for (handle, node) in self.pending.iter().enumerate() {
            if !node.height.is_finite() || node.height < 0.0 {
                return Err(ClonalFrameError::InvalidHeight {
                    node: handle,
                    height: node.height,
                });
            }

            if let Some((left, right)) = node.children {
                for child in [left, right] {
                    if child >= num_pending || child == handle {
                        return Err(ClonalFrameError::UnknownNode(child));
                    }
                    if parents[child].is_some() {
                        return Err(ClonalFrameError::MultipleParents(child));
                    }
                    parents[child] = Some(handle);
                }
            }
        }

        for (handle, parent) in parents.iter().enumerate() {
            match parent {
                None if handle != root => return Err(ClonalFrameError::Unattached(handle)),
                Some(_) if handle == root => return Err(ClonalFrameError::MultipleParents(handle)),
                Some(parent) if self.pending[*parent].height <= self.pending[handle].height => {
                    return Err(ClonalFrameError::NonIncreasingHeight {
                        child: handle,
                        parent: *parent,
                    });
                }
                _ => {}
            }
        }

        // Renumber: leaves first, then internal nodes, each in insertion order
        let num_leaves = self.pending.iter().filter(|node| node.children.is_none()).count();
        let mut ids: Vec<CfNodeId> = Vec::with_capacity(num_pending);
        let (mut next_leaf, mut next_internal) = (0, num_leaves);
        for node in &self.pending {
            if node.children.is_none() {
                ids.push(next_leaf);
                next_leaf += 1;
            } else {
                ids.push(next_internal);
                next_internal += 1;
            }
        }

        let mut labels = LeafLabelMap::new(num_leaves);
        let mut slots: Vec<Option<CfNode>> = vec![None; num_pending];
        for (handle, node) in self.pending.into_iter().enumerate() {
            let id = ids[handle];
            let parent = parents[handle].map(|p| ids[p]);
            let cf_node = match (node.children, node.label) {
                (Some((left, right)), _) => CfNode::Internal {
                    id,
                    parent,
                    children: (ids[left], ids[right]),
                    height: node.height,
                },
                (None, label) => {
                    let label = label.unwrap_or_default();
                    if labels.insert_unique(&label).is_none() {
                        return Err(ClonalFrameError::DuplicateLabel(label));
                    }
                    CfNode::Leaf {
                        id,
                        parent,
                        height: node.height,
                    }
                }
            };
            slots[id] = Some(cf_node);
        }

        // Every id in 0..num_pending was assigned exactly once above
        let nodes: Vec<CfNode> = slots.into_iter().flatten().collect();
        debug_assert_eq!(nodes.len(), num_pending);

        Ok(ClonalFrame::from_parts(nodes, ids[root], labels))
    }
}


// =#========================================================================#=
// CLONAL FRAME ERROR
// =#========================================================================#=
/// Structural problems detected when building a [ClonalFrame].
///
/// Nodes are referred to by their [BuilderHandle].
#[derive(Debug, Clone, PartialEq)]
pub enum ClonalFrameError {
    /// No node was added.
    Empty,
    /// No root was added (and the frame is not a single leaf).
    MissingRoot,
    /// More than one root was added.
    MultipleRoots,
    /// A child handle does not refer to a previously added node.
    UnknownNode(BuilderHandle),
    /// A node is the child of more than one node (or the root has a parent).
    MultipleParents(BuilderHandle),
    /// A non-root node has no parent.
    Unattached(BuilderHandle),
    /// A height is negative or not finite.
    InvalidHeight { node: BuilderHandle, height: f64 },
    /// A parent is not strictly higher than its child.
    NonIncreasingHeight {
        child: BuilderHandle,
        parent: BuilderHandle,
    },
    /// Two leaves have the same label.
    DuplicateLabel(String),
}

impl fmt::Display for ClonalFrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "clonal frame has no nodes"),
            Self::MissingRoot => write!(f, "clonal frame has no root"),
            Self::MultipleRoots => write!(f, "clonal frame has more than one root"),
            Self::UnknownNode(handle) => write!(f, "unknown child node {handle}"),
            Self::MultipleParents(handle) => write!(f, "node {handle} has more than one parent"),
            Self::Unattached(handle) => write!(f, "node {handle} is not attached to a parent"),
            Self::InvalidHeight { node, height } => {
                write!(f, "node {node} has invalid height {height}")
            }
            Self::NonIncreasingHeight { child, parent } => {
                write!(f, "parent {parent} is not strictly higher than its child {child}")
            }
            Self::DuplicateLabel(label) => write!(f, "duplicate leaf label '{label}'"),
        }
    }
}

impl Error for ClonalFrameError {}
