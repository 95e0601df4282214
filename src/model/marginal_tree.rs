//! Marginal tree module: the inherited history of one block.

use crate::model::clonal_frame::CfNodeId;
use crate::model::time_tree::TimeTree;
use std::fmt;

/// Id of a node in a [MarginalTree], doubling as its arena index.
///
/// Leaves reuse the [CfNodeId] of their clonal frame leaf; internal nodes are
/// numbered from the number of leaves on, in the order they were created.
pub type MarginalId = usize;

// =#========================================================================#=
// MARGINAL NODE
// =#========================================================================#=
/// A node of a [MarginalTree].
///
/// Internal nodes arise either at a clonal frame coalescence or at a
/// conversion joining two lineages; `cf_node` records the clonal frame node
/// whose lineage the node continues (for conversions, the recipient).
/// It is an annotation only.
#[derive(Debug, Clone, PartialEq)]
pub struct MarginalNode {
    id: MarginalId,
    height: f64,
    children: Option<(MarginalId, MarginalId)>,
    parent: Option<MarginalId>,
    cf_node: CfNodeId,
}

impl MarginalNode {
    pub(crate) fn new_leaf(id: MarginalId, height: f64, cf_node: CfNodeId) -> Self {
        MarginalNode {
            id,
            height,
            children: None,
            parent: None,
            cf_node,
        }
    }

    pub(crate) fn new_internal(
        id: MarginalId,
        height: f64,
        children: (MarginalId, MarginalId),
        cf_node: CfNodeId,
    ) -> Self {
        MarginalNode {
            id,
            height,
            children: Some(children),
            parent: None,
            cf_node,
        }
    }

    pub(crate) fn set_parent(&mut self, parent: MarginalId) {
        self.parent = Some(parent);
    }

    /// Returns the id of this node.
    pub fn id(&self) -> MarginalId {
        self.id
    }

    /// Returns the height of this node.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Returns the (ordered) children, or `None` for a leaf.
    pub fn children(&self) -> Option<(MarginalId, MarginalId)> {
        self.children
    }

    /// Returns the parent, or `None` for the root.
    pub fn parent(&self) -> Option<MarginalId> {
        self.parent
    }

    /// Returns the clonal frame node this node was derived from.
    pub fn cf_node(&self) -> CfNodeId {
        self.cf_node
    }

    /// Returns `true` if this node is a leaf.
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Returns `true` if this node is the root.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

// =#========================================================================#=
// MARGINAL TREE
// =#========================================================================#=
/// The bifurcating tree of one block, obtained by projecting a clonal frame
/// and the block's conversions.
///
/// A plain value: it holds no reference back to the frame or conversions.
/// Node ids equal arena indices; leaves occupy `0..num_leaves` (same ids as
/// in the clonal frame), so the frame's [LeafLabelMap](crate::model::LeafLabelMap)
/// labels this tree as well.
#[derive(Debug, Clone, PartialEq)]
pub struct MarginalTree {
    nodes: Vec<MarginalNode>,
    root: MarginalId,
    num_leaves: usize,
}

impl MarginalTree {
    /// Assembles a tree from nodes indexed by id, linking parents.
    pub(crate) fn from_nodes(
        mut nodes: Vec<MarginalNode>,
        root: MarginalId,
        num_leaves: usize,
    ) -> Self {
        for index in 0..nodes.len() {
            if let Some((left, right)) = nodes[index].children {
                nodes[left].set_parent(index);
                nodes[right].set_parent(index);
            }
        }

        MarginalTree {
            nodes,
            root,
            num_leaves,
        }
    }

    /// Returns a reference to the root node.
    pub fn root(&self) -> &MarginalNode {
        &self.nodes[self.root]
    }

    /// Returns the id of the root.
    pub fn root_id(&self) -> MarginalId {
        self.root
    }

    /// Returns the node with the given id, or `None` if there is no such node.
    pub fn node(&self, id: MarginalId) -> Option<&MarginalNode> {
        self.nodes.get(id)
    }

    /// Returns all nodes in id order.
    pub fn nodes(&self) -> &[MarginalNode] {
        &self.nodes
    }

    /// Returns the number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }
}

impl TimeTree for MarginalTree {
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
        self.nodes[index].height
    }

    fn children_of(&self, index: usize) -> Option<(usize, usize)> {
        self.nodes[index].children
    }

    fn parent_of(&self, index: usize) -> Option<usize> {
        self.nodes[index].parent
    }

    fn leaf_id_of(&self, index: usize) -> Option<usize> {
        self.nodes[index].is_leaf().then_some(index)
    }
}

impl std::ops::Index<MarginalId> for MarginalTree {
    type Output = MarginalNode;

    fn index(&self, id: MarginalId) -> &Self::Output {
        &self.nodes[id]
    }
}

/// Prints the tree as an indented outline, e.g.:
/// ```text
/// MarginalTree with 3 leaves (5 nodes):
/// [4] height 1 (cf 3)
///   ├─ [3] height 0.5 (cf 0)
///   │  ├─ [0] leaf height 0
///   │  └─ [2] leaf height 0
///   └─ [1] leaf height 0
/// ```
impl fmt::Display for MarginalTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "MarginalTree with {} leaves ({} nodes):", self.num_leaves, self.nodes.len())?;

        // (id, prefix, is_last, is_top)
        let mut stack = vec![(self.root, String::new(), true, true)];
        while let Some((id, prefix, is_last, is_top)) = stack.pop() {
            let node = &self.nodes[id];
            let connector = if is_top { "" } else if is_last { "└─ " } else { "├─ " };

            match node.children {
                None => writeln!(f, "{prefix}{connector}[{id}] leaf height {}", node.height)?,
                Some((left, right)) => {
                    writeln!(
                        f,
                        "{prefix}{connector}[{id}] height {} (cf {})",
                        node.height, node.cf_node
                    )?;
                    let child_prefix = if is_top {
                        "  ".to_string()
                    } else {
                        format!("{prefix}{}  ", if is_last { " " } else { "│" })
                    };
                    stack.push((right, child_prefix.clone(), true, false));
                    stack.push((left, child_prefix, false, false));
                }
            }
        }

        Ok(())
    }
}
