//! Read interface shared by clonal frames and marginal trees.
//!
//! Both tree types are rooted binary trees with node heights stored in an
//! arena. The [TimeTree] trait exposes what a likelihood routine (or the
//! Newick writer) needs: the root, counts, and per-node height, children and
//! parent. Traversals are provided as stack-based iterators over indices.

/// Float comparison tolerance for heights
pub const HEIGHT_EPSILON: f64 = 1e-9;

/// Read-only access to a rooted binary tree with node heights.
///
/// Indices are arena indices of the implementing tree; they are valid in
/// `0..num_vertices()`. Methods taking an index panic if it is out of bounds.
pub trait TimeTree {
    /// Returns the index of the root.
    fn root_index(&self) -> usize;

    /// Returns the total number of nodes.
    fn num_vertices(&self) -> usize;

    /// Returns the number of leaves.
    fn num_leaves(&self) -> usize;

    /// Returns the height of the node at `index`.
    fn height_of(&self, index: usize) -> f64;

    /// Returns the children of the node at `index`, or `None` for a leaf.
    fn children_of(&self, index: usize) -> Option<(usize, usize)>;

    /// Returns the parent of the node at `index`, or `None` for the root.
    fn parent_of(&self, index: usize) -> Option<usize>;

    /// Returns the leaf id (label index) if the node at `index` is a leaf.
    fn leaf_id_of(&self, index: usize) -> Option<usize>;

    /// Returns the number of internal nodes (root included).
    fn num_internal(&self) -> usize {
        self.num_vertices() - self.num_leaves()
    }

    /// Returns the height of the root.
    fn tree_height(&self) -> f64 {
        self.height_of(self.root_index())
    }

    /// Returns the length of the branch above the node at `index`,
    /// or `None` for the root.
    fn branch_length_of(&self, index: usize) -> Option<f64> {
        self.parent_of(index)
            .map(|parent| self.height_of(parent) - self.height_of(index))
    }

    /// Returns the sum of all branch lengths.
    fn total_branch_length(&self) -> f64 {
        (0..self.num_vertices())
            .filter_map(|index| self.branch_length_of(index))
            .sum()
    }

    /// Returns an iterator over node indices in post-order (children before parents).
    fn post_order(&self) -> PostOrderIter<'_, Self>
    where
        Self: Sized,
    {
        PostOrderIter::new(self)
    }

    /// Returns an iterator over node indices in pre-order (parents before children).
    fn pre_order(&self) -> PreOrderIter<'_, Self>
    where
        Self: Sized,
    {
        PreOrderIter::new(self)
    }
}

/// Checks whether two trees have the same shape: same topology including
/// child order, same leaf ids, and heights equal within [HEIGHT_EPSILON].
///
/// Internal node ids are not compared, so a clonal frame and a marginal tree
/// derived from it without conversions have the same shape.
pub fn same_shape<A: TimeTree, B: TimeTree>(a: &A, b: &B) -> bool {
    if a.num_vertices() != b.num_vertices() || a.num_leaves() != b.num_leaves() {
        return false;
    }

    let mut stack = vec![(a.root_index(), b.root_index())];
    while let Some((index_a, index_b)) = stack.pop() {
        if (a.height_of(index_a) - b.height_of(index_b)).abs() > HEIGHT_EPSILON {
            return false;
        }

        match (a.children_of(index_a), b.children_of(index_b)) {
            (None, None) => {
                if a.leaf_id_of(index_a) != b.leaf_id_of(index_b) {
                    return false;
                }
            }
            (Some((left_a, right_a)), Some((left_b, right_b))) => {
                stack.push((right_a, right_b));
                stack.push((left_a, left_b));
            }
            _ => return false,
        }
    }

    true
}


// =#========================================================================#=
// ITERATORS
// =#========================================================================#=
/// Iterator for post-order traversal (children before parents).
///
/// Uses an explicit stack, so deep (caterpillar) trees do not recurse.
pub struct PostOrderIter<'a, T: TimeTree> {
    tree: &'a T,
    stack: Vec<(usize, bool)>, // (index, children_visited)
}

impl<'a, T: TimeTree> PostOrderIter<'a, T> {
    fn new(tree: &'a T) -> Self {
        PostOrderIter {
            tree,
            stack: vec![(tree.root_index(), false)],
        }
    }
}

impl<T: TimeTree> Iterator for PostOrderIter<'_, T> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((index, children_visited)) = self.stack.pop() {
            match self.tree.children_of(index) {
                Some((left, right)) if !children_visited => {
                    self.stack.push((index, true));
                    // Right first, so left is processed first
                    self.stack.push((right, false));
                    self.stack.push((left, false));
                }
                _ => return Some(index),
            }
        }
        None
    }
}

/// Iterator for pre-order traversal (parents before children).
pub struct PreOrderIter<'a, T: TimeTree> {
    tree: &'a T,
    stack: Vec<usize>,
}

impl<'a, T: TimeTree> PreOrderIter<'a, T> {
    fn new(tree: &'a T) -> Self {
        PreOrderIter {
            tree,
            stack: vec![tree.root_index()],
        }
    }
}

impl<T: TimeTree> Iterator for PreOrderIter<'_, T> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        if let Some((left, right)) = self.tree.children_of(index) {
            self.stack.push(right);
            self.stack.push(left);
        }
        Some(index)
    }
}
