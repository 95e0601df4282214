//! Leaf label module for clonal frames and their marginal trees.
//!
//! - `LeafLabelMap`: Taxon labels of a clonal frame, where the index of a
//!   label is the [CfNodeId] of the corresponding leaf.

use crate::model::clonal_frame::CfNodeId;
use std::collections::HashMap;
use std::fmt;

// =#========================================================================#=
// LEAF LABEL MAP
// =#========================================================================#=
/// Maps leaf labels (strings) to leaf ids and back.
///
/// A [ClonalFrame](crate::model::ClonalFrame) numbers its leaves `0..n` in
/// the order they were added, and the label map is filled in the same order.
/// Hence the label index of a leaf is its [CfNodeId]. Marginal trees reuse
/// the leaf ids of the clonal frame they were derived from, so the same map
/// serves to label them too.
///
/// # Example
/// ```
/// use acgtree::model::LeafLabelMap;
///
/// let mut labels = LeafLabelMap::new(3);
///
/// let id_a = labels.insert_unique("A").unwrap(); // id_a = 0
/// let id_b = labels.insert_unique("B").unwrap(); // id_b = 1
/// assert!(labels.insert_unique("A").is_none());  // duplicates are refused
///
/// assert_eq!(id_b, 1);
/// assert_eq!(labels.get_label(id_a), Some("A"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeafLabelMap {
    /// Labels in leaf id order
    labels: Vec<String>,
    /// Map from label to leaf id
    map: HashMap<String, CfNodeId>,
}

impl LeafLabelMap {
    /// Creates a new, empty LeafLabelMap with pre-allocated capacity.
    ///
    /// # Arguments
    /// * `num_leaves` - Expected number of leaves
    pub fn new(num_leaves: usize) -> Self {
        LeafLabelMap {
            labels: Vec::with_capacity(num_leaves),
            map: HashMap::with_capacity(num_leaves),
        }
    }

    /// Appends a label and returns its leaf id, or `None` if the label is
    /// already present (leaf labels of a clonal frame are unique).
    pub fn insert_unique(&mut self, label: &str) -> Option<CfNodeId> {
        if self.map.contains_key(label) {
            return None;
        }

        let id = self.labels.len();
        self.labels.push(label.to_string());
        self.map.insert(label.to_string(), id);
        Some(id)
    }

    /// Retrieves the leaf id for a given label.
    ///
    /// # Returns
    /// `Some(id)` if the label exists, `None` otherwise
    pub fn get_index(&self, label: &str) -> Option<CfNodeId> {
        self.map.get(label).copied()
    }

    /// Retrieves the leaf label for a given leaf id.
    ///
    /// # Returns
    /// `Some(&str)` if the id is valid, `None` otherwise
    pub fn get_label(&self, id: CfNodeId) -> Option<&str> {
        self.labels.get(id).map(|s| s.as_str())
    }

    /// Checks if a label exists in the map.
    pub fn contains_label(&self, label: &str) -> bool {
        self.map.contains_key(label)
    }

    /// Returns the number of labels currently stored.
    pub fn num_labels(&self) -> usize {
        self.labels.len()
    }

    /// Returns the labels in leaf id order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl fmt::Display for LeafLabelMap {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "LeafLabelMap ({} labels):", self.labels.len())?;
        for (id, label) in self.labels.iter().enumerate() {
            writeln!(f, "  [{}] {}", id, label)?;
        }
        Ok(())
    }
}

impl std::ops::Index<CfNodeId> for LeafLabelMap {
    type Output = str;

    fn index(&self, id: CfNodeId) -> &Self::Output {
        &self.labels[id]
    }
}
