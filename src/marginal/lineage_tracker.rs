//! Active lineage bookkeeping during the sweep.

use crate::marginal::ReconstructionError;
use crate::model::{CfNodeId, MarginalId};

/// Maps clonal frame nodes to the marginal node currently representing
/// their lineage (the "active lineage map").
///
/// A node is a key iff its lineage is live at the current sweep position.
/// Stored as a table indexed by [CfNodeId], so lookups are plain array
/// accesses and iteration order never depends on hashing.
#[derive(Debug, Clone)]
pub struct LineageTracker {
    slots: Vec<Option<MarginalId>>,
    num_active: usize,
}

impl LineageTracker {
    /// Creates an empty tracker for a frame with `num_cf_nodes` nodes.
    pub fn new(num_cf_nodes: usize) -> Self {
        LineageTracker {
            slots: vec![None; num_cf_nodes],
            num_active: 0,
        }
    }

    /// Returns the marginal node of the lineage keyed by `node`, if live.
    pub fn lineage_of(&self, node: CfNodeId) -> Option<MarginalId> {
        self.slots.get(node).copied().flatten()
    }

    /// Returns whether `node` is a key.
    pub fn is_active(&self, node: CfNodeId) -> bool {
        self.lineage_of(node).is_some()
    }

    /// Returns the number of live lineages.
    pub fn num_active(&self) -> usize {
        self.num_active
    }

    /// Makes `lineage` the live lineage of `node`.
    ///
    /// # Errors
    /// InvariantViolation if `node` already is a key (a live lineage would be
    /// lost) or is not a node of the frame.
    pub fn activate(
        &mut self,
        node: CfNodeId,
        lineage: MarginalId,
    ) -> Result<(), ReconstructionError> {
        let Some(slot) = self.slots.get_mut(node) else {
            return Err(ReconstructionError::invariant_violation(
                format!("clonal frame node {node} is out of range"),
                None,
            ));
        };

        if let Some(live) = *slot {
            return Err(ReconstructionError::invariant_violation(
                format!("clonal frame node {node} already carries live lineage {live}"),
                None,
            ));
        }

        *slot = Some(lineage);
        self.num_active += 1;
        Ok(())
    }

    /// Removes `node` as a key, returning its lineage if it was live.
    pub fn deactivate(&mut self, node: CfNodeId) -> Option<MarginalId> {
        let lineage = self.slots.get_mut(node)?.take();
        if lineage.is_some() {
            self.num_active -= 1;
        }
        lineage
    }

    /// Moves the live lineage of `from` to the key `to`.
    ///
    /// # Returns
    /// `Ok(false)` if `from` was not live (nothing moved).
    pub fn rekey(&mut self, from: CfNodeId, to: CfNodeId) -> Result<bool, ReconstructionError> {
        match self.deactivate(from) {
            Some(lineage) => self.activate(to, lineage).map(|_| true),
            None => Ok(false),
        }
    }

    /// Returns the single live lineage if there is exactly one, together with its key.
    pub fn sole_lineage(&self) -> Option<(CfNodeId, MarginalId)> {
        if self.num_active != 1 {
            return None;
        }

        self.slots
            .iter()
            .enumerate()
            .find_map(|(node, slot)| slot.map(|lineage| (node, lineage)))
    }

    /// Returns the keys of all live lineages, ascending.
    pub fn active_nodes(&self) -> Vec<CfNodeId> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(node, slot)| slot.map(|_| node))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activate_and_lookup() {
        let mut tracker = LineageTracker::new(5);
        tracker.activate(0, 0).unwrap();
        tracker.activate(2, 2).unwrap();

        assert_eq!(tracker.num_active(), 2);
        assert_eq!(tracker.lineage_of(2), Some(2));
        assert!(!tracker.is_active(1));
        assert_eq!(tracker.active_nodes(), vec![0, 2]);
    }

    #[test]
    fn test_activate_live_key_fails() {
        let mut tracker = LineageTracker::new(3);
        tracker.activate(1, 1).unwrap();
        let err = tracker.activate(1, 4).unwrap_err();
        assert!(err.is_invariant_violation());
        assert_eq!(tracker.lineage_of(1), Some(1));
    }

    #[test]
    fn test_activate_out_of_range_fails() {
        let mut tracker = LineageTracker::new(3);
        assert!(tracker.activate(3, 0).is_err());
        assert_eq!(tracker.lineage_of(3), None);
    }

    #[test]
    fn test_rekey_keeps_count() {
        let mut tracker = LineageTracker::new(5);
        tracker.activate(0, 0).unwrap();
        assert!(tracker.rekey(0, 3).unwrap());
        assert!(!tracker.rekey(1, 4).unwrap());

        assert_eq!(tracker.num_active(), 1);
        assert_eq!(tracker.sole_lineage(), Some((3, 0)));
    }

    #[test]
    fn test_sole_lineage_requires_exactly_one() {
        let mut tracker = LineageTracker::new(4);
        assert_eq!(tracker.sole_lineage(), None);
        tracker.activate(0, 0).unwrap();
        tracker.activate(1, 1).unwrap();
        assert_eq!(tracker.sole_lineage(), None);
        tracker.deactivate(1);
        assert_eq!(tracker.sole_lineage(), Some((0, 0)));
    }
}
