//! Error types for marginal tree reconstruction.
//!
//! This module provides [ReconstructionError] and [ReconstructionErrorType].
//! Both kinds indicate malformed input state produced upstream (e.g. by a
//! proposal mechanism); reconstruction is deterministic, so retrying is futile.

use std::error::Error;
use std::fmt;

// =#========================================================================#=
// RECONSTRUCTION ERROR TYPE
// =#========================================================================#=
/// Error kinds that can occur when reconstructing a marginal tree.
#[derive(PartialEq, Debug, Clone)]
pub enum ReconstructionErrorType {
    /// A conversion does not fit onto the clonal frame: unknown donor or
    /// recipient node, or a height outside its attachment branches.
    StructuralInconsistency(String),
    /// The sweep did not end with exactly one lineage at the clonal frame root,
    /// or its lineage bookkeeping was otherwise corrupted.
    InvariantViolation(String),
}


// =#========================================================================#=
// RECONSTRUCTION ERROR
// =#========================================================================#=
/// Reconstruction error with the sweep height at which it was detected, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconstructionError {
    kind: ReconstructionErrorType,
    height: Option<f64>,
}

impl ReconstructionError {
    /// Convenience constructor for StructuralInconsistency
    pub fn structural_inconsistency(msg: String, height: Option<f64>) -> Self {
        Self {
            kind: ReconstructionErrorType::StructuralInconsistency(msg),
            height,
        }
    }

    /// Convenience constructor for InvariantViolation
    pub fn invariant_violation(msg: String, height: Option<f64>) -> Self {
        Self {
            kind: ReconstructionErrorType::InvariantViolation(msg),
            height,
        }
    }

    /// Attaches the sweep height, unless one is already set.
    pub(crate) fn at_height(mut self, height: f64) -> Self {
        self.height.get_or_insert(height);
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> &ReconstructionErrorType {
        &self.kind
    }

    /// Get the height at which the error was detected
    pub fn height(&self) -> Option<f64> {
        self.height
    }

    /// Returns `true` for a StructuralInconsistency.
    pub fn is_structural(&self) -> bool {
        matches!(self.kind, ReconstructionErrorType::StructuralInconsistency(_))
    }

    /// Returns `true` for an InvariantViolation.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self.kind, ReconstructionErrorType::InvariantViolation(_))
    }
}

impl fmt::Display for ReconstructionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.kind {
            ReconstructionErrorType::StructuralInconsistency(msg) => {
                write!(f, "Structural inconsistency - {msg}")?
            }
            ReconstructionErrorType::InvariantViolation(msg) => {
                write!(f, "Invariant violation - {msg}")?
            }
        }

        if let Some(height) = self.height {
            write!(f, " at height {height}")?;
        }

        Ok(())
    }
}

impl Error for ReconstructionError {}
