//! Commitment of encoded tree key requests.
//!
//! Commitments are linear in the encoded vector, so the commitment of
//! `(address, tree_index)` is the commitment of the address terms plus the
//! commitment of the tree index terms. [`Evaluator::evaluate_address`] computes
//! the first part once per account and [`Evaluator::add_tree_index`] extends it
//! per page.

use crate::{
    constant::{PRECOMP_WINDOW_SIZE, TREE_KEY_POLY_LEN},
    crs::TREE_KEY_CRS,
    encoding::{encode_address, encode_tree_index, encode_tree_key_input, TREE_INDEX_LO},
    Address32, EvaluatedAddressPoint,
};
use alloy_primitives::U256;
use banderwagon::{committer::Committer, Element, Fr};
use once_cell::sync::Lazy;
use std::sync::Arc;

/// Global committer over the tree key basis, built on first use.
static SHARED_COMMITTER: Lazy<Arc<Committer>> =
    Lazy::new(|| Arc::new(Committer::new(TREE_KEY_CRS.generators(), PRECOMP_WINDOW_SIZE)));

/// Commits encoded tree key requests against the tree key basis.
#[derive(Debug, Clone)]
pub struct Evaluator {
    committer: Arc<Committer>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    /// An evaluator backed by the process-wide committer.
    pub fn new() -> Self {
        Self {
            committer: Arc::clone(&SHARED_COMMITTER),
        }
    }

    /// An evaluator with its own tables of the given window size. Reuses the
    /// shared committer when the window size is the default one.
    ///
    /// # Panics
    ///
    /// Panics on window sizes the committer does not support; validate
    /// through [`DeriverConfig`](crate::DeriverConfig) first.
    pub fn with_window_size(window_size: usize) -> Self {
        if window_size == PRECOMP_WINDOW_SIZE {
            return Self::new();
        }
        Self {
            committer: Arc::new(Committer::new(TREE_KEY_CRS.generators(), window_size)),
        }
    }

    /// `sum(poly[i] * G[i])`.
    pub fn commit(&self, poly: &[Fr; TREE_KEY_POLY_LEN]) -> Element {
        self.committer.commit(poly)
    }

    /// Commitment of the full encoding of `(address, tree_index)`.
    pub fn evaluate(&self, address: &Address32, tree_index: &U256) -> EvaluatedAddressPoint {
        EvaluatedAddressPoint(self.commit(&encode_tree_key_input(address, tree_index)))
    }

    /// Commitment of the marker and address terms only. Equal to
    /// `evaluate(address, 0)`.
    pub fn evaluate_address(&self, address: &Address32) -> EvaluatedAddressPoint {
        EvaluatedAddressPoint(self.commit(&encode_address(address)))
    }

    /// Adds the tree index terms to an address-only commitment.
    pub fn add_tree_index(&self, evaluated: &EvaluatedAddressPoint, tree_index: &U256) -> Element {
        if tree_index.is_zero() {
            return evaluated.0;
        }
        let poly = encode_tree_index(tree_index);
        let terms = [
            (TREE_INDEX_LO, poly[TREE_INDEX_LO]),
            (TREE_INDEX_LO + 1, poly[TREE_INDEX_LO + 1]),
        ];
        evaluated.0 + self.committer.commit_sparse(&terms)
    }
}
