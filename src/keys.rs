//! Per-field tree keys of an account.
//!
//! Every field comes in two flavours: a direct one that starts from the
//! address, and a `_with_evaluated_address` one that starts from the
//! [`EvaluatedAddressPoint`] returned by
//! [`TreeKeyDeriver::evaluate_address_point`]. Both produce identical keys; the
//! second skips the address part of the commitment, which dominates the cost
//! when many keys of one account are needed.

use crate::{
    commitment::{batch_points_to_stems, point_to_tree_key},
    config::DeriverConfig,
    constant::{
        BALANCE_LEAF_KEY, CODE_KECCAK_LEAF_KEY, CODE_SIZE_LEAF_KEY, NONCE_LEAF_KEY,
        VERSION_LEAF_KEY,
    },
    evaluator::Evaluator,
    layout::{code_chunk_index, storage_index},
    types::Stem,
    Address32, EvaluatedAddressPoint, KeyError, TreeKey,
};
use alloy_primitives::{B256, U256};
use rayon::prelude::*;
use std::collections::HashMap;

/// Minimum number of distinct pages before batch derivation goes parallel.
const MIN_PAR_BATCH_SIZE: usize = 64;

/// Derives tree keys. Cheap to clone and safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct TreeKeyDeriver {
    evaluator: Evaluator,
}

impl TreeKeyDeriver {
    /// A deriver backed by the process-wide commitment tables.
    pub fn new() -> Self {
        Self {
            evaluator: Evaluator::new(),
        }
    }

    /// A deriver with its own tables when the configured window size differs
    /// from the default. Fails on an invalid config.
    pub fn with_config(config: &DeriverConfig) -> Result<Self, KeyError> {
        config.validate()?;
        Ok(Self {
            evaluator: Evaluator::with_window_size(config.precomp_window_size),
        })
    }

    /// The evaluator backing this deriver.
    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Commitment of the address terms, reusable for every key of `address`.
    pub fn evaluate_address_point(&self, address: &Address32) -> EvaluatedAddressPoint {
        self.evaluator.evaluate_address(address)
    }

    /// Commitment of the page `tree_index` of `address`. Feeding it to
    /// [`point_to_tree_key`] gives the keys of that page.
    pub fn evaluate_tree_point(&self, address: &Address32, tree_index: &U256) -> EvaluatedAddressPoint {
        self.evaluator.evaluate(address, tree_index)
    }

    /// The key of leaf `sub_index` in page `tree_index` of `address`.
    pub fn tree_key(&self, address: &Address32, tree_index: &U256, sub_index: u8) -> TreeKey {
        let point = self.evaluator.evaluate(address, tree_index);
        point_to_tree_key(&point.0, sub_index)
    }

    /// Same as [`TreeKeyDeriver::tree_key`] from a precomputed address point.
    pub fn tree_key_with_evaluated_address(
        &self,
        evaluated: &EvaluatedAddressPoint,
        tree_index: &U256,
        sub_index: u8,
    ) -> TreeKey {
        let point = self.evaluator.add_tree_index(evaluated, tree_index);
        point_to_tree_key(&point, sub_index)
    }

    /// Stem of the header page of `address`.
    pub fn stem(&self, address: &Address32) -> Stem {
        self.version_key(address).stem()
    }

    /// Key of the account version.
    pub fn version_key(&self, address: &Address32) -> TreeKey {
        self.tree_key(address, &U256::ZERO, VERSION_LEAF_KEY)
    }

    /// Key of the account balance.
    pub fn balance_key(&self, address: &Address32) -> TreeKey {
        self.tree_key(address, &U256::ZERO, BALANCE_LEAF_KEY)
    }

    /// Key of the account nonce.
    pub fn nonce_key(&self, address: &Address32) -> TreeKey {
        self.tree_key(address, &U256::ZERO, NONCE_LEAF_KEY)
    }

    /// Key of the keccak hash of the account code.
    pub fn code_keccak_key(&self, address: &Address32) -> TreeKey {
        self.tree_key(address, &U256::ZERO, CODE_KECCAK_LEAF_KEY)
    }

    /// Key of the account code size.
    pub fn code_size_key(&self, address: &Address32) -> TreeKey {
        self.tree_key(address, &U256::ZERO, CODE_SIZE_LEAF_KEY)
    }

    /// Key of code chunk `chunk`.
    pub fn code_chunk_key(&self, address: &Address32, chunk: &U256) -> TreeKey {
        let (tree_index, sub_index) = code_chunk_index(chunk);
        self.tree_key(address, &tree_index, sub_index)
    }

    /// Key of a storage slot. `storage_key` is the big-endian slot number.
    pub fn storage_slot_key(&self, address: &Address32, storage_key: &B256) -> TreeKey {
        let (tree_index, sub_index) = storage_index(&U256::from_be_bytes(storage_key.0));
        self.tree_key(address, &tree_index, sub_index)
    }

    /// [`TreeKeyDeriver::version_key`] from an evaluated address point.
    pub fn version_key_with_evaluated_address(&self, evaluated: &EvaluatedAddressPoint) -> TreeKey {
        self.tree_key_with_evaluated_address(evaluated, &U256::ZERO, VERSION_LEAF_KEY)
    }

    /// [`TreeKeyDeriver::balance_key`] from an evaluated address point.
    pub fn balance_key_with_evaluated_address(&self, evaluated: &EvaluatedAddressPoint) -> TreeKey {
        self.tree_key_with_evaluated_address(evaluated, &U256::ZERO, BALANCE_LEAF_KEY)
    }

    /// [`TreeKeyDeriver::nonce_key`] from an evaluated address point.
    pub fn nonce_key_with_evaluated_address(&self, evaluated: &EvaluatedAddressPoint) -> TreeKey {
        self.tree_key_with_evaluated_address(evaluated, &U256::ZERO, NONCE_LEAF_KEY)
    }

    /// [`TreeKeyDeriver::code_keccak_key`] from an evaluated address point.
    pub fn code_keccak_key_with_evaluated_address(
        &self,
        evaluated: &EvaluatedAddressPoint,
    ) -> TreeKey {
        self.tree_key_with_evaluated_address(evaluated, &U256::ZERO, CODE_KECCAK_LEAF_KEY)
    }

    /// [`TreeKeyDeriver::code_size_key`] from an evaluated address point.
    pub fn code_size_key_with_evaluated_address(
        &self,
        evaluated: &EvaluatedAddressPoint,
    ) -> TreeKey {
        self.tree_key_with_evaluated_address(evaluated, &U256::ZERO, CODE_SIZE_LEAF_KEY)
    }

    /// [`TreeKeyDeriver::code_chunk_key`] from an evaluated address point.
    pub fn code_chunk_key_with_evaluated_address(
        &self,
        evaluated: &EvaluatedAddressPoint,
        chunk: &U256,
    ) -> TreeKey {
        let (tree_index, sub_index) = code_chunk_index(chunk);
        self.tree_key_with_evaluated_address(evaluated, &tree_index, sub_index)
    }

    /// [`TreeKeyDeriver::storage_slot_key`] from an evaluated address point.
    pub fn storage_slot_key_with_evaluated_address(
        &self,
        evaluated: &EvaluatedAddressPoint,
        storage_key: &B256,
    ) -> TreeKey {
        let (tree_index, sub_index) = storage_index(&U256::from_be_bytes(storage_key.0));
        self.tree_key_with_evaluated_address(evaluated, &tree_index, sub_index)
    }

    /// Version, balance, nonce, code keccak and code size keys, in that
    /// order, from a single commitment.
    pub fn header_keys(&self, address: &Address32) -> [TreeKey; 5] {
        let stem = point_to_tree_key(&self.evaluate_address_point(address).0, 0).stem();
        [
            VERSION_LEAF_KEY,
            BALANCE_LEAF_KEY,
            NONCE_LEAF_KEY,
            CODE_KECCAK_LEAF_KEY,
            CODE_SIZE_LEAF_KEY,
        ]
        .map(|sub_index| TreeKey::new(&stem, sub_index))
    }

    /// Keys of many storage slots of one account.
    ///
    /// The address is committed once and every distinct page once; stems are
    /// hashed together with a single field inversion.
    pub fn storage_slot_keys(&self, address: &Address32, storage_keys: &[B256]) -> Vec<TreeKey> {
        let evaluated = self.evaluate_address_point(address);
        let locations: Vec<(U256, u8)> = storage_keys
            .iter()
            .map(|key| storage_index(&U256::from_be_bytes(key.0)))
            .collect();

        let mut pages: Vec<U256> = locations.iter().map(|(tree_index, _)| *tree_index).collect();
        pages.sort_unstable();
        pages.dedup();

        let points: Vec<_> = if pages.len() >= MIN_PAR_BATCH_SIZE {
            pages
                .par_iter()
                .map(|page| self.evaluator.add_tree_index(&evaluated, page))
                .collect()
        } else {
            pages
                .iter()
                .map(|page| self.evaluator.add_tree_index(&evaluated, page))
                .collect()
        };
        let stems: HashMap<U256, Stem> = pages
            .into_iter()
            .zip(batch_points_to_stems(&points))
            .collect();

        locations
            .iter()
            .map(|(tree_index, sub_index)| TreeKey::new(&stems[tree_index], *sub_index))
            .collect()
    }
}
