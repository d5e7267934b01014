//! Turning commitments into tree keys.

use crate::{
    types::{Stem, STEM_LEN},
    TreeKey,
};
use banderwagon::Element;

/// Hashes a commitment into 32 bytes: the canonical banderwagon encoding of
/// the point, reversed to little endian.
pub fn hash_commitment(commitment: &Element) -> [u8; 32] {
    let mut bytes = commitment.to_bytes();
    bytes.reverse();
    bytes
}

/// The tree key for `sub_index` under the page committed to by `commitment`:
/// the commitment hash with its last byte replaced by `sub_index`.
pub fn point_to_tree_key(commitment: &Element, sub_index: u8) -> TreeKey {
    let mut key = hash_commitment(commitment);
    key[STEM_LEN] = sub_index;
    TreeKey(key)
}

/// Stems of many commitments at once, sharing a single field inversion.
pub fn batch_points_to_stems(commitments: &[Element]) -> Vec<Stem> {
    Element::batch_to_bytes(commitments)
        .into_iter()
        .map(|mut bytes| {
            bytes.reverse();
            let mut stem = [0u8; STEM_LEN];
            stem.copy_from_slice(&bytes[..STEM_LEN]);
            stem
        })
        .collect()
}
