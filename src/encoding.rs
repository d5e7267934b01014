//! Encoding of a tree key request into the committed scalar vector.
//!
//! The committed bytes are `address32 || tree_index.to_le_bytes()`, split into
//! 16-byte little-endian words and preceded by [`TREE_KEY_MARKER`]:
//!
//! ```text
//! [ marker, LE(address[0..16]), LE(address[16..32]), tree_index_lo, tree_index_hi ]
//! ```
//!
//! Every word is below 2^128, so no reduction ever happens and the encoding
//! is injective.

use crate::{
    constant::{TREE_KEY_MARKER, TREE_KEY_POLY_LEN},
    Address32,
};
use alloy_primitives::U256;
use banderwagon::{Fr, PrimeField, Zero};

/// Position of the low half of the address in the encoded vector.
pub(crate) const ADDRESS_LO: usize = 1;
/// Position of the low half of the tree index in the encoded vector.
pub(crate) const TREE_INDEX_LO: usize = 3;

/// Full encoding of `(address, tree_index)`.
pub fn encode_tree_key_input(address: &Address32, tree_index: &U256) -> [Fr; TREE_KEY_POLY_LEN] {
    let mut poly = encode_address(address);
    let [lo, hi] = tree_index_words(tree_index);
    poly[TREE_INDEX_LO] = lo;
    poly[TREE_INDEX_LO + 1] = hi;
    poly
}

/// The marker and address terms; tree index terms are zero.
pub fn encode_address(address: &Address32) -> [Fr; TREE_KEY_POLY_LEN] {
    let bytes = address.as_bytes();
    let mut poly = [Fr::zero(); TREE_KEY_POLY_LEN];
    poly[0] = Fr::from(TREE_KEY_MARKER);
    poly[ADDRESS_LO] = Fr::from_le_bytes_mod_order(&bytes[..16]);
    poly[ADDRESS_LO + 1] = Fr::from_le_bytes_mod_order(&bytes[16..]);
    poly
}

/// The tree index terms; marker and address terms are zero.
pub fn encode_tree_index(tree_index: &U256) -> [Fr; TREE_KEY_POLY_LEN] {
    let mut poly = [Fr::zero(); TREE_KEY_POLY_LEN];
    let [lo, hi] = tree_index_words(tree_index);
    poly[TREE_INDEX_LO] = lo;
    poly[TREE_INDEX_LO + 1] = hi;
    poly
}

/// `tree_index mod 2^128` and `tree_index >> 128`.
fn tree_index_words(tree_index: &U256) -> [Fr; 2] {
    let le: [u8; 32] = tree_index.to_le_bytes();
    [
        Fr::from_le_bytes_mod_order(&le[..16]),
        Fr::from_le_bytes_mod_order(&le[16..]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_request_is_only_the_marker() {
        let poly = encode_tree_key_input(&Address32::default(), &U256::ZERO);
        assert_eq!(poly[0], Fr::from(16386u64));
        assert!(poly[1..].iter().all(Zero::is_zero));
    }

    #[test]
    fn address_halves_are_little_endian() {
        let mut bytes = [0u8; 32];
        bytes[0] = 0x01;
        bytes[16] = 0x02;
        bytes[31] = 0x80;
        let poly = encode_address(&Address32::from(bytes));

        assert_eq!(poly[1], Fr::from(1u64));
        // 0x02 + 0x80 * 2^120
        let hi = Fr::from(2u64) + Fr::from(0x80u64) * Fr::from(1u128 << 120);
        assert_eq!(poly[2], hi);
        assert!(poly[3].is_zero() && poly[4].is_zero());
    }

    #[test]
    fn tree_index_is_split_at_bit_128() {
        let tree_index = (U256::from(7u64) << 128usize) + U256::from(u128::MAX);
        let poly = encode_tree_index(&tree_index);

        assert!(poly[..3].iter().all(Zero::is_zero));
        assert_eq!(poly[3], Fr::from(u128::MAX));
        assert_eq!(poly[4], Fr::from(7u64));
    }

    #[test]
    fn full_encoding_is_sum_of_parts() {
        let address = Address32::from([0x5cu8; 32]);
        let tree_index = U256::from_be_bytes([0xa7u8; 32]);

        let full = encode_tree_key_input(&address, &tree_index);
        let address_part = encode_address(&address);
        let index_part = encode_tree_index(&tree_index);
        for i in 0..TREE_KEY_POLY_LEN {
            assert_eq!(full[i], address_part[i] + index_part[i]);
        }
    }
}
