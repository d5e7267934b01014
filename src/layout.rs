//! Placement of storage slots and code chunks in an account's key space.
//!
//! Both functions return the `(tree_index, sub_index)` pair of the leaf.

use crate::constant::{
    CODE_OFFSET, CODE_STORAGE_DELTA, HEADER_STORAGE_OFFSET, MAIN_STORAGE_OFFSET_PAGE,
    VERKLE_NODE_WIDTH_BITS,
};
use alloy_primitives::U256;

/// Location of a storage slot.
///
/// Slots below 64 share the header page at sub-indices `64..128`. All other
/// slots live at position `MAIN_STORAGE_OFFSET + slot`, split into page and
/// offset within the page.
pub fn storage_index(storage_key: &U256) -> (U256, u8) {
    if *storage_key < CODE_STORAGE_DELTA {
        // cannot overflow since the key is below 64
        let pos = HEADER_STORAGE_OFFSET + storage_key;
        return (U256::ZERO, low_byte(&pos));
    }

    // MAIN_STORAGE_OFFSET is a multiple of the node width, so the page is
    // key / 256 + 256^30 and the sub-index is the key's low byte.
    let tree_index = (*storage_key >> VERKLE_NODE_WIDTH_BITS) + MAIN_STORAGE_OFFSET_PAGE;
    (tree_index, low_byte(storage_key))
}

/// Location of a code chunk: position `CODE_OFFSET + chunk`, so the first 128
/// chunks fill the upper half of the header page.
///
/// The position wraps modulo 2^256, matching 256-bit word arithmetic.
pub fn code_chunk_index(chunk: &U256) -> (U256, u8) {
    let pos = CODE_OFFSET.wrapping_add(*chunk);
    (pos >> VERKLE_NODE_WIDTH_BITS, low_byte(&pos))
}

#[inline]
fn low_byte(value: &U256) -> u8 {
    value.as_limbs()[0] as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constant::MAIN_STORAGE_OFFSET;

    #[test]
    fn header_storage_slots() {
        assert_eq!(storage_index(&U256::ZERO), (U256::ZERO, 64));
        assert_eq!(storage_index(&U256::from(1u64)), (U256::ZERO, 65));
        assert_eq!(storage_index(&U256::from(63u64)), (U256::ZERO, 127));
    }

    #[test]
    fn main_storage_slots() {
        assert_eq!(
            storage_index(&U256::from(64u64)),
            (MAIN_STORAGE_OFFSET_PAGE, 64)
        );
        assert_eq!(
            storage_index(&U256::from(0x1234u64)),
            (MAIN_STORAGE_OFFSET_PAGE + U256::from(0x12u64), 0x34)
        );

        // position = MAIN_STORAGE_OFFSET + key, which exceeds 256 bits here
        let key = U256::MAX;
        let (tree_index, sub_index) = storage_index(&key);
        assert_eq!(sub_index, 0xff);
        assert_eq!(tree_index, (key >> 8usize) + (MAIN_STORAGE_OFFSET >> 8usize));
    }

    #[test]
    fn code_chunks() {
        assert_eq!(code_chunk_index(&U256::ZERO), (U256::ZERO, 128));
        assert_eq!(code_chunk_index(&U256::from(127u64)), (U256::ZERO, 255));
        assert_eq!(code_chunk_index(&U256::from(128u64)), (U256::from(1u64), 0));
        assert_eq!(
            code_chunk_index(&U256::from(10000u64)),
            (U256::from(39u64), 144)
        );
    }

    #[test]
    fn code_chunk_position_wraps() {
        let (tree_index, sub_index) = code_chunk_index(&U256::MAX);
        // 128 + (2^256 - 1) = 127 mod 2^256
        assert_eq!((tree_index, sub_index), (U256::ZERO, 127));
    }
}
