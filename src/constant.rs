//! Consensus constants of the verkle account layout (EIP-6800).
//!
//! Every account owns a 256-wide "header" page at tree index 0. Its first
//! sub-indices hold the account fields, sub-indices `64..128` hold the first
//! 64 storage slots and `128..256` hold the first 128 code chunks. Everything
//! else is spread over pages at non-zero tree indices.
use alloy_primitives::U256;

/// Sub-index of the account version in the header page.
pub const VERSION_LEAF_KEY: u8 = 0;
/// Sub-index of the account balance in the header page.
pub const BALANCE_LEAF_KEY: u8 = 1;
/// Sub-index of the account nonce in the header page.
pub const NONCE_LEAF_KEY: u8 = 2;
/// Sub-index of the keccak hash of the account code in the header page.
pub const CODE_KECCAK_LEAF_KEY: u8 = 3;
/// Sub-index of the account code size in the header page.
pub const CODE_SIZE_LEAF_KEY: u8 = 4;

/// Number of bits to represent `VERKLE_NODE_WIDTH`.
pub const VERKLE_NODE_WIDTH_BITS: usize = 8;
/// Number of leaves under one stem.
pub const VERKLE_NODE_WIDTH: usize = 1 << VERKLE_NODE_WIDTH_BITS;

/// First header sub-index used for storage slots.
pub const HEADER_STORAGE_OFFSET: U256 = U256::from_limbs([64, 0, 0, 0]);
/// First header sub-index used for code chunks.
pub const CODE_OFFSET: U256 = U256::from_limbs([128, 0, 0, 0]);
/// Storage slots below this value are packed into the header page.
pub const CODE_STORAGE_DELTA: U256 = U256::from_limbs([64, 0, 0, 0]);
/// Position of the main storage area: `256^31`.
pub const MAIN_STORAGE_OFFSET: U256 = U256::from_limbs([0, 0, 0, 1 << 56]);
/// `MAIN_STORAGE_OFFSET / VERKLE_NODE_WIDTH`, i.e. `2^240`.
pub const MAIN_STORAGE_OFFSET_PAGE: U256 = U256::from_limbs([0, 0, 0, 1 << 48]);

/// Domain separation marker placed first in the committed vector:
/// `2 + 256 * 64`, where 64 is the byte length of `address32 || tree_index`.
pub const TREE_KEY_MARKER: u64 = 2 + 256 * 64;

/// Number of 16-byte words committed to per tree key: the marker, two address
/// halves and two tree index halves.
pub const TREE_KEY_POLY_LEN: usize = 5;

/// Seed of the verkle common reference string.
pub const CRS_SEED: &[u8] = b"eth_verkle_oct_2021";

/// The window size of the precomputed commitment tables.
pub const PRECOMP_WINDOW_SIZE: usize = 11;

/// Default number of evaluated address points kept by a [`PointCache`](crate::PointCache).
pub const DEFAULT_POINT_CACHE_CAPACITY: u32 = 4096;
