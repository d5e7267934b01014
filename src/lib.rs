//! Derivation of Ethereum verkle tree keys.
//!
//! Every piece of account state (version, balance, nonce, code hash, code
//! size, code chunks and storage slots) lives under a 32-byte tree key. The
//! first 31 bytes, the stem, come from a Pedersen commitment of the account
//! address and a 256-bit tree index over five fixed Banderwagon generators:
//! the canonical encoding of the commitment, read little endian. The last
//! byte selects one of the 256 leaves of the page.
//!
//! The crate is layered bottom-up:
//! - [`encoding`] packs `(address, tree_index)` into five scalars.
//! - [`evaluator`] commits them with precomputed window tables.
//! - [`commitment`] turns a commitment into a tree key.
//! - [`layout`] places storage slots and code chunks into pages.
//! - [`keys`] exposes one function per account field, each in a direct form
//!   and a form reusing an [`EvaluatedAddressPoint`].
//! - [`cache`] keeps recently used evaluated points.
//!
//! ```
//! use verkle_keys::{Address32, TreeKeyDeriver};
//!
//! let deriver = TreeKeyDeriver::new();
//! let address = Address32::from([0x11u8; 32]);
//!
//! let evaluated = deriver.evaluate_address_point(&address);
//! assert_eq!(
//!     deriver.balance_key(&address),
//!     deriver.balance_key_with_evaluated_address(&evaluated),
//! );
//! ```

pub mod cache;
pub use cache::{CacheStats, PointCache};
pub mod commitment;
pub use commitment::{batch_points_to_stems, hash_commitment, point_to_tree_key};
pub mod config;
pub use config::DeriverConfig;
pub mod constant;
pub mod crs;
pub mod encoding;
pub mod evaluator;
pub use evaluator::Evaluator;
pub mod keys;
pub use keys::TreeKeyDeriver;
pub mod layout;
pub use layout::{code_chunk_index, storage_index};
pub mod types;
pub use types::*;
