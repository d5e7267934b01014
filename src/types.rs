//! Core data types of the key derivation engine.
//!
//! - [`Address32`]: an account address left-padded to 32 bytes
//! - [`TreeKey`]: the 32-byte key of a leaf in the verkle tree
//! - [`EvaluatedAddressPoint`]: a cached commitment for one account
//! - [`KeyError`]: failures at the input boundary

use alloy_primitives::{Address, B256};
use banderwagon::Element;
use derive_more::Deref;
use std::fmt;
use thiserror::Error;

/// Length of a stem, the part of a [`TreeKey`] shared by all leaves of a page.
pub const STEM_LEN: usize = 31;

/// The first 31 bytes of a tree key.
pub type Stem = [u8; STEM_LEN];

/// Errors raised when untyped input is brought into the engine.
///
/// Derivation itself never fails: every well-typed input has exactly one key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("address must be at most 32 bytes, got {len}")]
    InvalidAddressLength { len: usize },

    #[error("bytes do not encode a banderwagon element")]
    InvalidPoint,

    #[error("invalid deriver config: {message}")]
    InvalidConfig { message: &'static str },
}

/// An account address as it enters the key derivation: 32 bytes, with shorter
/// addresses left-padded with zeros.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Deref)]
pub struct Address32(pub B256);

impl Address32 {
    /// The padded address bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0 .0
    }
}

impl From<Address> for Address32 {
    fn from(address: Address) -> Self {
        Self(address.into_word())
    }
}

impl From<B256> for Address32 {
    fn from(word: B256) -> Self {
        Self(word)
    }
}

impl From<[u8; 32]> for Address32 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(B256::new(bytes))
    }
}

impl TryFrom<&[u8]> for Address32 {
    type Error = KeyError;

    /// Left-pads slices of up to 32 bytes.
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() > 32 {
            return Err(KeyError::InvalidAddressLength { len: bytes.len() });
        }
        let mut padded = [0u8; 32];
        padded[32 - bytes.len()..].copy_from_slice(bytes);
        Ok(Self::from(padded))
    }
}

/// The 32-byte key of a leaf: a 31-byte stem followed by a sub-index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Deref)]
pub struct TreeKey(pub [u8; 32]);

impl TreeKey {
    /// Joins a stem and a sub-index.
    pub fn new(stem: &Stem, sub_index: u8) -> Self {
        let mut key = [0u8; 32];
        key[..STEM_LEN].copy_from_slice(stem);
        key[STEM_LEN] = sub_index;
        Self(key)
    }

    /// The first 31 bytes, shared by every leaf of the page.
    pub fn stem(&self) -> Stem {
        let mut stem = [0u8; STEM_LEN];
        stem.copy_from_slice(&self.0[..STEM_LEN]);
        stem
    }

    /// The last byte, selecting the leaf within the page.
    pub fn sub_index(&self) -> u8 {
        self.0[STEM_LEN]
    }
}

impl fmt::Display for TreeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl From<TreeKey> for B256 {
    fn from(key: TreeKey) -> Self {
        B256::new(key.0)
    }
}

/// The commitment of an account's encoded address, reusable for every key
/// of that account.
///
/// Produced by [`TreeKeyDeriver::evaluate_address_point`](crate::TreeKeyDeriver::evaluate_address_point)
/// (address terms only) or
/// [`TreeKeyDeriver::evaluate_tree_point`](crate::TreeKeyDeriver::evaluate_tree_point)
/// (address and tree index terms). The two agree for tree index 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EvaluatedAddressPoint(pub(crate) Element);

impl EvaluatedAddressPoint {
    /// The underlying group element.
    pub fn as_element(&self) -> &Element {
        &self.0
    }

    /// Canonical 32-byte encoding of the point.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }

    /// Decodes a point previously encoded with [`EvaluatedAddressPoint::to_bytes`].
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, KeyError> {
        Element::from_bytes(bytes)
            .map(Self)
            .ok_or(KeyError::InvalidPoint)
    }
}

impl From<Element> for EvaluatedAddressPoint {
    fn from(element: Element) -> Self {
        Self(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn short_addresses_are_left_padded() {
        let address = Address32::try_from(&[0xaau8, 0xbb][..]).unwrap();
        let mut expected = [0u8; 32];
        expected[30] = 0xaa;
        expected[31] = 0xbb;
        assert_eq!(address.as_bytes(), &expected);

        assert_eq!(Address32::try_from(&[0u8; 0][..]).unwrap(), Address32::default());
    }

    #[test]
    fn oversized_address_is_rejected() {
        assert_eq!(
            Address32::try_from(&[0u8; 33][..]),
            Err(KeyError::InvalidAddressLength { len: 33 })
        );
    }

    #[test]
    fn twenty_byte_address_matches_padded_slice() {
        let address = address!("00000000000000000000000000000000000000ff");
        let from_slice = Address32::try_from(address.as_slice()).unwrap();
        assert_eq!(Address32::from(address), from_slice);
    }

    #[test]
    fn tree_key_parts() {
        let stem = [0x11u8; STEM_LEN];
        let key = TreeKey::new(&stem, 0x42);
        assert_eq!(key.stem(), stem);
        assert_eq!(key.sub_index(), 0x42);
        assert_eq!(key.to_string(), format!("{}42", "11".repeat(STEM_LEN)));
        assert_eq!(B256::from(key).as_slice(), &key[..]);
    }

    #[test]
    fn evaluated_point_bytes_roundtrip() {
        let point = EvaluatedAddressPoint::from(Element::prime_subgroup_generator());
        assert_eq!(
            EvaluatedAddressPoint::from_bytes(point.to_bytes()),
            Ok(point)
        );
        assert_eq!(
            EvaluatedAddressPoint::from_bytes([0xff; 32]),
            Err(KeyError::InvalidPoint)
        );
    }
}
