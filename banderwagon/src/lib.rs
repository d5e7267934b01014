//! The banderwagon group: the prime-order quotient of the Bandersnatch curve
//! obtained by identifying `(x, y)` with `(-x, -y)`.
//!
//! Curve arithmetic is delegated to arkworks. This crate adds the canonical
//! 32-byte encoding (single and batched), subgroup-checked decoding, and a [`Committer`](committer::Committer) that accelerates commitments over
//! a fixed basis with precomputed tables.

pub mod committer;
mod element;
mod trait_impls;

pub use element::{multi_scalar_mul, Element, Fr};

pub use ark_ff::{BigInteger, Field, One, PrimeField, UniformRand, Zero};
pub use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, SerializationError};

use ark_ed_on_bls12_381_bandersnatch::Fq;

/// Interprets `bytes` as a big-endian integer, reduces it into the base field
/// and tries to decode the result as the x-coordinate of a banderwagon element.
///
/// Returns `None` when no valid element has that x-coordinate. Used to derive
/// nothing-up-my-sleeve generators from hash outputs.
pub fn try_reduce_to_element(bytes: &[u8]) -> Option<Element> {
    // `Element::from_bytes` expects a canonical encoding, so reduce first
    let x_coord = Fq::from_be_bytes_mod_order(bytes);

    let mut bytes = [0u8; 32];
    x_coord.serialize_compressed(&mut bytes[..]).ok()?;
    // arkworks writes little endian; the banderwagon encoding is big endian
    bytes.reverse();

    Element::from_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduce_accepts_encoded_generator() {
        let generator = Element::prime_subgroup_generator();
        let got = try_reduce_to_element(&generator.to_bytes()).expect("generator is valid");
        assert_eq!(got, generator);
    }

    #[test]
    fn reduce_is_deterministic() {
        let candidate = [0x5au8; 32];
        assert_eq!(
            try_reduce_to_element(&candidate),
            try_reduce_to_element(&candidate)
        );
    }
}
