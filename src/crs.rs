//! The public generator basis of the verkle commitment scheme.
//!
//! Generators are derived deterministically from a seed: the seed and a
//! big-endian counter are hashed with SHA-256, the digest is reduced into the
//! base field and kept if it is the x-coordinate of a banderwagon element.
//! The first `n` hits form the basis, so a shorter basis is always a prefix of
//! a longer one generated from the same seed. Tree keys only need the first
//! [`TREE_KEY_POLY_LEN`] generators of the verkle basis.

use crate::constant::{CRS_SEED, TREE_KEY_POLY_LEN};
use banderwagon::{multi_scalar_mul, try_reduce_to_element, Element, Fr};
use once_cell::sync::Lazy;
use sha2::{Digest, Sha256};
use std::collections::HashSet;

/// Basis for tree key commitments, shared by the whole process.
pub static TREE_KEY_CRS: Lazy<Crs> = Lazy::new(|| Crs::new(TREE_KEY_POLY_LEN, CRS_SEED));

/// A fixed list of value-binding generators.
#[derive(Debug, Clone)]
pub struct Crs {
    generators: Vec<Element>,
}

impl Crs {
    /// Derives `n` generators from `seed`.
    ///
    /// # Panics
    ///
    /// Panics if two generators coincide, which would break binding.
    pub fn new(n: usize, seed: &[u8]) -> Crs {
        let generators = generate_random_elements(n, seed);
        Crs::assert_dedup(&generators);
        Crs { generators }
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    pub fn generators(&self) -> &[Element] {
        &self.generators
    }

    /// Reference commitment with a variable-base MSM. Scalars beyond the
    /// supplied slice are treated as zero.
    pub fn commit(&self, scalars: &[Fr]) -> Element {
        multi_scalar_mul(&self.generators[..scalars.len()], scalars)
    }

    fn assert_dedup(points: &[Element]) {
        let mut seen = HashSet::new();
        for point in points {
            assert!(seen.insert(point.to_bytes()), "crs has duplicated points");
        }
    }
}

impl std::ops::Index<usize> for Crs {
    type Output = Element;

    fn index(&self, index: usize) -> &Self::Output {
        &self.generators[index]
    }
}

fn generate_random_elements(num_required_points: usize, seed: &[u8]) -> Vec<Element> {
    let hash_to_x = |index: u64| -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(seed);
        hasher.update(index.to_be_bytes());
        hasher.finalize().into()
    };

    (0u64..)
        .map(hash_to_x)
        .filter_map(|hash_bytes| try_reduce_to_element(&hash_bytes))
        .take(num_required_points)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crs_consistency() {
        let points = generate_random_elements(256, b"MAKE_ETHEREUM_GREAT_AGAIN");

        assert_eq!(
            hex::encode(points[0].to_bytes()),
            "2816c0c3ac2555ec31fd5790f97bec3ec9b87d25136507bae595567416e76b80",
            "the first point is incorrect"
        );
        assert_eq!(
            hex::encode(points[255].to_bytes()),
            "046e3ca0b403c4bb91b27583d57d305945cae298ce18386cd0c0a0d5d76871ab",
            "the 256th (last) point is incorrect"
        );

        let mut hasher = Sha256::new();
        for point in &points {
            hasher.update(point.to_bytes());
        }
        assert_eq!(
            hex::encode(hasher.finalize()),
            "e0d59418bbe04c1f4ec7493a9ed30497982d4ab5480d68b5e8ce426dd756d136",
            "unexpected point encountered"
        );
    }

    #[test]
    fn shorter_basis_is_prefix() {
        let long = Crs::new(16, CRS_SEED);
        assert_eq!(TREE_KEY_CRS.len(), TREE_KEY_POLY_LEN);
        assert_eq!(TREE_KEY_CRS.generators(), &long.generators()[..TREE_KEY_POLY_LEN]);
    }

    #[test]
    fn commit_pairs_scalars_with_generators() {
        let scalars = [Fr::from(3u64), Fr::from(5u64)];
        let expected = TREE_KEY_CRS[0] * scalars[0] + TREE_KEY_CRS[1] * scalars[1];
        assert_eq!(TREE_KEY_CRS.commit(&scalars), expected);
    }
}
