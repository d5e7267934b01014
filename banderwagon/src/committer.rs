//! Fixed-basis commitments with precomputed window tables.
//!
//! For every generator `G` the [`Committer`] stores, per window `j`, the
//! multiples `k * 2^(w*j) * G` for `k` in `0..=2^(w-1)`. Scalars are recoded
//! into signed digits in `(-2^(w-1), 2^(w-1)]`, so a scalar multiplication is
//! one table lookup and one mixed addition per window and no doublings.

use crate::element::Element;
use ark_ec::CurveGroup;
use ark_ed_on_bls12_381_bandersnatch::{EdwardsAffine, EdwardsProjective, Fr};
use ark_ff::{PrimeField, Zero};
use rayon::prelude::*;
use std::time::Instant;
use tracing::debug;

/// Bit width of the scalar representation walked by the recoding.
const SCALAR_BITS: usize = 256;

/// Smallest accepted window size.
pub const MIN_WINDOW_SIZE: usize = 2;
/// Largest accepted window size. Tables grow as `2^(w-1)` per window.
pub const MAX_WINDOW_SIZE: usize = 16;

/// Multi-scalar multiplication over a fixed list of generators.
#[derive(Clone, Debug)]
pub struct Committer {
    /// Window size `w` of the signed-digit recoding.
    window_size: usize,
    /// Number of windows per table, including one for the final carry.
    num_windows: usize,
    /// One table per generator, `num_windows * (2^(w-1) + 1)` entries each.
    tables: Vec<Vec<EdwardsAffine>>,
}

impl Committer {
    /// Precomputes the window tables for `bases`.
    ///
    /// # Panics
    ///
    /// Panics if `window_size` is outside
    /// [`MIN_WINDOW_SIZE`]`..=`[`MAX_WINDOW_SIZE`].
    pub fn new(bases: &[Element], window_size: usize) -> Committer {
        assert!(
            (MIN_WINDOW_SIZE..=MAX_WINDOW_SIZE).contains(&window_size),
            "window size {window_size} out of range"
        );
        let start = Instant::now();

        let half_win = 1usize << (window_size - 1);
        let num_windows = SCALAR_BITS.div_ceil(window_size) + 1;

        let tables: Vec<Vec<EdwardsAffine>> = bases
            .par_iter()
            .map(|base| {
                let mut table = Vec::with_capacity(num_windows * (half_win + 1));
                let mut window_base = base.0;
                for _ in 0..num_windows {
                    let mut multiple = EdwardsProjective::zero();
                    table.push(multiple);
                    for _ in 0..half_win {
                        multiple += window_base;
                        table.push(multiple);
                    }
                    // half_win * base doubled is the next window's base
                    window_base = multiple + multiple;
                }
                EdwardsProjective::normalize_batch(&table)
            })
            .collect();

        debug!(
            generators = bases.len(),
            window_size,
            elapsed = ?start.elapsed(),
            "built precomputed commitment tables"
        );

        Committer {
            window_size,
            num_windows,
            tables,
        }
    }

    /// Number of generators this committer was built for.
    pub fn num_generators(&self) -> usize {
        self.tables.len()
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Returns `scalar * G[g_i]`.
    ///
    /// # Panics
    ///
    /// Panics if `g_i` is not below [`Committer::num_generators`].
    pub fn mul_index(&self, scalar: &Fr, g_i: usize) -> Element {
        let limbs = scalar.into_bigint().0;
        let table = &self.tables[g_i];
        let half_win = 1u64 << (self.window_size - 1);
        let full_win = 1u64 << self.window_size;
        let stride = (half_win + 1) as usize;

        let mut result = EdwardsProjective::zero();
        let mut carry = 0u64;
        for window in 0..self.num_windows {
            let digit = window_digit(&limbs, window * self.window_size, self.window_size) + carry;
            let offset = window * stride;
            if digit > half_win {
                // digit - 2^w is negative; borrow it back from the next window
                let neg = (full_win - digit) as usize;
                if neg != 0 {
                    result += -table[offset + neg];
                }
                carry = 1;
            } else {
                if digit != 0 {
                    result += table[offset + digit as usize];
                }
                carry = 0;
            }
        }
        debug_assert_eq!(carry, 0, "final window must absorb the carry");

        Element(result)
    }

    /// Commits to `scalars`, pairing `scalars[i]` with generator `i`. Zero
    /// scalars are skipped.
    ///
    /// # Panics
    ///
    /// Panics if there are more scalars than generators.
    pub fn commit(&self, scalars: &[Fr]) -> Element {
        assert!(
            scalars.len() <= self.tables.len(),
            "{} scalars for {} generators",
            scalars.len(),
            self.tables.len()
        );
        scalars
            .iter()
            .enumerate()
            .filter(|(_, scalar)| !scalar.is_zero())
            .map(|(i, scalar)| self.mul_index(scalar, i))
            .sum()
    }

    /// Commits to the sparse vector given as `(generator index, scalar)` pairs.
    pub fn commit_sparse(&self, terms: &[(usize, Fr)]) -> Element {
        terms
            .iter()
            .filter(|(_, scalar)| !scalar.is_zero())
            .map(|(i, scalar)| self.mul_index(scalar, *i))
            .sum()
    }
}

/// Extracts `width` bits of the little-endian limbs starting at bit `start`.
/// Bits past the end read as zero.
#[inline]
fn window_digit(limbs: &[u64; 4], start: usize, width: usize) -> u64 {
    let limb = start / 64;
    let shift = start % 64;
    if limb >= limbs.len() {
        return 0;
    }

    let mut digit = limbs[limb] >> shift;
    if shift + width > 64 && limb + 1 < limbs.len() {
        digit |= limbs[limb + 1] << (64 - shift);
    }
    digit & ((1 << width) - 1)
}
