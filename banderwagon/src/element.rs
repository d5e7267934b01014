use ark_ec::{twisted_edwards::TECurveConfig, CurveGroup, PrimeGroup, ScalarMul, VariableBaseMSM};
use ark_ed_on_bls12_381_bandersnatch::{BandersnatchConfig, EdwardsAffine, EdwardsProjective, Fq};
use ark_ff::{Field, One, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

pub use ark_ed_on_bls12_381_bandersnatch::Fr;

/// An element of the banderwagon group.
///
/// Internally a Bandersnatch point in extended projective coordinates. Two
/// points that differ by the two-torsion point, `(x, y)` and `(-x, -y)`, are
/// the same group element: equality, hashing and serialization all respect
/// that identification.
#[derive(Debug, Clone, Copy, Eq)]
pub struct Element(pub(crate) EdwardsProjective);

impl PartialEq for Element {
    /// Compares `x1 / y1` with `x2 / y2` without dividing.
    ///
    /// Both operands must be valid banderwagon elements; in particular `y`
    /// must be non-zero, which excludes the points at infinity.
    fn eq(&self, other: &Self) -> bool {
        (self.0.x * other.0.y) == (other.0.x * self.0.y)
    }
}

impl Element {
    /// Canonical 32-byte big-endian encoding: `sign(y) * x`.
    ///
    /// `(x, y)` and `(-x, -y)` encode identically since
    /// `sign(-y) * (-x) == sign(y) * x`.
    pub fn to_bytes(&self) -> [u8; 32] {
        affine_to_bytes(&EdwardsAffine::from(self.0))
    }

    /// [`Element::to_bytes`] over a slice, sharing one field inversion across
    /// all elements.
    pub fn batch_to_bytes(elements: &[Element]) -> Vec<[u8; 32]> {
        let projective: Vec<_> = elements.iter().map(|element| element.0).collect();
        EdwardsProjective::normalize_batch(&projective)
            .iter()
            .map(affine_to_bytes)
            .collect()
    }

    /// Decodes the canonical encoding produced by [`Element::to_bytes`].
    ///
    /// Returns `None` if the bytes are not a reduced field element, if no
    /// curve point has that x-coordinate, or if the point fails the subgroup
    /// check. This is the only decoding path safe for untrusted input.
    pub fn from_bytes(mut bytes: [u8; 32]) -> Option<Element> {
        bytes.reverse();
        let x = Fq::deserialize_compressed(&bytes[..]).ok()?;
        let point = Self::get_point_from_x(x, true)?;

        if !subgroup_check(&point) {
            return None;
        }

        Some(Element(point))
    }

    pub fn prime_subgroup_generator() -> Element {
        Element(EdwardsProjective::generator())
    }

    /// Solves `a*x^2 + y^2 = 1 + d*x^2*y^2` for `y`, picking the
    /// lexicographically largest root when `choose_largest` is set.
    ///
    /// No subgroup check is performed here.
    fn get_point_from_x(x: Fq, choose_largest: bool) -> Option<EdwardsProjective> {
        let x_sq = x.square();
        let y_squared = (BandersnatchConfig::COEFF_A * x_sq - Fq::one())
            / (BandersnatchConfig::COEFF_D * x_sq - Fq::one());

        let y = y_squared.sqrt()?;
        let y = if is_positive(y) == choose_largest {
            y
        } else {
            -y
        };

        Some(EdwardsAffine::new_unchecked(x, y).into())
    }

    pub fn zero() -> Element {
        Element(EdwardsProjective::zero())
    }

    pub fn is_zero(&self) -> bool {
        *self == Element::zero()
    }
}

fn affine_to_bytes(affine: &EdwardsAffine) -> [u8; 32] {
    let x = if is_positive(affine.y) {
        affine.x
    } else {
        -affine.x
    };
    let mut bytes = [0u8; 32];
    x.serialize_compressed(&mut bytes[..])
        .expect("a base field element always fits in 32 bytes");

    // arkworks is little endian
    bytes.reverse();
    bytes
}

// The lexicographically largest of `c` and `-c` is the positive one
fn is_positive(coordinate: Fq) -> bool {
    coordinate > -coordinate
}

/// Subgroup membership for a point already known to be on the curve:
/// `1 - a*x^2` must be a quadratic residue.
fn subgroup_check(point: &EdwardsProjective) -> bool {
    (Fq::one() - BandersnatchConfig::COEFF_A * point.x.square())
        .legendre()
        .is_qr()
}

/// Variable-base multi-scalar multiplication `sum(scalars[i] * bases[i])`.
///
/// # Panics
///
/// Panics if `bases` and `scalars` differ in length.
pub fn multi_scalar_mul(bases: &[Element], scalars: &[Fr]) -> Element {
    let projective: Vec<_> = bases.iter().map(|element| element.0).collect();
    let affine = EdwardsProjective::batch_convert_to_mul_base(&projective);

    let result = EdwardsProjective::msm(&affine, scalars)
        .expect("number of bases should equal number of scalars");

    Element(result)
}
