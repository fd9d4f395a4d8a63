//! The supersingular curve `y^2 = x^3 + x` over F_p and its group law.
//!
//! With `p ≡ 3 (mod 4)` this curve is supersingular with embedding degree 2 and exactly
//! `p + 1` points over F_p. The crate works in the subgroup of prime order `q`, where
//! `p + 1 = h·q` for the cofactor `h`; arbitrary curve points are brought into the subgroup with
//! [`Curve::clear_cofactor`].
//!
//! Parameters are fixed, pre-vetted profiles rather than generated at runtime, mirroring how
//! pairing curves are deployed in practice. Both shipped profiles satisfy: `p` prime,
//! `p ≡ 3 (mod 4)`, `q` prime, and `h·q = p + 1`.
//!
//! Points use the uncompressed affine representation `(x, y)` plus a distinguished point at
//! infinity, and are immutable values; the group operations live on [`Curve`] and return new
//! points. Any point received from the outside must be checked with [`Curve::is_on_curve`]
//! before use.

use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::field::PrimeField;

/// 512-bit modulus with a 160-bit Solinas subgroup order `q = 2^159 + 2^17 + 1`.
const BF512_MODULUS: &[u8] =
    b"8000000000000000000000000000000000020001000000000000000000000000000000000000000000000396000000000000000000000000000000000e58072b";
const BF512_ORDER: &[u8] = b"8000000000000000000000000000000000020001";
const BF512_COFACTOR: &[u8] =
    b"1000000000000000000000000000000000000000000000000000000000000000000000000000000000000072c";

/// 256-bit modulus with an 80-bit subgroup order `q = 2^79 + 2^27 + 1`, for fast tests.
const TOY256_MODULUS: &[u8] =
    b"8000000000000800000100000000000000000000009a000000000009a0000133";
const TOY256_ORDER: &[u8] = b"80000000000008000001";
const TOY256_COFACTOR: &[u8] = b"100000000000000000000000000000000000000000134";

/// A point on the curve, either affine or the point at infinity.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum CurvePoint {
    Infinity,
    Affine { x: BigUint, y: BigUint },
}

impl CurvePoint {
    pub fn is_infinity(&self) -> bool {
        matches!(self, CurvePoint::Infinity)
    }
}

/// Curve context: the base field together with the subgroup order and cofactor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Curve {
    fp: PrimeField,
    order: BigUint,
    cofactor: BigUint,
}

impl Curve {
    /// The default 512-bit profile.
    pub fn bf512() -> Self {
        Self::from_hex(BF512_MODULUS, BF512_ORDER, BF512_COFACTOR)
    }

    /// A small 256-bit profile. Fast, but far below any serious security margin; meant for
    /// tests and experiments.
    pub fn toy256() -> Self {
        Self::from_hex(TOY256_MODULUS, TOY256_ORDER, TOY256_COFACTOR)
    }

    fn from_hex(modulus: &[u8], order: &[u8], cofactor: &[u8]) -> Self {
        let parse = |digits| BigUint::parse_bytes(digits, 16).expect("profile constants are hex");
        Self {
            fp: PrimeField::new(parse(modulus)),
            order: parse(order),
            cofactor: parse(cofactor),
        }
    }

    /// Rebuild a curve from externally supplied parameters, e.g. a deserialized
    /// [`PublicKey`][crate::kem::PublicKey].
    ///
    /// This checks the structural relations between the parameters (`p ≡ 3 (mod 4)`,
    /// `h·q = p + 1`); it does not re-run primality tests.
    pub fn from_parameters(modulus: BigUint, order: BigUint, cofactor: BigUint) -> Result<Self> {
        if modulus.bits() < 3 || &modulus % 4u32 != BigUint::from(3u32) {
            return Err(Error::InvalidInput("field modulus must be 3 mod 4"));
        }
        if order.is_zero() || &cofactor * &order != &modulus + 1u32 {
            return Err(Error::InvalidInput("cofactor times order must be p + 1"));
        }
        Ok(Self {
            fp: PrimeField::new(modulus),
            order,
            cofactor,
        })
    }

    pub fn field(&self) -> &PrimeField {
        &self.fp
    }

    /// Order `q` of the working subgroup.
    pub fn order(&self) -> &BigUint {
        &self.order
    }

    pub fn cofactor(&self) -> &BigUint {
        &self.cofactor
    }

    /// Whether the point satisfies `y^2 = x^3 + x` with canonical coordinates. The point at
    /// infinity is on the curve.
    pub fn is_on_curve(&self, point: &CurvePoint) -> bool {
        match point {
            CurvePoint::Infinity => true,
            CurvePoint::Affine { x, y } => {
                if x >= self.fp.modulus() || y >= self.fp.modulus() {
                    return false;
                }
                let lhs = self.fp.mul(y, y);
                let rhs = self.fp.add(&self.fp.mul(&self.fp.mul(x, x), x), x);
                lhs == rhs
            }
        }
    }

    pub fn negate(&self, point: &CurvePoint) -> CurvePoint {
        match point {
            CurvePoint::Infinity => CurvePoint::Infinity,
            CurvePoint::Affine { x, y } => CurvePoint::Affine {
                x: x.clone(),
                y: self.fp.neg(y),
            },
        }
    }

    /// Chord-and-tangent addition. The point at infinity is the identity.
    pub fn add(&self, p: &CurvePoint, q: &CurvePoint) -> CurvePoint {
        let (x1, y1) = match p {
            CurvePoint::Infinity => return q.clone(),
            CurvePoint::Affine { x, y } => (x, y),
        };
        let (x2, y2) = match q {
            CurvePoint::Infinity => return p.clone(),
            CurvePoint::Affine { x, y } => (x, y),
        };
        let slope = if x1 == x2 {
            if self.fp.add(y1, y2).is_zero() {
                return CurvePoint::Infinity;
            }
            // tangent: (3x^2 + 1) / 2y, with 2y nonzero since y = -y was handled above
            let numerator = self
                .fp
                .add(&self.fp.mul(&BigUint::from(3u32), &self.fp.mul(x1, x1)), &BigUint::from(1u32));
            let denominator = self.fp.add(y1, y1);
            self.fp.mul(
                &numerator,
                &self
                    .fp
                    .inverse(&denominator)
                    .expect("2y is nonzero in the tangent branch"),
            )
        } else {
            self.fp.mul(
                &self.fp.sub(y2, y1),
                &self
                    .fp
                    .inverse(&self.fp.sub(x2, x1))
                    .expect("x2 - x1 is nonzero in the chord branch"),
            )
        };
        let x3 = self.fp.sub(&self.fp.sub(&self.fp.mul(&slope, &slope), x1), x2);
        let y3 = self.fp.sub(&self.fp.mul(&slope, &self.fp.sub(x1, &x3)), y1);
        CurvePoint::Affine { x: x3, y: y3 }
    }

    pub fn double(&self, point: &CurvePoint) -> CurvePoint {
        self.add(point, point)
    }

    /// Double-and-add scalar multiplication. A zero scalar yields the point at infinity.
    ///
    /// The scalar is used as given; callers working in the order-`q` subgroup keep their
    /// scalars in `[0, q)`, while cofactor clearing deliberately passes `h`.
    pub fn scalar_mul(&self, scalar: &BigUint, point: &CurvePoint) -> CurvePoint {
        let mut result = CurvePoint::Infinity;
        for i in (0..scalar.bits()).rev() {
            result = self.double(&result);
            if scalar.bit(i) {
                result = self.add(&result, point);
            }
        }
        result
    }

    /// Multiply by the cofactor, mapping an arbitrary curve point into the order-`q` subgroup.
    pub fn clear_cofactor(&self, point: &CurvePoint) -> CurvePoint {
        self.scalar_mul(&self.cofactor, point)
    }
}
