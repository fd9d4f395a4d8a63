//! The bilinear pairing `ê: G1 × G1 → Gt`.
//!
//! This is the reduced Tate pairing of order `q` on the supersingular curve, composed with the
//! distortion map `φ(x, y) = (−x, i·y)`: the second argument is pushed into E(F_p^2) before
//! the Miller loop, which makes the pairing symmetric and non-degenerate on the order-`q`
//! subgroup, `ê(P, P) ≠ 1` for a generator `P`.
//!
//! The Miller loop runs over the bits of `q` and evaluates the tangent and chord lines at the
//! distorted point. Vertical lines are skipped entirely: their values lie in F_p*, and the
//! final exponentiation `(p^2 − 1)/q = (p − 1)·h` annihilates every F_p* factor. The final
//! exponentiation itself uses the Frobenius identity `f^p = conj(f)` in F_p^2, so
//! `f^((p^2−1)/q) = (conj(f)·f^{-1})^h`.
//!
//! Inputs are expected to be points of the order-`q` subgroup; callers validate foreign points
//! before pairing them. Passing the point at infinity yields the identity of Gt.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::curve::{Curve, CurvePoint};
use crate::field::Fp2;

/// An element of the target group, the order-`q` subgroup of F_p^2*.
///
/// Values of this type only come out of [`pairing`] and [`Gt::pow`]; there is no public
/// constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gt(Fp2);

impl Gt {
    /// The multiplicative identity of the target group.
    pub fn identity() -> Self {
        Gt(Fp2::one())
    }

    pub fn is_identity(&self) -> bool {
        self.0.is_one()
    }

    /// Exponentiation in the target group.
    pub fn pow(&self, exponent: &BigUint, curve: &Curve) -> Gt {
        Gt(self.0.pow(exponent, curve.field()))
    }

    /// Fixed-width byte encoding, used for key derivation.
    pub fn to_bytes(&self, curve: &Curve) -> Vec<u8> {
        self.0.to_bytes(curve.field())
    }
}

/// Evaluate the line through `t` and `u` at the distorted point `φ(q) = (−x_q, i·y_q)`.
///
/// The tangent is used when `t == u`. Vertical lines (and degenerate inputs) evaluate to one,
/// which leaves the pairing value untouched modulo the final exponentiation.
fn line_at_distorted(curve: &Curve, t: &CurvePoint, u: &CurvePoint, q: &CurvePoint) -> Fp2 {
    let fp = curve.field();
    let (CurvePoint::Affine { x: x1, y: y1 }, CurvePoint::Affine { x: xq, y: yq }) = (t, q)
    else {
        return Fp2::one();
    };
    let CurvePoint::Affine { x: x2, y: y2 } = u else {
        return Fp2::one();
    };
    let x_distorted = fp.neg(xq);
    let slope = if x1 == x2 {
        if fp.add(y1, y2).is_zero() {
            // vertical line, value in F_p*, killed by the final exponentiation
            return Fp2::one();
        }
        let numerator = fp.add(
            &fp.mul(&BigUint::from(3u32), &fp.mul(x1, x1)),
            &BigUint::from(1u32),
        );
        fp.mul(
            &numerator,
            &fp.inverse(&fp.add(y1, y1))
                .expect("2y is nonzero off the vertical case"),
        )
    } else {
        fp.mul(
            &fp.sub(y2, y1),
            &fp.inverse(&fp.sub(x2, x1))
                .expect("x2 - x1 is nonzero off the vertical case"),
        )
    };
    // l(x, y) = y - y1 - slope·(x - x1) at (x_distorted, i·y_q)
    let real = fp.sub(&fp.neg(y1), &fp.mul(&slope, &fp.sub(&x_distorted, x1)));
    Fp2::new(real, yq.clone())
}

/// Raise the Miller value into the order-`q` subgroup of F_p^2*.
fn final_exponentiation(curve: &Curve, f: &Fp2) -> Gt {
    let fp = curve.field();
    let Ok(inverse) = f.inverse(fp) else {
        // only reachable with out-of-subgroup inputs
        return Gt::identity();
    };
    let unitary = f.conjugate(fp).mul(&inverse, fp);
    Gt(unitary.pow(curve.cofactor(), fp))
}

/// Compute the pairing `ê(p, q)`.
///
/// Bilinear in both arguments, `ê(aP, bQ) = ê(P, Q)^(ab)`, and symmetric. Either argument
/// being the point at infinity yields [`Gt::identity`].
pub fn pairing(curve: &Curve, p: &CurvePoint, q: &CurvePoint) -> Gt {
    if p.is_infinity() || q.is_infinity() {
        return Gt::identity();
    }
    let fp = curve.field();
    let order = curve.order();
    let mut f = Fp2::one();
    let mut t = p.clone();
    for i in (0..order.bits() - 1).rev() {
        f = f.square(fp).mul(&line_at_distorted(curve, &t, &t, q), fp);
        t = curve.double(&t);
        if order.bit(i) {
            f = f.mul(&line_at_distorted(curve, &t, p, q), fp);
            t = curve.add(&t, p);
        }
    }
    final_exponentiation(curve, &f)
}
