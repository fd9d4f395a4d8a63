//! Deterministic maps from byte strings into the curve group and the scalar field, plus the
//! symmetric key derivation used by the hybrid layer.
//!
//! Identities are mapped to points with try-and-increment: hash the input (with a counter
//! suffix) to an x candidate, keep it when `x^3 + x` is a quadratic residue, and clear the
//! cofactor to land in the order-`q` subgroup. Each attempt succeeds with probability about
//! one half, so the expected number of attempts is a small constant; the loop is still capped,
//! and exhausting the cap signals a misconfigured curve rather than a transient condition.
//!
//! All hashing is SHA3: SHAKE256 as the extendable-output function behind both maps (the
//! output is widened 128 bits past the modulus before reduction to keep the bias negligible),
//! and SHA3-256 for the key derivation.

use num_bigint::BigUint;
use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::{Digest, Sha3_256, Shake256};

use crate::curve::{Curve, CurvePoint};
use crate::error::{Error, Result};
use crate::pairing::Gt;

/// Domain separation tag for the key derivation function.
const KDF_DOMAIN: &[u8] = b"bfibe-v1-kem-key";

/// Widened SHAKE256 output reduced by the given modulus.
fn xof_reduce(modulus: &BigUint, domain: &[u8], data: &[u8], counter: Option<u8>) -> BigUint {
    let mut shake = Shake256::default();
    shake.update(domain);
    shake.update(data);
    if let Some(counter) = counter {
        shake.update(&[counter]);
    }
    let width = ((modulus.bits() + 7) / 8) as usize + 16;
    let mut wide = vec![0u8; width];
    shake.finalize_xof().read(&mut wide);
    BigUint::from_bytes_be(&wide) % modulus
}

/// Map an identity deterministically to a point of order `q`.
///
/// The same `(domain, identity)` pair always yields the same point. Fails with
/// [`Error::HashToPointExhausted`] if no attempt within the budget produces a usable point,
/// which does not happen on a well-formed curve.
pub fn hash_to_point(curve: &Curve, domain: &[u8], identity: &[u8]) -> Result<CurvePoint> {
    let fp = curve.field();
    for counter in 0..=u8::MAX {
        let x = xof_reduce(fp.modulus(), domain, identity, Some(counter));
        let rhs = fp.add(&fp.mul(&fp.mul(&x, &x), &x), &x);
        if !fp.is_square(&rhs) {
            continue;
        }
        let y = fp.sqrt(&rhs).expect("rhs is a nonzero residue");
        let point = curve.clear_cofactor(&CurvePoint::Affine { x, y });
        if !point.is_infinity() {
            return Ok(point);
        }
    }
    Err(Error::HashToPointExhausted)
}

/// Map arbitrary bytes deterministically to a scalar in `[0, order)`.
pub fn hash_to_scalar(order: &BigUint, domain: &[u8], data: &[u8]) -> BigUint {
    xof_reduce(order, domain, data, None)
}

/// Derive the 32-byte symmetric key for the payload cipher from a pairing result.
pub fn derive_key(element: &Gt, curve: &Curve) -> [u8; 32] {
    let mut input = Vec::from(KDF_DOMAIN);
    input.extend_from_slice(&element.to_bytes(curve));
    Sha3_256::digest(&input).into()
}
