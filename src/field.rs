//! Arithmetic in the prime field F_p and its quadratic extension F_p^2.
//!
//! All values are [`BigUint`]s kept in canonical form, that is in the range `[0, p)`. The
//! [`PrimeField`] context owns the modulus and every operation on it returns a canonical result.
//! Callers bringing in foreign values (deserialized bytes, hash outputs) must pass them through
//! [`PrimeField::reduce`] first; the arithmetic methods assume canonical inputs.
//!
//! The extension field is F_p[i]/(i^2 + 1), which is a field exactly because the moduli used in
//! this crate satisfy `p ≡ 3 (mod 4)` (−1 is a non-residue). Elements are represented as
//! `c0 + c1·i` with both coefficients canonical.
//!
//! Inversion uses the extended Euclidean algorithm rather than Fermat's little theorem: the
//! results are identical for a prime modulus, but the Euclidean route needs far fewer big-integer
//! multiplications than a full `a^(p-2)` exponentiation. Exponentiation itself is
//! [`BigUint::modpow`], which is square-and-multiply.

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::error::{Error, Result};

/// Context for arithmetic modulo a fixed prime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimeField {
    modulus: BigUint,
}

impl PrimeField {
    /// Create a field context for the given prime modulus.
    ///
    /// The modulus is trusted to be prime; it comes from the fixed curve profiles in
    /// [`curve`][crate::curve].
    pub fn new(modulus: BigUint) -> Self {
        Self { modulus }
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// Width in bytes of a serialized field element.
    pub fn element_len(&self) -> usize {
        ((self.modulus.bits() + 7) / 8) as usize
    }

    /// Bring an arbitrary non-negative integer into canonical range.
    pub fn reduce(&self, value: &BigUint) -> BigUint {
        value % &self.modulus
    }

    pub fn add(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a + b) % &self.modulus
    }

    pub fn sub(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a + (&self.modulus - b)) % &self.modulus
    }

    pub fn neg(&self, a: &BigUint) -> BigUint {
        if a.is_zero() {
            BigUint::zero()
        } else {
            &self.modulus - a
        }
    }

    pub fn mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a * b) % &self.modulus
    }

    /// Multiplicative inverse via the extended Euclidean algorithm.
    pub fn inverse(&self, a: &BigUint) -> Result<BigUint> {
        if a.is_zero() {
            return Err(Error::DivisionByZero);
        }
        let gcd = BigInt::from(a.clone()).extended_gcd(&BigInt::from(self.modulus.clone()));
        let inverse = gcd.x.mod_floor(&BigInt::from(self.modulus.clone()));
        Ok(inverse
            .to_biguint()
            .expect("mod_floor by a positive modulus is non-negative"))
    }

    pub fn pow(&self, a: &BigUint, exponent: &BigUint) -> BigUint {
        a.modpow(exponent, &self.modulus)
    }

    /// Whether `a` is a nonzero quadratic residue (Euler's criterion).
    pub fn is_square(&self, a: &BigUint) -> bool {
        let exponent = (&self.modulus - 1u32) >> 1;
        self.pow(a, &exponent).is_one()
    }

    /// Square root of a residue, using the `p ≡ 3 (mod 4)` shortcut `a^((p+1)/4)`.
    ///
    /// Returns `None` when `a` has no square root.
    pub fn sqrt(&self, a: &BigUint) -> Option<BigUint> {
        let exponent = (&self.modulus + 1u32) >> 2;
        let root = self.pow(a, &exponent);
        if self.mul(&root, &root) == *a {
            Some(root)
        } else {
            None
        }
    }

    /// Fixed-width big-endian encoding of a canonical element.
    pub fn to_bytes(&self, a: &BigUint) -> Vec<u8> {
        let mut bytes = vec![0u8; self.element_len()];
        let raw = a.to_bytes_be();
        bytes[self.element_len() - raw.len()..].copy_from_slice(&raw);
        bytes
    }
}

/// An element of F_p^2 = F_p[i]/(i^2 + 1), stored as `c0 + c1·i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fp2 {
    pub c0: BigUint,
    pub c1: BigUint,
}

impl Fp2 {
    pub fn new(c0: BigUint, c1: BigUint) -> Self {
        Self { c0, c1 }
    }

    pub fn zero() -> Self {
        Self::new(BigUint::zero(), BigUint::zero())
    }

    pub fn one() -> Self {
        Self::new(BigUint::one(), BigUint::zero())
    }

    pub fn is_one(&self) -> bool {
        self.c0.is_one() && self.c1.is_zero()
    }

    pub fn add(&self, other: &Fp2, fp: &PrimeField) -> Fp2 {
        Fp2::new(fp.add(&self.c0, &other.c0), fp.add(&self.c1, &other.c1))
    }

    /// Schoolbook multiplication with i^2 = −1.
    pub fn mul(&self, other: &Fp2, fp: &PrimeField) -> Fp2 {
        let ac = fp.mul(&self.c0, &other.c0);
        let bd = fp.mul(&self.c1, &other.c1);
        let ad = fp.mul(&self.c0, &other.c1);
        let bc = fp.mul(&self.c1, &other.c0);
        Fp2::new(fp.sub(&ac, &bd), fp.add(&ad, &bc))
    }

    pub fn square(&self, fp: &PrimeField) -> Fp2 {
        self.mul(self, fp)
    }

    /// Conjugation `c0 − c1·i`, which is also the Frobenius map `x ↦ x^p` in this extension.
    pub fn conjugate(&self, fp: &PrimeField) -> Fp2 {
        Fp2::new(self.c0.clone(), fp.neg(&self.c1))
    }

    /// Inverse via the norm: `(c0 + c1·i)^-1 = conj / (c0^2 + c1^2)`.
    pub fn inverse(&self, fp: &PrimeField) -> Result<Fp2> {
        let norm = fp.add(&fp.mul(&self.c0, &self.c0), &fp.mul(&self.c1, &self.c1));
        let norm_inverse = fp.inverse(&norm)?;
        Ok(Fp2::new(
            fp.mul(&self.c0, &norm_inverse),
            fp.mul(&fp.neg(&self.c1), &norm_inverse),
        ))
    }

    /// Square-and-multiply exponentiation over the bits of `exponent`.
    pub fn pow(&self, exponent: &BigUint, fp: &PrimeField) -> Fp2 {
        let mut result = Fp2::one();
        if exponent.is_zero() {
            return result;
        }
        for i in (0..exponent.bits()).rev() {
            result = result.square(fp);
            if exponent.bit(i) {
                result = result.mul(self, fp);
            }
        }
        result
    }

    /// Fixed-width big-endian encoding `c0 ‖ c1`.
    pub fn to_bytes(&self, fp: &PrimeField) -> Vec<u8> {
        let mut bytes = fp.to_bytes(&self.c0);
        bytes.extend_from_slice(&fp.to_bytes(&self.c1));
        bytes
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn field() -> PrimeField {
        // 23 ≡ 3 (mod 4), small enough to check by hand
        PrimeField::new(BigUint::from(23u32))
    }

    #[test]
    fn arithmetic_stays_canonical() {
        let fp = field();
        let a = BigUint::from(20u32);
        let b = BigUint::from(19u32);
        assert_eq!(fp.add(&a, &b), BigUint::from(16u32));
        assert_eq!(fp.sub(&b, &a), BigUint::from(22u32));
        assert_eq!(fp.mul(&a, &b), BigUint::from(12u32));
        assert_eq!(fp.neg(&BigUint::zero()), BigUint::zero());
        assert_eq!(fp.add(&fp.neg(&a), &a), BigUint::zero());
        assert_eq!(fp.reduce(&BigUint::from(50u32)), BigUint::from(4u32));
    }

    #[test]
    fn inverse_round_trips() {
        let fp = field();
        for value in 1u32..23 {
            let a = BigUint::from(value);
            let inverse = fp.inverse(&a).unwrap();
            assert!(fp.mul(&a, &inverse).is_one());
        }
    }

    #[test]
    fn inverse_of_zero_fails() {
        let fp = field();
        assert!(matches!(
            fp.inverse(&BigUint::zero()),
            Err(Error::DivisionByZero)
        ));
    }

    #[test]
    fn pow_matches_repeated_multiplication() {
        let fp = field();
        let a = BigUint::from(5u32);
        let mut expected = BigUint::one();
        for exponent in 0u32..10 {
            assert_eq!(fp.pow(&a, &BigUint::from(exponent)), expected);
            expected = fp.mul(&expected, &a);
        }
    }

    #[test]
    fn sqrt_of_squares() {
        let fp = field();
        for value in 1u32..23 {
            let a = BigUint::from(value);
            let square = fp.mul(&a, &a);
            assert!(fp.is_square(&square));
            let root = fp.sqrt(&square).unwrap();
            assert_eq!(fp.mul(&root, &root), square);
        }
    }

    #[test]
    fn sqrt_rejects_non_residues() {
        let fp = field();
        // 5 is a non-residue mod 23
        let a = BigUint::from(5u32);
        assert!(!fp.is_square(&a));
        assert!(fp.sqrt(&a).is_none());
    }

    #[test]
    fn fp2_multiplication_and_inverse() {
        let fp = field();
        let a = Fp2::new(BigUint::from(3u32), BigUint::from(7u32));
        let b = Fp2::new(BigUint::from(11u32), BigUint::from(2u32));
        let product = a.mul(&b, &fp);
        let recovered = product.mul(&b.inverse(&fp).unwrap(), &fp);
        assert_eq!(recovered, a);
        assert!(a.mul(&a.inverse(&fp).unwrap(), &fp).is_one());
        // distributivity ties mul and add together
        let c = Fp2::new(BigUint::from(5u32), BigUint::from(6u32));
        assert_eq!(
            a.mul(&b.add(&c, &fp), &fp),
            a.mul(&b, &fp).add(&a.mul(&c, &fp), &fp)
        );
    }

    #[test]
    fn fp2_conjugate_norm_is_real() {
        let fp = field();
        let a = Fp2::new(BigUint::from(9u32), BigUint::from(14u32));
        let norm = a.mul(&a.conjugate(&fp), &fp);
        assert!(norm.c1.is_zero());
    }

    #[test]
    fn fp2_pow_adds_exponents() {
        let fp = field();
        let g = Fp2::new(BigUint::from(4u32), BigUint::from(1u32));
        let left = g.pow(&BigUint::from(13u32), &fp);
        let right = g
            .pow(&BigUint::from(6u32), &fp)
            .mul(&g.pow(&BigUint::from(7u32), &fp), &fp);
        assert_eq!(left, right);
        assert!(g.pow(&BigUint::zero(), &fp).is_one());
    }
}
