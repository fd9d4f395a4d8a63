//! The Boneh-Franklin scheme ("Identity-Based Encryption from the Weil Pairing",
//! [eprint](https://eprint.iacr.org/2001/090)), in its basic KEM form.
//!
//! * Setup: draw the master secret `s ∈ Z_q*`, publish `P` and `P_pub = s·P`.
//! * Extract: the private key for identity point `Q_ID` is `d_ID = s·Q_ID`.
//! * Encapsulate: draw `r ∈ Z_q*`, output `U = r·P` and the key `ê(Q_ID, P_pub)^r`.
//! * Decapsulate: recover the key as `ê(d_ID, U)`.
//!
//! The two sides agree because `ê(d_ID, U) = ê(s·Q_ID, r·P) = ê(Q_ID, P)^(sr) =
//! ê(Q_ID, s·P)^r`; this algebraic identity is what the round-trip tests below pin down.

use num_bigint::{BigUint, RandBigInt};
use num_traits::Zero;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Ibe, IbeKem};
use crate::curve::{Curve, CurvePoint};
use crate::error::{Error, Result};
use crate::hash::hash_to_point;
use crate::pairing::{pairing, Gt};

/// Domain separation tag under which the system generator is derived.
const GENERATOR_DOMAIN: &[u8] = b"bfibe-v1-generator";

/// Public key of a Boneh-Franklin instantiation: the generator and the master public point.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BfPublicKey {
    pub generator: CurvePoint,
    pub master_point: CurvePoint,
}

/// The Boneh-Franklin IBE over a fixed curve profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BonehFranklin {
    curve: Curve,
}

impl BonehFranklin {
    pub fn new(curve: Curve) -> Self {
        Self { curve }
    }

    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    /// The system generator, derived deterministically from the curve profile.
    pub fn generator(&self) -> Result<CurvePoint> {
        hash_to_point(&self.curve, GENERATOR_DOMAIN, b"")
    }

    /// A uniform scalar from `Z_q*`.
    fn random_scalar<R: Rng>(&self, mut rng: R) -> BigUint {
        loop {
            let scalar = rng.gen_biguint_below(self.curve.order());
            if !scalar.is_zero() {
                return scalar;
            }
        }
    }

    fn check_point(&self, point: &CurvePoint, what: &'static str) -> Result<()> {
        if point.is_infinity() || !self.curve.is_on_curve(point) {
            return Err(Error::InvalidInput(what));
        }
        Ok(())
    }
}

impl Ibe for BonehFranklin {
    type PrivateKey = CurvePoint;
    type MasterKey = BigUint;
    type PublicKey = BfPublicKey;
    type Identity = CurvePoint;

    fn setup<R: Rng>(&self, rng: R) -> Result<(Self::PublicKey, Self::MasterKey)> {
        let generator = self.generator()?;
        let master_key = self.random_scalar(rng);
        let master_point = self.curve.scalar_mul(&master_key, &generator);
        Ok((
            BfPublicKey {
                generator,
                master_point,
            },
            master_key,
        ))
    }

    fn extract(
        &self,
        _public_key: &Self::PublicKey,
        master_key: &Self::MasterKey,
        identity: &Self::Identity,
    ) -> Result<Self::PrivateKey> {
        self.check_point(identity, "identity point is not a valid group element")?;
        if master_key.is_zero() || master_key >= self.curve.order() {
            return Err(Error::InvalidInput("master key is not a scalar in Z_q*"));
        }
        Ok(self.curve.scalar_mul(master_key, identity))
    }
}

impl IbeKem for BonehFranklin {
    type Key = Gt;
    type EncapsulatedKey = CurvePoint;

    fn encapsulate<R: Rng>(
        &self,
        rng: R,
        public_key: &Self::PublicKey,
        identity: &Self::Identity,
    ) -> Result<(Self::Key, Self::EncapsulatedKey)> {
        self.check_point(identity, "identity point is not a valid group element")?;
        self.check_point(&public_key.generator, "generator is not a valid group element")?;
        self.check_point(
            &public_key.master_point,
            "master point is not a valid group element",
        )?;
        let r = self.random_scalar(rng);
        let ephemeral = self.curve.scalar_mul(&r, &public_key.generator);
        // key = ê(Q_ID, P_pub)^r, exponentiated in the target group
        let g_id = pairing(&self.curve, identity, &public_key.master_point);
        Ok((g_id.pow(&r, &self.curve), ephemeral))
    }

    fn decapsulate(
        &self,
        _public_key: &Self::PublicKey,
        key: &Self::PrivateKey,
        encapsulation: &Self::EncapsulatedKey,
    ) -> Result<Self::Key> {
        self.check_point(encapsulation, "encapsulation is not a valid group element")?;
        self.check_point(key, "private key is not a valid group element")?;
        Ok(pairing(&self.curve, key, encapsulation))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaChaRng;

    fn identity_point(bf: &BonehFranklin, name: &[u8]) -> CurvePoint {
        hash_to_point(bf.curve(), b"bfibe-test-identity", name).unwrap()
    }

    #[test]
    fn encapsulate_decapsulate() {
        let mut rng = rand::thread_rng();
        let bf = BonehFranklin::new(Curve::toy256());
        let (public_key, master_key) = bf.setup(&mut rng).unwrap();
        let identity = identity_point(&bf, b"alice@example.org");
        let secret_key = bf.extract(&public_key, &master_key, &identity).unwrap();
        let (generated_key, encapsulated_key) = bf
            .encapsulate(&mut rng, &public_key, &identity)
            .unwrap();
        let decapsulated_key = bf
            .decapsulate(&public_key, &secret_key, &encapsulated_key)
            .unwrap();
        assert_eq!(generated_key, decapsulated_key);
    }

    #[test]
    fn decapsulate_wrong_identity() {
        let mut rng = rand::thread_rng();
        let bf = BonehFranklin::new(Curve::toy256());
        let (public_key, master_key) = bf.setup(&mut rng).unwrap();
        let alice = identity_point(&bf, b"alice@example.org");
        let bob = identity_point(&bf, b"bob@example.org");
        let bob_key = bf.extract(&public_key, &master_key, &bob).unwrap();
        let (generated_key, encapsulated_key) =
            bf.encapsulate(&mut rng, &public_key, &alice).unwrap();
        let decapsulated_key = bf
            .decapsulate(&public_key, &bob_key, &encapsulated_key)
            .unwrap();
        assert_ne!(generated_key, decapsulated_key);
    }

    #[test]
    fn setup_is_deterministic_under_a_fixed_seed() {
        let bf = BonehFranklin::new(Curve::toy256());
        let (public_one, master_one) = bf.setup(ChaChaRng::from_seed([7; 32])).unwrap();
        let (public_two, master_two) = bf.setup(ChaChaRng::from_seed([7; 32])).unwrap();
        assert_eq!(public_one, public_two);
        assert_eq!(master_one, master_two);
        let (public_other, _) = bf.setup(ChaChaRng::from_seed([8; 32])).unwrap();
        assert_ne!(public_one.master_point, public_other.master_point);
    }

    #[test]
    fn produced_points_are_valid() {
        let mut rng = rand::thread_rng();
        let bf = BonehFranklin::new(Curve::toy256());
        let (public_key, master_key) = bf.setup(&mut rng).unwrap();
        assert!(bf.curve().is_on_curve(&public_key.generator));
        assert!(bf.curve().is_on_curve(&public_key.master_point));
        let identity = identity_point(&bf, b"alice@example.org");
        let secret_key = bf.extract(&public_key, &master_key, &identity).unwrap();
        assert!(bf.curve().is_on_curve(&secret_key));
        let (_, encapsulated_key) = bf.encapsulate(&mut rng, &public_key, &identity).unwrap();
        assert!(bf.curve().is_on_curve(&encapsulated_key));
    }

    #[test]
    fn off_curve_inputs_are_rejected() {
        let mut rng = rand::thread_rng();
        let bf = BonehFranklin::new(Curve::toy256());
        let (public_key, master_key) = bf.setup(&mut rng).unwrap();
        let forged = CurvePoint::Affine {
            x: BigUint::from(1u32),
            y: BigUint::from(1u32),
        };
        assert!(matches!(
            bf.extract(&public_key, &master_key, &forged),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            bf.encapsulate(&mut rng, &public_key, &forged),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            bf.decapsulate(&public_key, &forged, &public_key.generator),
            Err(Error::InvalidInput(_))
        ));
    }
}
