//! High-level wrapper around IBE operations.
//!
//! Usually, people don't communicate by sending each other group elements. Therefore, we
//! provide this opinionated and easier-to-use wrapper over the raw IBE operations. The main
//! struct is [`HybridIbe`], which wraps [`BonehFranklin`] to provide high-level operations.
//! The main differences include:
//!
//! * Identities are plain strings; the mapping to curve points via
//!   [`hash_to_point`][crate::hash::hash_to_point] happens internally.
//! * Encryption and decryption work on byte sequences instead of group elements, using hybrid
//!   encryption: the encapsulated pairing value is hashed to a 32-byte key which then drives
//!   AES-256-GCM. The authentication tag makes a wrong private key an explicit
//!   [`KeyMismatch`][Error::KeyMismatch] instead of silently garbled output.
//! * The types are wrapped in proper opaque structs instead of being type aliases, with
//!   fingerprint-only [`Debug`] implementations, and every point-bearing type re-validates its
//!   points against the curve when deserialized.
//! * A [`UserKey`] carries the identity string it was extracted for, so handing the wrong key
//!   to an application layer can be rejected by a plain string comparison before any group
//!   operation runs.
//! * The methods in this module are restricted to [`CryptoRng`] random generators to enforce
//!   the use of cryptographically secure algorithms.
//!
//! Batch workflows (encrypting selected fields of many records, as an application frontend
//! would) are deliberately not part of this API: they are one `encrypt` call per field in a
//! loop owned by the caller.

use std::fmt::{self, Debug};

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use num_bigint::BigUint;
use rand::{CryptoRng, Rng};
use serde::{Deserialize, Serialize};

use crate::curve::{Curve, CurvePoint};
use crate::error::{Error, Result};
use crate::hash::{derive_key, hash_to_point};
use crate::ibe::{BfPublicKey, BonehFranklin, Ibe, IbeKem};
use crate::ByteAccess;

/// Domain separation tag under which identity strings are hashed to points.
const IDENTITY_DOMAIN: &[u8] = b"bfibe-v1-identity";

/// Identifier of the hash-to-point / key-derivation pair baked into this crate.
const HASH_SUITE: &str = "shake256-ti/sha3-256";

/// Represents the public key, or system parameters.
///
/// This is everything a sender needs in order to encrypt to any identity: the curve profile
/// (modulus, subgroup order, cofactor), the generator, the master public point, and the
/// identifier of the hash suite. The key does not represent the public key of a single
/// identity; encryption takes the identity as a separate parameter.
///
/// You mainly want to pass this object around (e.g. to [`HybridIbe::encrypt`]) without caring
/// about its internals. You can however serialize and deserialize it to save or transmit it;
/// [`PublicKey::from_bytes`] re-validates the embedded points.
///
/// Note that the debug output does not output all inner bytes and instead outputs a small
/// fingerprint only.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PublicKey {
    modulus: BigUint,
    order: BigUint,
    cofactor: BigUint,
    generator: CurvePoint,
    master_point: CurvePoint,
    hash_suite: String,
}

impl PublicKey {
    /// Reconstruct the curve context these parameters describe, validating the parameter
    /// relations and both embedded points (on-curve and of order `q`).
    pub fn curve(&self) -> Result<Curve> {
        let curve = Curve::from_parameters(
            self.modulus.clone(),
            self.order.clone(),
            self.cofactor.clone(),
        )?;
        if self.hash_suite != HASH_SUITE {
            return Err(Error::InvalidInput("unknown hash suite"));
        }
        for point in [&self.generator, &self.master_point] {
            if point.is_infinity() || !curve.is_on_curve(point) {
                return Err(Error::InvalidInput(
                    "public point is not a valid group element",
                ));
            }
            if !curve.scalar_mul(curve.order(), point).is_infinity() {
                return Err(Error::InvalidInput("public point is not in the subgroup"));
            }
        }
        Ok(curve)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes()
    }

    /// Deserialize and validate system parameters.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let key: PublicKey =
            bincode::deserialize(bytes).map_err(|_| Error::InvalidInput("malformed public key"))?;
        key.curve()?;
        Ok(key)
    }
}

impl ByteAccess for PublicKey {
    fn bytes(&self) -> Vec<u8> {
        bincode::serialize(self).unwrap()
    }
}

impl Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PublicKey")
            .field(&self.fingerprint())
            .finish()
    }
}

/// Represents the master secret key.
///
/// The master secret key allows the holder to extract the secret key of any identity. It is
/// meant to stay inside the [`PkgAuthority`][crate::pkg::PkgAuthority]; nothing in this crate
/// ever serializes it into consumer-facing output.
///
/// Note that the debug output does not output all inner bytes and instead outputs a small
/// fingerprint only.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MasterKey(pub(crate) BigUint);

impl ByteAccess for MasterKey {
    fn bytes(&self) -> Vec<u8> {
        bincode::serialize(self).unwrap()
    }
}

impl Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MasterKey")
            .field(&self.fingerprint())
            .finish()
    }
}

/// Represents an identity's secret key.
///
/// The key carries the identity string it was extracted for, so a caller holding several keys
/// can pick (or reject) the right one up front via [`UserKey::identity`] instead of finding
/// out through a failed decryption.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UserKey {
    identity: String,
    point: CurvePoint,
}

impl UserKey {
    /// The identity string this key belongs to.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes()
    }

    /// Deserialize a user key, validating the point against the given system parameters.
    pub fn from_bytes(public_key: &PublicKey, bytes: &[u8]) -> Result<Self> {
        let key: UserKey =
            bincode::deserialize(bytes).map_err(|_| Error::InvalidInput("malformed user key"))?;
        let curve = public_key.curve()?;
        if key.point.is_infinity() || !curve.is_on_curve(&key.point) {
            return Err(Error::InvalidInput(
                "user key point is not a valid group element",
            ));
        }
        Ok(key)
    }
}

impl ByteAccess for UserKey {
    fn bytes(&self) -> Vec<u8> {
        bincode::serialize(self).unwrap()
    }
}

impl Debug for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserKey")
            .field("identity", &self.identity)
            .field("key", &self.fingerprint())
            .finish()
    }
}

/// A hybrid ciphertext: the ephemeral point `U`, the AEAD nonce, and the sealed payload `V`.
///
/// Produced by [`HybridIbe::encrypt`] and consumed by [`HybridIbe::decrypt`]. The serialized
/// form length-prefixes the payload; [`Ciphertext::from_bytes`] validates the ephemeral point
/// against the system parameters.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Ciphertext {
    ephemeral: CurvePoint,
    nonce: [u8; 12],
    payload: Vec<u8>,
}

impl Ciphertext {
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes()
    }

    /// Deserialize a ciphertext, validating the ephemeral point.
    pub fn from_bytes(public_key: &PublicKey, bytes: &[u8]) -> Result<Self> {
        let ciphertext: Ciphertext =
            bincode::deserialize(bytes).map_err(|_| Error::MalformedCiphertext)?;
        let curve = public_key.curve()?;
        if ciphertext.ephemeral.is_infinity() || !curve.is_on_curve(&ciphertext.ephemeral) {
            return Err(Error::MalformedCiphertext);
        }
        Ok(ciphertext)
    }
}

impl ByteAccess for Ciphertext {
    fn bytes(&self) -> Vec<u8> {
        bincode::serialize(self).unwrap()
    }
}

impl Debug for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Ciphertext")
            .field(&self.fingerprint())
            .finish()
    }
}

/// High-level implementation of IBE operations.
///
/// This struct internally uses the [`BonehFranklin`] scheme over the curve profile it was
/// constructed with. All key and ciphertext types it hands out are tied to that profile;
/// feeding it a [`PublicKey`] from a different profile fails with
/// [`InvalidInput`][Error::InvalidInput].
#[derive(Debug, Clone)]
pub struct HybridIbe {
    scheme: BonehFranklin,
}

impl HybridIbe {
    /// Create a new [`HybridIbe`] over the given curve profile.
    pub fn new(curve: Curve) -> Self {
        Self {
            scheme: BonehFranklin::new(curve),
        }
    }

    fn low_level_key(&self, public_key: &PublicKey) -> Result<BfPublicKey> {
        if public_key.modulus != *self.scheme.curve().field().modulus()
            || public_key.order != *self.scheme.curve().order()
        {
            return Err(Error::InvalidInput(
                "public key belongs to a different curve profile",
            ));
        }
        Ok(BfPublicKey {
            generator: public_key.generator.clone(),
            master_point: public_key.master_point.clone(),
        })
    }

    fn map_identity(&self, identity: &str) -> Result<CurvePoint> {
        hash_to_point(self.scheme.curve(), IDENTITY_DOMAIN, identity.as_bytes())
    }

    /// Sets up the system parameters.
    ///
    /// This operation returns the public key and the master secret key.
    pub fn setup<R: Rng + CryptoRng>(&self, rng: R) -> Result<(PublicKey, MasterKey)> {
        let (public_key, master_key) = self.scheme.setup(rng)?;
        let curve = self.scheme.curve();
        Ok((
            PublicKey {
                modulus: curve.field().modulus().clone(),
                order: curve.order().clone(),
                cofactor: curve.cofactor().clone(),
                generator: public_key.generator,
                master_point: public_key.master_point,
                hash_suite: HASH_SUITE.to_string(),
            },
            MasterKey(master_key),
        ))
    }

    /// Extracts the secret key for an identity using the master secret key.
    ///
    /// Parameters:
    ///
    /// * `public_key` - The public key of the system.
    /// * `master_key` - The master secret key.
    /// * `identity` - The identity to extract the key for.
    pub fn extract(
        &self,
        public_key: &PublicKey,
        master_key: &MasterKey,
        identity: &str,
    ) -> Result<UserKey> {
        let low_level = self.low_level_key(public_key)?;
        let identity_point = self.map_identity(identity)?;
        let point = self
            .scheme
            .extract(&low_level, &master_key.0, &identity_point)?;
        Ok(UserKey {
            identity: identity.to_string(),
            point,
        })
    }

    /// Encrypt the given byte sequence for the given identity.
    ///
    /// Only public data goes in: the system parameters and the recipient's identity string.
    /// Internally the pairing value is encapsulated, hashed to a symmetric key, and the
    /// payload sealed with AES-256-GCM under a random nonce.
    ///
    /// Parameters:
    ///
    /// * `rng` - The randomness to use.
    /// * `public_key` - The public key of the system.
    /// * `identity` - The identity to encrypt the payload for.
    /// * `payload` - Payload to encrypt.
    pub fn encrypt<R: Rng + CryptoRng>(
        &self,
        mut rng: R,
        public_key: &PublicKey,
        identity: &str,
        payload: &[u8],
    ) -> Result<Ciphertext> {
        let low_level = self.low_level_key(public_key)?;
        let identity_point = self.map_identity(identity)?;
        let (pairing_value, ephemeral) =
            self.scheme
                .encapsulate(&mut rng, &low_level, &identity_point)?;
        let key = derive_key(&pairing_value, self.scheme.curve());
        let nonce: [u8; 12] = rng.gen();
        let cipher = Aes256Gcm::new_from_slice(&key).expect("derived key is 32 bytes");
        let sealed = cipher
            .encrypt(Nonce::from_slice(&nonce), payload)
            .expect("AES-GCM encryption of an in-memory payload cannot fail");
        Ok(Ciphertext {
            ephemeral,
            nonce,
            payload: sealed,
        })
    }

    /// Decrypt the given ciphertext with an extracted user key.
    ///
    /// Returns the payload. Fails with [`KeyMismatch`][Error::KeyMismatch] when the key was
    /// extracted for a different identity than the ciphertext's recipient, when the key
    /// belongs to another epoch, or when the sealed payload was tampered with.
    ///
    /// Parameters:
    ///
    /// * `public_key` - The public key of the system.
    /// * `key` - The private key of the receiving identity.
    /// * `ciphertext` - The ciphertext, as previously returned by [`HybridIbe::encrypt`].
    pub fn decrypt(
        &self,
        public_key: &PublicKey,
        key: &UserKey,
        ciphertext: &Ciphertext,
    ) -> Result<Vec<u8>> {
        let low_level = self.low_level_key(public_key)?;
        let pairing_value =
            self.scheme
                .decapsulate(&low_level, &key.point, &ciphertext.ephemeral)?;
        let symmetric_key = derive_key(&pairing_value, self.scheme.curve());
        let cipher = Aes256Gcm::new_from_slice(&symmetric_key).expect("derived key is 32 bytes");
        cipher
            .decrypt(
                Nonce::from_slice(&ciphertext.nonce),
                ciphertext.payload.as_slice(),
            )
            .map_err(|_| Error::KeyMismatch)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaChaRng;

    fn engine() -> HybridIbe {
        HybridIbe::new(Curve::toy256())
    }

    #[test]
    fn test_encrypt_decrypt() {
        let mut rng = rand::thread_rng();
        let ibe = engine();
        let (public_key, master_key) = ibe.setup(&mut rng).unwrap();
        let secret_key = ibe
            .extract(&public_key, &master_key, "alice@example.org")
            .unwrap();
        let message = b"Hello, world!";
        let ciphertext = ibe
            .encrypt(&mut rng, &public_key, "alice@example.org", message)
            .unwrap();
        let decryption = ibe.decrypt(&public_key, &secret_key, &ciphertext).unwrap();
        assert_eq!(message.as_slice(), decryption.as_slice());
    }

    #[test]
    fn encrypt_decrypt_on_the_default_profile() {
        let mut rng = rand::thread_rng();
        let ibe = HybridIbe::new(Curve::bf512());
        let (public_key, master_key) = ibe.setup(&mut rng).unwrap();
        let secret_key = ibe
            .extract(&public_key, &master_key, "alice@example.org")
            .unwrap();
        let ciphertext = ibe
            .encrypt(&mut rng, &public_key, "alice@example.org", b"hello")
            .unwrap();
        let decryption = ibe.decrypt(&public_key, &secret_key, &ciphertext).unwrap();
        assert_eq!(decryption, b"hello");
    }

    #[test]
    fn wrong_identity_is_a_key_mismatch() {
        let mut rng = rand::thread_rng();
        let ibe = engine();
        let (public_key, master_key) = ibe.setup(&mut rng).unwrap();
        let bob_key = ibe
            .extract(&public_key, &master_key, "bob@example.org")
            .unwrap();
        let ciphertext = ibe
            .encrypt(&mut rng, &public_key, "alice@example.org", b"for alice only")
            .unwrap();
        assert!(matches!(
            ibe.decrypt(&public_key, &bob_key, &ciphertext),
            Err(Error::KeyMismatch)
        ));
    }

    #[test]
    fn flipped_payload_bits_are_a_key_mismatch() {
        let mut rng = rand::thread_rng();
        let ibe = engine();
        let (public_key, master_key) = ibe.setup(&mut rng).unwrap();
        let secret_key = ibe
            .extract(&public_key, &master_key, "alice@example.org")
            .unwrap();
        let ciphertext = ibe
            .encrypt(&mut rng, &public_key, "alice@example.org", b"hello")
            .unwrap();
        for byte in 0..ciphertext.payload.len() {
            for bit in 0..8 {
                let mut tampered = ciphertext.clone();
                tampered.payload[byte] ^= 1 << bit;
                assert!(matches!(
                    ibe.decrypt(&public_key, &secret_key, &tampered),
                    Err(Error::KeyMismatch)
                ));
            }
        }
    }

    #[test]
    fn fixed_seeds_give_fixed_results() {
        let ibe = engine();
        let run = || {
            let (public_key, master_key) = ibe.setup(ChaChaRng::from_seed([7; 32])).unwrap();
            let secret_key = ibe
                .extract(&public_key, &master_key, "alice@example.org")
                .unwrap();
            let ciphertext = ibe
                .encrypt(
                    ChaChaRng::from_seed([9; 32]),
                    &public_key,
                    "alice@example.org",
                    b"hello",
                )
                .unwrap();
            (public_key, secret_key, ciphertext)
        };
        let (public_one, key_one, ciphertext_one) = run();
        let (public_two, key_two, ciphertext_two) = run();
        assert_eq!(public_one.bytes(), public_two.bytes());
        assert_eq!(key_one, key_two);
        assert_eq!(ciphertext_one.bytes(), ciphertext_two.bytes());
        let decryption = ibe.decrypt(&public_one, &key_one, &ciphertext_one).unwrap();
        assert_eq!(decryption, b"hello");
    }

    #[test]
    fn public_key_round_trips_byte_exact() {
        let mut rng = rand::thread_rng();
        let ibe = engine();
        let (public_key, _) = ibe.setup(&mut rng).unwrap();
        let bytes = public_key.to_bytes();
        let restored = PublicKey::from_bytes(&bytes).unwrap();
        assert_eq!(restored, public_key);
        assert_eq!(restored.to_bytes(), bytes);
    }

    #[test]
    fn user_key_serialization_keeps_the_identity() {
        let mut rng = rand::thread_rng();
        let ibe = engine();
        let (public_key, master_key) = ibe.setup(&mut rng).unwrap();
        let secret_key = ibe
            .extract(&public_key, &master_key, "alice@example.org")
            .unwrap();
        let restored = UserKey::from_bytes(&public_key, &secret_key.to_bytes()).unwrap();
        assert_eq!(restored, secret_key);
        assert_eq!(restored.identity(), "alice@example.org");
    }

    #[test]
    fn ciphertext_round_trips_and_validates() {
        let mut rng = rand::thread_rng();
        let ibe = engine();
        let (public_key, master_key) = ibe.setup(&mut rng).unwrap();
        let secret_key = ibe
            .extract(&public_key, &master_key, "alice@example.org")
            .unwrap();
        let ciphertext = ibe
            .encrypt(&mut rng, &public_key, "alice@example.org", b"hello")
            .unwrap();
        let restored = Ciphertext::from_bytes(&public_key, &ciphertext.to_bytes()).unwrap();
        assert_eq!(
            ibe.decrypt(&public_key, &secret_key, &restored).unwrap(),
            b"hello"
        );

        assert!(matches!(
            Ciphertext::from_bytes(&public_key, b"not a ciphertext"),
            Err(Error::MalformedCiphertext)
        ));

        let mut off_curve = ciphertext;
        off_curve.ephemeral = CurvePoint::Affine {
            x: BigUint::from(1u32),
            y: BigUint::from(1u32),
        };
        assert!(matches!(
            Ciphertext::from_bytes(&public_key, &off_curve.to_bytes()),
            Err(Error::MalformedCiphertext)
        ));
    }

    #[test]
    fn foreign_profile_keys_are_rejected() {
        let mut rng = rand::thread_rng();
        let toy = engine();
        let big = HybridIbe::new(Curve::bf512());
        let (toy_public, _) = toy.setup(&mut rng).unwrap();
        assert!(matches!(
            big.encrypt(&mut rng, &toy_public, "alice@example.org", b"hello"),
            Err(Error::InvalidInput(_))
        ));
    }
}
