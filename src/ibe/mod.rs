//! Low-level implementation of IBE primitives.
//!
//! The structs and traits in this module implement identity-based encryption the way it is
//! defined in the papers: the operations work directly on group elements. For a higher-level,
//! byte-oriented interface, refer to the [`kem`][crate::kem] module, and for the authority that
//! guards the master secret, to [`pkg`][crate::pkg].
//!
//! To make this module more flexible, all methods that use randomness only use the [`Rng`]
//! bound, not [`CryptoRng`][rand::CryptoRng]. This does not mean that you should use them with
//! insecure randomness, but rather that you need to take care when using these low-level
//! primitives!
//!
//! # Identity Handling
//!
//! At this level an identity is already a group element: the point `Q_ID` that the identity
//! string hashes to. The mapping from application identities (mail addresses, user names) to
//! points lives in [`hash::hash_to_point`][crate::hash::hash_to_point] and is applied by the
//! high-level wrappers, so that the algebra here stays free of string handling.

use crate::error::Result;

use rand::Rng;

mod bf;
pub use self::bf::{BfPublicKey, BonehFranklin};

/// Main trait for IBE schemes.
///
/// This trait covers parameter generation and private-key extraction. For key encapsulation,
/// the extension [`IbeKem`] needs to be used.
///
/// Note that this trait represents an IBE *algorithm*, not an IBE *instantiation*.
pub trait Ibe {
    /// Type of a single identity's private key.
    type PrivateKey;
    /// Type of the master secret key, held by the authority alone.
    type MasterKey;
    /// Type of the public key.
    ///
    /// As IBE derives per-identity public keys from the identity itself, this is the public
    /// key "of the whole system", sometimes also called the *system parameters*.
    type PublicKey;
    /// Type of an identity, as seen by the algorithm.
    type Identity;

    /// Set the system up.
    ///
    /// This method outputs the public key and the master secret key.
    fn setup<R: Rng>(&self, rng: R) -> Result<(Self::PublicKey, Self::MasterKey)>;

    /// Extract the private key for the given identity.
    ///
    /// Parameters:
    ///
    /// * `public_key` - The public key of the system.
    /// * `master_key` - The master secret key.
    /// * `identity` - The identity to extract a key for.
    fn extract(
        &self,
        public_key: &Self::PublicKey,
        master_key: &Self::MasterKey,
        identity: &Self::Identity,
    ) -> Result<Self::PrivateKey>;
}

/// IBE methods to do key encapsulation.
pub trait IbeKem: Ibe {
    /// Type of the resulting key.
    type Key;
    /// Type of the encapsulation of the key.
    type EncapsulatedKey;

    /// Computes a key encapsulation for the given identity.
    ///
    /// Returns the generated key and its encapsulation. Only the public key and the identity
    /// are needed, which is the defining property of IBE: no interaction with the authority
    /// happens at encryption time.
    ///
    /// Parameters:
    ///
    /// * `rng` - The randomness to use.
    /// * `public_key` - The public key of the system.
    /// * `identity` - The identity for which to encapsulate the key.
    fn encapsulate<R: Rng>(
        &self,
        rng: R,
        public_key: &Self::PublicKey,
        identity: &Self::Identity,
    ) -> Result<(Self::Key, Self::EncapsulatedKey)>;

    /// Decapsulate a previously encapsulated key.
    fn decapsulate(
        &self,
        public_key: &Self::PublicKey,
        key: &Self::PrivateKey,
        encapsulation: &Self::EncapsulatedKey,
    ) -> Result<Self::Key>;
}
