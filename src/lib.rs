//! Implementation of Identity Based Encryption ([IBE]) after Boneh and Franklin, built from
//! the ground up: prime field, curve group, and bilinear pairing included.
//!
//! # ⚠️ Warning: Cryptographic Hazmat ☣️
//!
//! This crate is made for playing around with IBE and for prototyping of applications and
//! protocols using IBE. It has *not* been audited, it is *not* battle tested, and *nobody*
//! claims it to be secure.
//!
//! Use it at **your own risk** and if you know what you are doing!
//!
//! # Introduction
//!
//! IBEs are encryption schemes in which a party can encrypt data for a given recipient by
//! using the recipient's identity in the encryption process, instead of requiring an
//! explicitely shared public key. A trusted authority, the private key generator, holds a
//! master secret from which it can extract the matching private key for any identity — after
//! the fact, and only for recipients that ask for one.
//!
//! This library is intended to provide an easy-to-use implementation of Boneh-Franklin IBE
//! for prototyping and playing around. It is not optimized for speed, but rather for
//! readability: unlike most pairing-based crates it does not bind to an external pairing
//! library, but carries its own field, curve and Tate pairing over a small, well-commented
//! supersingular curve, so the whole path from identity string to shared pairing value can be
//! read top to bottom.
//!
//! # Crate Structure
//!
//! The mathematical layers sit at the bottom: [`field`] (F_p and F_p²), [`curve`] (the curve
//! group and the fixed parameter profiles), [`pairing`] (Miller loop and final
//! exponentiation), and [`hash`] (maps from byte strings into the group and scalar field).
//!
//! On top of those, the [`ibe`] submodule contains the scheme definitions, as [`ibe::Ibe`]
//! (parameter generation and key extraction) and [`ibe::IbeKem`] (key encapsulation), plus
//! the [`ibe::BonehFranklin`] implementation. Those methods work directly on group elements,
//! as they are defined in the paper.
//!
//! To aid in using those algorithms, a higher-level wrapper is provided in the [`kem`]
//! submodule, mainly in the [`kem::HybridIbe`] struct. This allows you to deal with strings
//! and bytes instead of group elements. The [`pkg`] submodule finally wraps the master secret
//! into an explicit authority object with a setup/reset lifecycle and a per-identity key
//! cache.
//!
//! # Example
//!
//! ```
//! use bfibe::curve::Curve;
//! use bfibe::kem::HybridIbe;
//! use bfibe::pkg::PkgAuthority;
//!
//! # fn main() -> bfibe::error::Result<()> {
//! let mut rng = rand::thread_rng();
//!
//! // the authority side
//! let mut pkg = PkgAuthority::new(Curve::toy256());
//! let public_key = pkg.setup(&mut rng)?;
//!
//! // the sender side needs nothing but the public key and the recipient's identity
//! let ibe = HybridIbe::new(Curve::toy256());
//! let ciphertext = ibe.encrypt(&mut rng, &public_key, "alice@example.org", b"hello")?;
//!
//! // the recipient asks the authority for her key, once
//! let alice = pkg.extract("alice@example.org")?;
//! assert_eq!(ibe.decrypt(&public_key, &alice, &ciphertext)?, b"hello");
//! # Ok(())
//! # }
//! ```
//!
//! Applications that encrypt many values (say, chosen fields of many records) call
//! [`kem::HybridIbe::encrypt`] once per value in their own loop; the engine keeps no batch
//! state.
//!
//! [IBE]: https://en.wikipedia.org/wiki/Identity-based_encryption

pub mod curve;
pub mod error;
pub mod field;
pub mod hash;
pub mod ibe;
pub mod kem;
pub mod pairing;
pub mod pkg;

/// A trait to provide byte-level access to objects.
pub trait ByteAccess {
    /// Provides access to the bytes.
    ///
    /// Unlike [`AsRef`], there are no statements made about the performance of this operation.
    /// This operation will allocate a fresh vector, and the byte representation may or may not
    /// have to be computed first.
    fn bytes(&self) -> Vec<u8>;

    /// Provide a short fingerprint of the bytes.
    ///
    /// This can be used to "summarize" long keys when displaying them, to still provide
    /// distinguishing features but to not print out the whole key.
    ///
    /// By default, this method uses the first 16 bytes of the [`ByteAccess::bytes`]
    /// representation, and formats them as a hex string.
    fn fingerprint(&self) -> String {
        hex::encode(&self.bytes()[..16])
    }
}
