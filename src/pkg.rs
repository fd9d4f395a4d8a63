//! The private key generator: the trusted authority that owns the master secret.
//!
//! [`PkgAuthority`] is the only stateful object in the crate. It starts out uninitialized,
//! acquires an epoch (master secret plus public parameters) through [`PkgAuthority::setup`],
//! and hands out per-identity keys through [`PkgAuthority::extract`]. Running setup a second
//! time is refused: a fresh master secret silently invalidates every key extracted so far, so
//! starting a new epoch requires an explicit [`PkgAuthority::reset`] first.
//!
//! Extracted keys are cached per identity string behind an `RwLock`, so concurrent extracts
//! for already-known identities share a read lock; only a cache miss takes the write lock.
//! Everything else in the crate is pure and needs no coordination.

use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::sync::RwLock;

use rand::{CryptoRng, Rng};

use crate::curve::Curve;
use crate::error::{Error, Result};
use crate::kem::{HybridIbe, MasterKey, PublicKey, UserKey};

struct Epoch {
    public_key: PublicKey,
    master_key: MasterKey,
    cache: RwLock<HashMap<String, UserKey>>,
}

/// The authority that runs setup and extraction for one IBE system.
pub struct PkgAuthority {
    engine: HybridIbe,
    epoch: Option<Epoch>,
}

impl PkgAuthority {
    /// Create an uninitialized authority over the given curve profile.
    pub fn new(curve: Curve) -> Self {
        Self {
            engine: HybridIbe::new(curve),
            epoch: None,
        }
    }

    /// Whether the authority holds a master secret.
    pub fn is_ready(&self) -> bool {
        self.epoch.is_some()
    }

    /// Generate the master secret and public parameters for a fresh epoch.
    ///
    /// Returns the public key to distribute to senders. Fails with
    /// [`ReKeyNotAllowed`][Error::ReKeyNotAllowed] if an epoch already exists.
    pub fn setup<R: Rng + CryptoRng>(&mut self, rng: R) -> Result<PublicKey> {
        if self.epoch.is_some() {
            return Err(Error::ReKeyNotAllowed);
        }
        let (public_key, master_key) = self.engine.setup(rng)?;
        self.epoch = Some(Epoch {
            public_key: public_key.clone(),
            master_key,
            cache: RwLock::new(HashMap::new()),
        });
        Ok(public_key)
    }

    /// Discard the current epoch: the master secret, the public parameters, and all cached
    /// user keys.
    ///
    /// Keys extracted under the discarded epoch stop matching anything encrypted under the
    /// next one; callers must treat a reset as a breaking epoch change.
    pub fn reset(&mut self) {
        self.epoch = None;
    }

    /// The public parameters of the current epoch.
    pub fn public_key(&self) -> Result<&PublicKey> {
        self.epoch
            .as_ref()
            .map(|epoch| &epoch.public_key)
            .ok_or(Error::NotInitialized)
    }

    /// Extract (or fetch from the cache) the private key for the given identity.
    pub fn extract(&self, identity: &str) -> Result<UserKey> {
        let epoch = self.epoch.as_ref().ok_or(Error::NotInitialized)?;
        if let Some(key) = epoch
            .cache
            .read()
            .expect("key cache lock poisoned")
            .get(identity)
        {
            return Ok(key.clone());
        }
        let key = self
            .engine
            .extract(&epoch.public_key, &epoch.master_key, identity)?;
        epoch
            .cache
            .write()
            .expect("key cache lock poisoned")
            .insert(identity.to_string(), key.clone());
        Ok(key)
    }
}

impl Debug for PkgAuthority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // deliberately omits the epoch, which holds the master secret
        f.debug_struct("PkgAuthority")
            .field("ready", &self.is_ready())
            .finish()
    }
}
