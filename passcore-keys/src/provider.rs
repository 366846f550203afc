//! Master symmetric key providers.
//!
//! The key manager never unlocks anything itself. It asks a provider for the
//! master key on every decryption and surfaces `KeyUnavailable` when the
//! session is locked.

use crate::error::{KeyError, KeyResult};
use async_trait::async_trait;
use passcore_crypto::SymmetricKey;
use std::sync::{PoisonError, RwLock};
use tracing::debug;

/// Supplies the process-wide master key used to unwrap cached share keys.
#[async_trait]
pub trait SymmetricKeyProvider: Send + Sync {
    /// Returns the master key, or `KeyError::KeyUnavailable` when locked.
    async fn symmetric_key(&self) -> KeyResult<SymmetricKey>;
}

/// Provider with a fixed key. Never locks.
pub struct StaticKeyProvider {
    key: SymmetricKey,
}

impl StaticKeyProvider {
    pub fn new(key: SymmetricKey) -> Self {
        Self { key }
    }
}

#[async_trait]
impl SymmetricKeyProvider for StaticKeyProvider {
    async fn symmetric_key(&self) -> KeyResult<SymmetricKey> {
        Ok(self.key.clone())
    }
}

/// Provider driven by the session: unlocked with a key, locked on logout or
/// auto-lock.
#[derive(Default)]
pub struct LockableKeyProvider {
    key: RwLock<Option<SymmetricKey>>,
}

impl LockableKeyProvider {
    /// Creates a locked provider.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unlock(&self, key: SymmetricKey) {
        *self.key.write().unwrap_or_else(PoisonError::into_inner) = Some(key);
        debug!("symmetric key provider unlocked");
    }

    /// Drops the key. Pair with `KeyManager::clear` to also drop decrypted keys.
    pub fn lock(&self) {
        *self.key.write().unwrap_or_else(PoisonError::into_inner) = None;
        debug!("symmetric key provider locked");
    }

    pub fn is_unlocked(&self) -> bool {
        self.key
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

#[async_trait]
impl SymmetricKeyProvider for LockableKeyProvider {
    async fn symmetric_key(&self) -> KeyResult<SymmetricKey> {
        self.key
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(KeyError::KeyUnavailable)
    }
}
