//! Wrapped and decrypted key types.

use passcore_crypto::SymmetricKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// One generation of a share (vault) key, still wrapped under the user's
/// master key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareKey {
    pub share_id: String,
    pub key_rotation: i64,
    /// `nonce ‖ ciphertext ‖ tag`, sealed with the `LocalShareKey` tag.
    pub encrypted_key: Vec<u8>,
}

/// One generation of an item key, wrapped under the share key of the same
/// rotation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemKey {
    pub share_id: String,
    pub item_id: String,
    pub key_rotation: i64,
    /// `nonce ‖ ciphertext ‖ tag`, sealed with the `ItemKey` tag.
    pub encrypted_key: Vec<u8>,
}

/// Common view over decrypted share and item keys.
///
/// Only keys that know their rotation implement it; a bare key has none.
///
/// ```compile_fail
/// use passcore_keys::RotatedKey;
///
/// let key = passcore_crypto::SymmetricKey::from_bytes([0; 32]);
/// key.key_rotation();
/// ```
pub trait RotatedKey {
    fn key_rotation(&self) -> i64;
    fn key_data(&self) -> &SymmetricKey;
}

/// A decrypted share key.
///
/// Equality and hashing use the identity `(share_id, key_rotation)` only.
/// Clones share the same key allocation.
#[derive(Clone, Debug)]
pub struct DecryptedShareKey {
    pub share_id: String,
    pub key_rotation: i64,
    key_data: Arc<SymmetricKey>,
}

impl DecryptedShareKey {
    pub fn new(share_id: impl Into<String>, key_rotation: i64, key_data: SymmetricKey) -> Self {
        Self {
            share_id: share_id.into(),
            key_rotation,
            key_data: Arc::new(key_data),
        }
    }

    pub fn key_data(&self) -> &SymmetricKey {
        &self.key_data
    }

    /// True when both values point at the same cached key allocation.
    pub fn is_same_instance(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.key_data, &other.key_data)
    }

    pub fn identity(&self) -> KeyIdentity {
        KeyIdentity::share(&self.share_id, Some(self.key_rotation))
    }
}

impl PartialEq for DecryptedShareKey {
    fn eq(&self, other: &Self) -> bool {
        self.share_id == other.share_id && self.key_rotation == other.key_rotation
    }
}

impl Eq for DecryptedShareKey {}

impl Hash for DecryptedShareKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.share_id.hash(state);
        self.key_rotation.hash(state);
    }
}

impl RotatedKey for DecryptedShareKey {
    fn key_rotation(&self) -> i64 {
        self.key_rotation
    }

    fn key_data(&self) -> &SymmetricKey {
        &self.key_data
    }
}

/// A decrypted item key.
///
/// Equality and hashing use `(share_id, item_id, key_rotation)` only.
#[derive(Clone, Debug)]
pub struct DecryptedItemKey {
    pub share_id: String,
    pub item_id: String,
    pub key_rotation: i64,
    key_data: Arc<SymmetricKey>,
}

impl DecryptedItemKey {
    pub fn new(
        share_id: impl Into<String>,
        item_id: impl Into<String>,
        key_rotation: i64,
        key_data: SymmetricKey,
    ) -> Self {
        Self {
            share_id: share_id.into(),
            item_id: item_id.into(),
            key_rotation,
            key_data: Arc::new(key_data),
        }
    }

    pub fn key_data(&self) -> &SymmetricKey {
        &self.key_data
    }

    pub fn is_same_instance(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.key_data, &other.key_data)
    }

    pub fn identity(&self) -> KeyIdentity {
        KeyIdentity::item(&self.share_id, &self.item_id, Some(self.key_rotation))
    }
}

impl PartialEq for DecryptedItemKey {
    fn eq(&self, other: &Self) -> bool {
        self.share_id == other.share_id
            && self.item_id == other.item_id
            && self.key_rotation == other.key_rotation
    }
}

impl Eq for DecryptedItemKey {}

impl Hash for DecryptedItemKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.share_id.hash(state);
        self.item_id.hash(state);
        self.key_rotation.hash(state);
    }
}

impl RotatedKey for DecryptedItemKey {
    fn key_rotation(&self) -> i64 {
        self.key_rotation
    }

    fn key_data(&self) -> &SymmetricKey {
        &self.key_data
    }
}

/// Either kind of decrypted key; what protects an item's content depends on
/// the share it was reached through.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DecryptedKey {
    Share(DecryptedShareKey),
    Item(DecryptedItemKey),
}

impl RotatedKey for DecryptedKey {
    fn key_rotation(&self) -> i64 {
        match self {
            DecryptedKey::Share(key) => key.key_rotation,
            DecryptedKey::Item(key) => key.key_rotation,
        }
    }

    fn key_data(&self) -> &SymmetricKey {
        match self {
            DecryptedKey::Share(key) => key.key_data(),
            DecryptedKey::Item(key) => key.key_data(),
        }
    }
}

impl From<DecryptedShareKey> for DecryptedKey {
    fn from(key: DecryptedShareKey) -> Self {
        DecryptedKey::Share(key)
    }
}

impl From<DecryptedItemKey> for DecryptedKey {
    fn from(key: DecryptedItemKey) -> Self {
        DecryptedKey::Item(key)
    }
}

/// How a share grants access: a whole vault, or a single shared item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShareKind {
    Vault,
    Item,
    Unknown(i64),
}

impl ShareKind {
    /// Maps the server's numeric share type.
    pub fn from_raw(raw: i64) -> Self {
        match raw {
            1 => ShareKind::Vault,
            2 => ShareKind::Item,
            other => ShareKind::Unknown(other),
        }
    }
}

/// Which key a lookup was for. Carried by `KeyError::KeyNotFound`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyIdentity {
    Share {
        share_id: String,
        rotation: Option<i64>,
    },
    Item {
        share_id: String,
        item_id: String,
        rotation: Option<i64>,
    },
}

impl KeyIdentity {
    pub fn share(share_id: &str, rotation: Option<i64>) -> Self {
        KeyIdentity::Share {
            share_id: share_id.to_string(),
            rotation,
        }
    }

    pub fn item(share_id: &str, item_id: &str, rotation: Option<i64>) -> Self {
        KeyIdentity::Item {
            share_id: share_id.to_string(),
            item_id: item_id.to_string(),
            rotation,
        }
    }
}

impl fmt::Display for KeyIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyIdentity::Share { share_id, rotation } => {
                write!(f, "share {share_id}")?;
                if let Some(rotation) = rotation {
                    write!(f, " rotation {rotation}")?;
                }
                Ok(())
            }
            KeyIdentity::Item {
                share_id,
                item_id,
                rotation,
            } => {
                write!(f, "item {item_id} in share {share_id}")?;
                if let Some(rotation) = rotation {
                    write!(f, " rotation {rotation}")?;
                }
                Ok(())
            }
        }
    }
}

/// Cache key for decrypted share keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct ShareKeyId {
    pub share_id: String,
    pub rotation: i64,
}

/// Single-flight key for latest-share-key lookups.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct LatestShareKeyId {
    pub user_id: String,
    pub share_id: String,
}

/// Cache key for decrypted item keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct ItemKeyId {
    pub share_id: String,
    pub item_id: String,
    pub rotation: i64,
}
