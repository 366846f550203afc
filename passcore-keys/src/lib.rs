//! Share and item key management for passcore.
//!
//! [`KeyManager`] turns wrapped keys from an [`EncryptedKeyStore`] into
//! decrypted keys, using the master key from a [`SymmetricKeyProvider`].
//!
//! # Caching
//!
//! Decrypted keys are cached by identity for the session:
//!
//! - share keys by `(share_id, key_rotation)`
//! - item keys by `(share_id, item_id, key_rotation)`, unless disabled in
//!   [`KeyManagerConfig`]
//!
//! Concurrent requests for the same identity are served by one fetch and one
//! decryption. Latest-key lookups always go to the store but are de-duplicated
//! while in flight. [`KeyManager::clear`] drops everything on logout or lock.

mod cache;
pub mod config;
mod error;
mod manager;
pub mod provider;
pub mod sharing;
pub mod store;
mod types;

pub use config::KeyManagerConfig;
pub use error::{KeyError, KeyResult, StoreError};
pub use manager::{unwrap_item_key, KeyManager};
pub use provider::{LockableKeyProvider, StaticKeyProvider, SymmetricKeyProvider};
pub use sharing::{
    accept_invitee_key, seal_latest_share_key_for_invitee, InviteeKey, VAULT_INVITE_CONTEXT,
};
pub use store::{EncryptedKeyStore, InMemoryKeyStore};
pub use types::{
    DecryptedItemKey, DecryptedKey, DecryptedShareKey, ItemKey, KeyIdentity, RotatedKey,
    ShareKey, ShareKind,
};
