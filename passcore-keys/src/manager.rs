//! The key manager: the only way the rest of the client obtains usable keys.
//!
//! Share keys are unwrapped with the master key from the
//! [`SymmetricKeyProvider`]; item keys are unwrapped with the share key of the
//! same rotation. Every decrypted key is cached by identity and decrypted at
//! most once at a time, no matter how many list rows ask for it concurrently.

use crate::cache::KeyTable;
use crate::config::KeyManagerConfig;
use crate::error::{KeyError, KeyResult};
use crate::provider::SymmetricKeyProvider;
use crate::store::EncryptedKeyStore;
use crate::types::{
    DecryptedItemKey, DecryptedKey, DecryptedShareKey, ItemKey, ItemKeyId, KeyIdentity,
    LatestShareKeyId, ShareKey, ShareKeyId, ShareKind,
};
use futures::future::try_join_all;
use passcore_crypto::{decrypt_symmetric, AssociatedData, SymmetricKey};
use std::sync::Arc;
use tracing::{debug, info, trace};
use zeroize::Zeroizing;

/// Retrieves, decrypts and caches share and item keys.
///
/// Cloning is cheap and clones share caches. All methods must be called from
/// within a tokio runtime.
#[derive(Clone)]
pub struct KeyManager {
    inner: Arc<Inner>,
}

struct Inner {
    store: Arc<dyn EncryptedKeyStore>,
    provider: Arc<dyn SymmetricKeyProvider>,
    share_keys: KeyTable<ShareKeyId, DecryptedShareKey>,
    latest_share_keys: KeyTable<LatestShareKeyId, DecryptedShareKey>,
    item_keys: KeyTable<ItemKeyId, DecryptedItemKey>,
}

impl KeyManager {
    pub fn new(
        store: Arc<dyn EncryptedKeyStore>,
        provider: Arc<dyn SymmetricKeyProvider>,
        config: KeyManagerConfig,
    ) -> Self {
        let item_keys = if config.cache_item_keys {
            KeyTable::retaining()
        } else {
            KeyTable::single_flight_only()
        };

        Self {
            inner: Arc::new(Inner {
                store,
                provider,
                share_keys: KeyTable::retaining(),
                latest_share_keys: KeyTable::single_flight_only(),
                item_keys,
            }),
        }
    }

    /// Share key of an exact rotation, used to open content sealed at that
    /// rotation.
    pub async fn get_share_key(
        &self,
        user_id: &str,
        share_id: &str,
        key_rotation: i64,
    ) -> KeyResult<DecryptedShareKey> {
        self.inner.share_key(user_id, share_id, key_rotation).await
    }

    /// Share key with the highest rotation. Always consults the store so a
    /// freshly rotated key is picked up.
    pub async fn get_latest_share_key(
        &self,
        user_id: &str,
        share_id: &str,
    ) -> KeyResult<DecryptedShareKey> {
        self.inner.latest_share_key(user_id, share_id).await
    }

    /// Every item key of an item, ascending by rotation.
    pub async fn get_item_keys(
        &self,
        user_id: &str,
        share_id: &str,
        item_id: &str,
    ) -> KeyResult<Vec<DecryptedItemKey>> {
        trace!("getting all item keys for item {item_id} in share {share_id}");
        let mut wrapped = self
            .inner
            .store
            .get_all_item_keys(user_id, share_id, item_id)
            .await?;
        wrapped.sort_by_key(|key| key.key_rotation);

        let count = wrapped.len();
        let keys = try_join_all(
            wrapped
                .into_iter()
                .map(|key| self.inner.item_key(user_id, key)),
        )
        .await?;
        trace!("resolved {count} item keys for item {item_id} in share {share_id}");
        Ok(keys)
    }

    /// Item key with the highest rotation, used to seal new content.
    ///
    /// Only the latest rotation is unwrapped.
    pub async fn get_latest_item_key(
        &self,
        user_id: &str,
        share_id: &str,
        item_id: &str,
    ) -> KeyResult<DecryptedItemKey> {
        trace!("getting latest item key for item {item_id} in share {share_id}");
        let wrapped = self
            .inner
            .store
            .get_latest_item_key(user_id, share_id, item_id)
            .await?;
        self.inner.item_key(user_id, wrapped).await
    }

    /// Item key of an exact rotation.
    pub async fn get_item_key(
        &self,
        user_id: &str,
        share_id: &str,
        item_id: &str,
        key_rotation: i64,
    ) -> KeyResult<DecryptedItemKey> {
        let id = ItemKeyId {
            share_id: share_id.to_string(),
            item_id: item_id.to_string(),
            rotation: key_rotation,
        };
        if let Some(key) = self.inner.item_keys.get(&id) {
            return Ok(key);
        }

        let wrapped = self
            .inner
            .store
            .get_all_item_keys(user_id, share_id, item_id)
            .await?
            .into_iter()
            .find(|key| key.key_rotation == key_rotation)
            .ok_or_else(|| {
                KeyError::KeyNotFound(KeyIdentity::item(share_id, item_id, Some(key_rotation)))
            })?;
        self.inner.item_key(user_id, wrapped).await
    }

    /// Keys that can open an item's content, depending on how the item is
    /// shared: item keys for a vault share, the share's own keys for an
    /// item share.
    pub async fn get_content_keys(
        &self,
        user_id: &str,
        share_kind: ShareKind,
        share_id: &str,
        item_id: &str,
    ) -> KeyResult<Vec<DecryptedKey>> {
        match share_kind {
            ShareKind::Vault => Ok(self
                .get_item_keys(user_id, share_id, item_id)
                .await?
                .into_iter()
                .map(DecryptedKey::Item)
                .collect()),
            ShareKind::Item => Ok(self
                .inner
                .all_share_keys(user_id, share_id)
                .await?
                .into_iter()
                .map(DecryptedKey::Share)
                .collect()),
            ShareKind::Unknown(raw) => Err(KeyError::UnknownShareType(raw)),
        }
    }

    /// Forgets every decrypted key. Called on logout and lock.
    pub fn clear(&self) {
        self.inner.share_keys.clear();
        self.inner.latest_share_keys.clear();
        self.inner.item_keys.clear();
        info!("cleared decrypted key caches");
    }

    pub fn cached_share_keys(&self) -> usize {
        self.inner.share_keys.len()
    }

    pub fn cached_item_keys(&self) -> usize {
        self.inner.item_keys.len()
    }
}

impl Inner {
    // No logging on this path: it runs for every item being decrypted.
    async fn share_key(
        self: &Arc<Self>,
        user_id: &str,
        share_id: &str,
        key_rotation: i64,
    ) -> KeyResult<DecryptedShareKey> {
        let id = ShareKeyId {
            share_id: share_id.to_string(),
            rotation: key_rotation,
        };
        self.share_keys
            .get_or_run(id, || {
                let inner = Arc::clone(self);
                let user_id = user_id.to_string();
                let share_id = share_id.to_string();
                async move {
                    let wrapped = inner
                        .fetch_share_key(&user_id, &share_id, key_rotation)
                        .await?;
                    inner.decrypt_share_key(&wrapped).await
                }
            })
            .await
    }

    async fn latest_share_key(
        self: &Arc<Self>,
        user_id: &str,
        share_id: &str,
    ) -> KeyResult<DecryptedShareKey> {
        let id = LatestShareKeyId {
            user_id: user_id.to_string(),
            share_id: share_id.to_string(),
        };
        self.latest_share_keys
            .get_or_run(id, || {
                let inner = Arc::clone(self);
                let user_id = user_id.to_string();
                let share_id = share_id.to_string();
                async move {
                    let latest = inner
                        .store
                        .get_share_keys(&user_id, &share_id)
                        .await?
                        .into_iter()
                        .filter(|key| key.share_id == share_id)
                        .max_by_key(|key| key.key_rotation)
                        .ok_or_else(|| KeyError::KeyNotFound(KeyIdentity::share(&share_id, None)))?;
                    inner.share_key_from(latest).await
                }
            })
            .await
    }

    /// Every share key of a share, ascending by rotation.
    async fn all_share_keys(
        self: &Arc<Self>,
        user_id: &str,
        share_id: &str,
    ) -> KeyResult<Vec<DecryptedShareKey>> {
        let mut wrapped = self.store.get_share_keys(user_id, share_id).await?;
        wrapped.retain(|key| key.share_id == share_id);
        wrapped.sort_by_key(|key| key.key_rotation);
        try_join_all(wrapped.into_iter().map(|key| self.share_key_from(key))).await
    }

    /// Decrypts already-fetched wrapped material through the shared cache, so
    /// a rotation that is cached or in flight is not decrypted again.
    async fn share_key_from(self: &Arc<Self>, wrapped: ShareKey) -> KeyResult<DecryptedShareKey> {
        let id = ShareKeyId {
            share_id: wrapped.share_id.clone(),
            rotation: wrapped.key_rotation,
        };
        self.share_keys
            .get_or_run(id, || {
                let inner = Arc::clone(self);
                async move { inner.decrypt_share_key(&wrapped).await }
            })
            .await
    }

    async fn item_key(self: &Arc<Self>, user_id: &str, wrapped: ItemKey) -> KeyResult<DecryptedItemKey> {
        let id = ItemKeyId {
            share_id: wrapped.share_id.clone(),
            item_id: wrapped.item_id.clone(),
            rotation: wrapped.key_rotation,
        };
        self.item_keys
            .get_or_run(id, || {
                let inner = Arc::clone(self);
                let user_id = user_id.to_string();
                async move {
                    let share_key = inner
                        .share_key(&user_id, &wrapped.share_id, wrapped.key_rotation)
                        .await?;
                    unwrap_item_key(&share_key, &wrapped)
                }
            })
            .await
    }

    async fn fetch_share_key(
        &self,
        user_id: &str,
        share_id: &str,
        key_rotation: i64,
    ) -> KeyResult<ShareKey> {
        trace!("fetching share keys for share {share_id}");
        self.store
            .get_share_keys(user_id, share_id)
            .await?
            .into_iter()
            .find(|key| key.share_id == share_id && key.key_rotation == key_rotation)
            .ok_or_else(|| KeyError::KeyNotFound(KeyIdentity::share(share_id, Some(key_rotation))))
    }

    async fn decrypt_share_key(&self, wrapped: &ShareKey) -> KeyResult<DecryptedShareKey> {
        let master = self.provider.symmetric_key().await?;
        let key_data = unwrap_key(&master, &wrapped.encrypted_key, AssociatedData::LocalShareKey)?;
        debug!(
            "decrypted share key for share {}, rotation {}",
            wrapped.share_id, wrapped.key_rotation
        );
        Ok(DecryptedShareKey::new(
            wrapped.share_id.clone(),
            wrapped.key_rotation,
            key_data,
        ))
    }
}

fn unwrap_key(
    parent: &SymmetricKey,
    encrypted_key: &[u8],
    associated_data: AssociatedData,
) -> KeyResult<SymmetricKey> {
    let bytes = Zeroizing::new(decrypt_symmetric(parent, encrypted_key, associated_data)?);
    Ok(SymmetricKey::from_slice(&bytes)?)
}

/// Unwraps an item key with its share key.
///
/// The share key must belong to the item's share and have the item key's
/// rotation. There is no fallback to another rotation.
pub fn unwrap_item_key(
    share_key: &DecryptedShareKey,
    wrapped: &ItemKey,
) -> KeyResult<DecryptedItemKey> {
    if share_key.share_id != wrapped.share_id || share_key.key_rotation != wrapped.key_rotation {
        return Err(KeyError::ParentKeyMismatch {
            item: KeyIdentity::item(&wrapped.share_id, &wrapped.item_id, Some(wrapped.key_rotation)),
            parent: share_key.identity(),
        });
    }

    let key_data = unwrap_key(
        share_key.key_data(),
        &wrapped.encrypted_key,
        AssociatedData::ItemKey,
    )?;
    Ok(DecryptedItemKey::new(
        wrapped.share_id.clone(),
        wrapped.item_id.clone(),
        wrapped.key_rotation,
        key_data,
    ))
}
