//! Wrapped key storage.
//!
//! The key manager reads wrapped share and item keys through
//! [`EncryptedKeyStore`]. Real implementations sit on top of a local cache
//! with network fallback; [`InMemoryKeyStore`] backs tests and embedded use.

use crate::error::StoreError;
use crate::types::{ItemKey, ShareKey};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tracing::trace;

/// Source of wrapped key material.
///
/// Implementations return the freshest set they know of. A rotation missing
/// from the result is treated as absent, never as stale.
#[async_trait]
pub trait EncryptedKeyStore: Send + Sync {
    /// All wrapped share keys (every rotation) for a share.
    async fn get_share_keys(
        &self,
        user_id: &str,
        share_id: &str,
    ) -> Result<Vec<ShareKey>, StoreError>;

    /// All wrapped item keys (every rotation) for an item.
    async fn get_all_item_keys(
        &self,
        user_id: &str,
        share_id: &str,
        item_id: &str,
    ) -> Result<Vec<ItemKey>, StoreError>;

    /// The wrapped item key with the highest rotation.
    async fn get_latest_item_key(
        &self,
        user_id: &str,
        share_id: &str,
        item_id: &str,
    ) -> Result<ItemKey, StoreError>;
}

/// In-memory wrapped key store with fetch counters.
///
/// Keys are not partitioned by user.
#[derive(Default)]
pub struct InMemoryKeyStore {
    share_keys: Mutex<HashMap<String, Vec<ShareKey>>>,
    item_keys: Mutex<HashMap<(String, String), Vec<ItemKey>>>,
    latency: Option<Duration>,
    offline: AtomicBool,
    share_key_fetches: AtomicUsize,
    item_key_fetches: AtomicUsize,
}

impl InMemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every fetch, to simulate a network round trip.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    pub fn insert_share_key(&self, key: ShareKey) {
        self.share_keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key.share_id.clone())
            .or_default()
            .push(key);
    }

    pub fn insert_item_key(&self, key: ItemKey) {
        self.item_keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry((key.share_id.clone(), key.item_id.clone()))
            .or_default()
            .push(key);
    }

    /// While offline every fetch fails with `StoreError::Network`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of `get_share_keys` calls served so far.
    pub fn share_key_fetches(&self) -> usize {
        self.share_key_fetches.load(Ordering::SeqCst)
    }

    /// Number of item key calls (all or latest) served so far.
    pub fn item_key_fetches(&self) -> usize {
        self.item_key_fetches.load(Ordering::SeqCst)
    }

    async fn simulate_network(&self) -> Result<(), StoreError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Network("key store offline".to_string()));
        }
        Ok(())
    }

    fn item_keys_for(&self, share_id: &str, item_id: &str) -> Vec<ItemKey> {
        self.item_keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(share_id.to_string(), item_id.to_string()))
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl EncryptedKeyStore for InMemoryKeyStore {
    async fn get_share_keys(
        &self,
        _user_id: &str,
        share_id: &str,
    ) -> Result<Vec<ShareKey>, StoreError> {
        self.share_key_fetches.fetch_add(1, Ordering::SeqCst);
        self.simulate_network().await?;
        trace!("serving share keys for share {share_id}");

        Ok(self
            .share_keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(share_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_all_item_keys(
        &self,
        _user_id: &str,
        share_id: &str,
        item_id: &str,
    ) -> Result<Vec<ItemKey>, StoreError> {
        self.item_key_fetches.fetch_add(1, Ordering::SeqCst);
        self.simulate_network().await?;
        Ok(self.item_keys_for(share_id, item_id))
    }

    async fn get_latest_item_key(
        &self,
        _user_id: &str,
        share_id: &str,
        item_id: &str,
    ) -> Result<ItemKey, StoreError> {
        self.item_key_fetches.fetch_add(1, Ordering::SeqCst);
        self.simulate_network().await?;
        self.item_keys_for(share_id, item_id)
            .into_iter()
            .max_by_key(|key| key.key_rotation)
            .ok_or_else(|| StoreError::NotFound(format!("item keys for item {item_id}")))
    }
}
