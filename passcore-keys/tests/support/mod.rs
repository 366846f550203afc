//! Shared fixtures for key manager integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use passcore_crypto::{encrypt_symmetric, AssociatedData, SymmetricKey};
use passcore_keys::{
    InMemoryKeyStore, ItemKey, KeyManager, KeyManagerConfig, KeyResult, ShareKey,
    SymmetricKeyProvider,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

pub const USER: &str = "user-1";

static TRACING: Once = Once::new();

/// Installs a test subscriber once per binary. Honors `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn master_key() -> SymmetricKey {
    SymmetricKey::from_bytes([0x4d; 32])
}

/// Deterministic raw share key for a rotation.
pub fn raw_share_key(rotation: i64) -> SymmetricKey {
    SymmetricKey::from_bytes([0x50 + rotation as u8; 32])
}

/// Deterministic raw item key for a rotation.
pub fn raw_item_key(rotation: i64) -> SymmetricKey {
    SymmetricKey::from_bytes([0xa0 + rotation as u8; 32])
}

pub fn wrap_share_key(master: &SymmetricKey, share_id: &str, rotation: i64, key: &SymmetricKey) -> ShareKey {
    ShareKey {
        share_id: share_id.to_string(),
        key_rotation: rotation,
        encrypted_key: encrypt_symmetric(master, key.as_bytes(), AssociatedData::LocalShareKey)
            .expect("wrap share key"),
    }
}

pub fn wrap_item_key(
    share_key: &SymmetricKey,
    share_id: &str,
    item_id: &str,
    rotation: i64,
    key: &SymmetricKey,
) -> ItemKey {
    ItemKey {
        share_id: share_id.to_string(),
        item_id: item_id.to_string(),
        key_rotation: rotation,
        encrypted_key: encrypt_symmetric(share_key, key.as_bytes(), AssociatedData::ItemKey)
            .expect("wrap item key"),
    }
}

/// Provider that counts how often the master key is requested, i.e. how many
/// share key decryptions were attempted.
pub struct CountingKeyProvider {
    key: SymmetricKey,
    calls: AtomicUsize,
}

impl CountingKeyProvider {
    pub fn new(key: SymmetricKey) -> Self {
        Self {
            key,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SymmetricKeyProvider for CountingKeyProvider {
    async fn symmetric_key(&self) -> KeyResult<SymmetricKey> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.key.clone())
    }
}

pub struct Fixture {
    pub store: Arc<InMemoryKeyStore>,
    pub provider: Arc<CountingKeyProvider>,
    pub manager: KeyManager,
}

impl Fixture {
    pub fn new() -> Self {
        Self::build(InMemoryKeyStore::new(), KeyManagerConfig::default())
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self::build(InMemoryKeyStore::with_latency(latency), KeyManagerConfig::default())
    }

    pub fn with_config(config: KeyManagerConfig) -> Self {
        Self::build(InMemoryKeyStore::new(), config)
    }

    fn build(store: InMemoryKeyStore, config: KeyManagerConfig) -> Self {
        init_tracing();
        let store = Arc::new(store);
        let provider = Arc::new(CountingKeyProvider::new(master_key()));
        let manager = KeyManager::new(store.clone(), provider.clone(), config);
        Self {
            store,
            provider,
            manager,
        }
    }

    /// Stores share key `rotation` of `share_id`, wrapped under the master key.
    pub fn add_share_key(&self, share_id: &str, rotation: i64) {
        self.store
            .insert_share_key(wrap_share_key(&master_key(), share_id, rotation, &raw_share_key(rotation)));
    }

    /// Stores item key `rotation`, wrapped under the share key of the same rotation.
    pub fn add_item_key(&self, share_id: &str, item_id: &str, rotation: i64) {
        self.store.insert_item_key(wrap_item_key(
            &raw_share_key(rotation),
            share_id,
            item_id,
            rotation,
            &raw_item_key(rotation),
        ));
    }
}
