use passcore_crypto::SymmetricKey;
use passcore_keys::{KeyError, LockableKeyProvider, StaticKeyProvider, SymmetricKeyProvider};
use tokio_test::{assert_err, assert_ok, block_on};

fn key(byte: u8) -> SymmetricKey {
    SymmetricKey::from_bytes([byte; 32])
}

#[test]
fn static_provider_always_returns_its_key() {
    let provider = StaticKeyProvider::new(key(7));
    let first = assert_ok!(block_on(provider.symmetric_key()));
    let second = assert_ok!(block_on(provider.symmetric_key()));
    assert_eq!(first.as_bytes(), &[7; 32]);
    assert_eq!(first.as_bytes(), second.as_bytes());
}

#[test]
fn lockable_provider_starts_locked() {
    let provider = LockableKeyProvider::new();
    assert!(!provider.is_unlocked());
    let err = assert_err!(block_on(provider.symmetric_key()));
    assert_eq!(err, KeyError::KeyUnavailable);
}

#[test]
fn lockable_provider_unlock_then_lock() {
    let provider = LockableKeyProvider::new();

    provider.unlock(key(3));
    assert!(provider.is_unlocked());
    let unlocked = assert_ok!(block_on(provider.symmetric_key()));
    assert_eq!(unlocked.as_bytes(), &[3; 32]);

    provider.lock();
    assert!(!provider.is_unlocked());
    assert_err!(block_on(provider.symmetric_key()));
}

#[test]
fn unlock_replaces_previous_key() {
    let provider = LockableKeyProvider::new();
    provider.unlock(key(1));
    provider.unlock(key(2));
    let current = assert_ok!(block_on(provider.symmetric_key()));
    assert_eq!(current.as_bytes(), &[2; 32]);
}

#[tokio::test]
async fn providers_are_usable_as_trait_objects() {
    let providers: Vec<Box<dyn SymmetricKeyProvider>> = vec![
        Box::new(StaticKeyProvider::new(key(9))),
        Box::new(LockableKeyProvider::new()),
    ];

    assert!(providers[0].symmetric_key().await.is_ok());
    assert!(providers[1].symmetric_key().await.is_err());
}
