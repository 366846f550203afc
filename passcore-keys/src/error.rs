//! Key management error types.

use crate::types::KeyIdentity;
use passcore_crypto::CryptoError;
use thiserror::Error;

/// Result type for key operations.
pub type KeyResult<T> = Result<T, KeyError>;

/// Failures reported by an [`EncryptedKeyStore`](crate::store::EncryptedKeyStore).
/// Passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("network error: {0}")]
    Network(String),

    #[error("not found: {0}")]
    NotFound(String),
}

/// Errors that can occur while obtaining decrypted keys.
///
/// `Clone` because one in-flight decryption reports its outcome to every
/// waiting caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("key not found: {0}")]
    KeyNotFound(KeyIdentity),

    #[error("symmetric key unavailable (session locked)")]
    KeyUnavailable,

    #[error("key store error: {0}")]
    Store(#[from] StoreError),

    #[error("{item} cannot be unwrapped with {parent}")]
    ParentKeyMismatch {
        item: KeyIdentity,
        parent: KeyIdentity,
    },

    #[error("unknown share type {0}")]
    UnknownShareType(i64),

    #[error("key task failed: {0}")]
    Internal(String),
}
