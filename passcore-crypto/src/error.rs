//! Crypto error types.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur in cryptographic operations.
///
/// Errors are `Clone` so that a single failed decryption can be reported to
/// every caller waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// The AEAD tag did not verify: wrong key, wrong purpose tag, or tampered data.
    #[error("authentication failed (wrong key or tampered data)")]
    AuthenticationFailed,

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("signature verification failed: {0}")]
    Signature(String),

    #[error("signature context mismatch: expected {expected:?}, got {actual:?}")]
    ContextMismatch { expected: String, actual: String },
}
