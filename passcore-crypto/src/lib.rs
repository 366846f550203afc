//! Cryptographic primitives for the passcore key hierarchy.
//!
//! Provides:
//! - ChaCha20-Poly1305 authenticated encryption with purpose tags
//! - Zeroizing 256-bit symmetric keys
//! - Signed recipient wrapping (X25519 + XSalsa20-Poly1305, Ed25519) for sharing
//!
//! # Architecture
//!
//! Keys are layered:
//!
//! 1. **Master key**: held by the user session, wraps locally cached share keys.
//! 2. **Share key**: one per vault and key rotation, wraps item keys.
//! 3. **Item key**: one per item and key rotation, seals the item content.
//!
//! Every symmetric ciphertext authenticates an [`AssociatedData`] tag naming
//! its purpose, so a blob sealed for one layer cannot be opened as another.

mod associated_data;
mod cipher;
pub mod envelope;
mod error;
mod key;

pub use associated_data::AssociatedData;
pub use cipher::{
    decrypt, decrypt_symmetric, encrypt, encrypt_symmetric, EncryptedData, MIN_CIPHERTEXT_SIZE,
    NONCE_SIZE, TAG_SIZE,
};
pub use envelope::{
    unwrap_from_sender, wrap_for_recipient, RecipientKeyPair, SignatureContext, SigningKeyPair,
};
pub use error::{CryptoError, CryptoResult};
pub use key::{generate_random_key, SymmetricKey, KEY_SIZE};

pub use crypto_box::{PublicKey as RecipientPublicKey, SecretKey as RecipientSecretKey};
pub use ed25519_dalek::VerifyingKey;
