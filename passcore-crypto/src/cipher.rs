//! ChaCha20-Poly1305 authenticated encryption.
//!
//! Every call to [`encrypt`] draws a fresh 96-bit nonce from the OS RNG.
//! Serialized ciphertexts are laid out as `nonce ‖ ciphertext ‖ tag`.

use crate::associated_data::AssociatedData;
use crate::error::{CryptoError, CryptoResult};
use crate::key::SymmetricKey;
use chacha20poly1305::aead::{Aead, AeadCore, KeyInit, OsRng, Payload};
use chacha20poly1305::{ChaCha20Poly1305, Nonce};
use serde::{Deserialize, Serialize};

/// Nonce size in bytes.
pub const NONCE_SIZE: usize = 12;

/// Poly1305 tag size in bytes.
pub const TAG_SIZE: usize = 16;

/// Smallest possible serialized ciphertext (empty plaintext).
pub const MIN_CIPHERTEXT_SIZE: usize = NONCE_SIZE + TAG_SIZE;

/// A nonce plus the AEAD output (ciphertext with appended tag).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedData {
    pub nonce: [u8; NONCE_SIZE],
    pub ciphertext: Vec<u8>,
}

impl EncryptedData {
    /// Serializes as `nonce ‖ ciphertext`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(NONCE_SIZE + self.ciphertext.len());
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Parses the `nonce ‖ ciphertext` layout produced by [`Self::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        if bytes.len() < MIN_CIPHERTEXT_SIZE {
            return Err(CryptoError::MalformedInput(format!(
                "ciphertext is {} bytes, minimum is {MIN_CIPHERTEXT_SIZE}",
                bytes.len()
            )));
        }
        let (nonce_bytes, ciphertext) = bytes.split_at(NONCE_SIZE);
        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(nonce_bytes);
        Ok(Self {
            nonce,
            ciphertext: ciphertext.to_vec(),
        })
    }

    /// Total serialized length.
    pub fn len(&self) -> usize {
        NONCE_SIZE + self.ciphertext.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ciphertext.is_empty()
    }
}

fn cipher_for(key: &SymmetricKey) -> CryptoResult<ChaCha20Poly1305> {
    ChaCha20Poly1305::new_from_slice(key.as_bytes()).map_err(|_| CryptoError::InvalidKeyLength {
        expected: crate::KEY_SIZE,
        actual: key.as_bytes().len(),
    })
}

/// Encrypts `plaintext` for the given purpose under a fresh random nonce.
pub fn encrypt(
    key: &SymmetricKey,
    plaintext: &[u8],
    associated_data: AssociatedData,
) -> CryptoResult<EncryptedData> {
    let cipher = cipher_for(key)?;
    let nonce = ChaCha20Poly1305::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(
            &nonce,
            Payload {
                msg: plaintext,
                aad: associated_data.as_bytes(),
            },
        )
        .map_err(|e| CryptoError::Encryption(format!("{associated_data} seal failed: {e}")))?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    nonce_bytes.copy_from_slice(&nonce);

    Ok(EncryptedData {
        nonce: nonce_bytes,
        ciphertext,
    })
}

/// Decrypts and authenticates data produced by [`encrypt`] for the same purpose.
pub fn decrypt(
    key: &SymmetricKey,
    encrypted: &EncryptedData,
    associated_data: AssociatedData,
) -> CryptoResult<Vec<u8>> {
    if encrypted.ciphertext.len() < TAG_SIZE {
        return Err(CryptoError::MalformedInput(format!(
            "ciphertext body is {} bytes, shorter than the {TAG_SIZE}-byte tag",
            encrypted.ciphertext.len()
        )));
    }

    let cipher = cipher_for(key)?;
    cipher
        .decrypt(
            Nonce::from_slice(&encrypted.nonce),
            Payload {
                msg: &encrypted.ciphertext,
                aad: associated_data.as_bytes(),
            },
        )
        .map_err(|_| CryptoError::AuthenticationFailed)
}

/// Encrypts and serializes to `nonce ‖ ciphertext ‖ tag`.
pub fn encrypt_symmetric(
    key: &SymmetricKey,
    plaintext: &[u8],
    associated_data: AssociatedData,
) -> CryptoResult<Vec<u8>> {
    encrypt(key, plaintext, associated_data).map(|data| data.to_bytes())
}

/// Parses `nonce ‖ ciphertext ‖ tag` and decrypts it.
pub fn decrypt_symmetric(
    key: &SymmetricKey,
    ciphertext: &[u8],
    associated_data: AssociatedData,
) -> CryptoResult<Vec<u8>> {
    let encrypted = EncryptedData::from_bytes(ciphertext)?;
    decrypt(key, &encrypted, associated_data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::generate_random_key;

    #[test]
    fn bytes_layout_roundtrip() {
        let key = generate_random_key();
        let encrypted = encrypt(&key, b"payload", AssociatedData::ItemContent).unwrap();
        let bytes = encrypted.to_bytes();
        assert_eq!(bytes.len(), encrypted.len());
        assert_eq!(&bytes[..NONCE_SIZE], &encrypted.nonce);
        assert_eq!(EncryptedData::from_bytes(&bytes).unwrap(), encrypted);
    }

    #[test]
    fn empty_plaintext_has_minimum_size() {
        let key = generate_random_key();
        let bytes = encrypt_symmetric(&key, b"", AssociatedData::ItemKey).unwrap();
        assert_eq!(bytes.len(), MIN_CIPHERTEXT_SIZE);
        assert!(decrypt_symmetric(&key, &bytes, AssociatedData::ItemKey)
            .unwrap()
            .is_empty());
    }
}
