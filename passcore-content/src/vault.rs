//! Vault metadata encryption, sealed under the vault's share key.

use crate::error::{CodecError, CodecResult};
use crate::wire;
use base64::{engine::general_purpose::STANDARD, Engine};
use passcore_crypto::{decrypt_symmetric, encrypt_symmetric, AssociatedData};
use passcore_keys::RotatedKey;
use serde::{Deserialize, Serialize};

/// How a vault is shown. `color` and `icon` are palette indices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultDisplay {
    pub color: u32,
    pub icon: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultContent {
    pub name: String,
    pub description: String,
    pub display: VaultDisplay,
}

impl VaultContent {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            display: VaultDisplay::default(),
        }
    }
}

pub struct VaultContentCodec;

impl VaultContentCodec {
    pub fn encrypt<K: RotatedKey + ?Sized>(vault: &VaultContent, share_key: &K) -> CodecResult<String> {
        let plaintext = wire::to_bytes(vault)?;
        let sealed = encrypt_symmetric(share_key.key_data(), &plaintext, AssociatedData::VaultContent)?;
        Ok(STANDARD.encode(sealed))
    }

    pub fn decrypt<K: RotatedKey + ?Sized>(content: &str, share_key: &K) -> CodecResult<VaultContent> {
        let sealed = STANDARD
            .decode(content)
            .map_err(|e| CodecError::MalformedBase64(e.to_string()))?;
        let plaintext = decrypt_symmetric(share_key.key_data(), &sealed, AssociatedData::VaultContent)?;
        wire::from_bytes(&plaintext)
    }
}
