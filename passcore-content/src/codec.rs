//! Item content encryption.
//!
//! ```text
//! ItemContent ──postcard──▶ bytes ──ChaCha20-Poly1305("itemcontent")──▶ base64
//! ```

use crate::config::{CodecConfig, UnknownFieldPolicy};
use crate::error::{CodecError, CodecResult};
use crate::model::{
    CustomField, CustomFieldKind, ItemContent, ItemContentData, ItemContentType, LoginData,
};
use crate::wire::{self, WireExtraField, WireItem, WireLogin, WireMetadata, CONTENT_FORMAT_VERSION};
use base64::{engine::general_purpose::STANDARD, Engine};
use passcore_crypto::{decrypt_symmetric, encrypt_symmetric, AssociatedData, SymmetricKey};
use passcore_keys::RotatedKey;
use tracing::warn;
use zeroize::Zeroizing;

/// Seals and opens item content.
#[derive(Clone, Debug, Default)]
pub struct ItemContentCodec {
    config: CodecConfig,
}

impl ItemContentCodec {
    pub fn new(config: CodecConfig) -> CodecResult<Self> {
        if config.content_format_version != CONTENT_FORMAT_VERSION {
            return Err(CodecError::UnsupportedFormatVersion(
                config.content_format_version,
            ));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn format_version(&self) -> u8 {
        self.config.content_format_version
    }

    /// Encrypts under a decrypted share or item key.
    pub fn encrypt<K: RotatedKey + ?Sized>(&self, item: &ItemContent, key: &K) -> CodecResult<String> {
        self.encrypt_with_key(item, key.key_data())
    }

    /// Decrypts content sealed under a decrypted share or item key.
    pub fn decrypt<K: RotatedKey + ?Sized>(&self, content: &str, key: &K) -> CodecResult<ItemContent> {
        self.decrypt_with_key(content, key.key_data())
    }

    /// Encrypts to base64. Never byte-stable: every call uses a fresh nonce.
    pub fn encrypt_with_key(&self, item: &ItemContent, key: &SymmetricKey) -> CodecResult<String> {
        let plaintext = Zeroizing::new(self.to_bytes(item)?);
        let sealed = encrypt_symmetric(key, &plaintext, AssociatedData::ItemContent)?;
        Ok(STANDARD.encode(sealed))
    }

    pub fn decrypt_with_key(&self, content: &str, key: &SymmetricKey) -> CodecResult<ItemContent> {
        let sealed = STANDARD
            .decode(content)
            .map_err(|e| CodecError::MalformedBase64(e.to_string()))?;
        let plaintext = Zeroizing::new(decrypt_symmetric(key, &sealed, AssociatedData::ItemContent)?);
        self.from_bytes(&plaintext)
    }

    /// Plaintext wire form of `item`.
    pub fn to_bytes(&self, item: &ItemContent) -> CodecResult<Vec<u8>> {
        let content_body = match &item.data {
            ItemContentData::Login(login) => wire::to_bytes(&WireLogin {
                username: login.username.clone(),
                password: login.password.clone(),
                totp_uri: login.totp_uri.clone(),
                urls: login.urls.clone(),
            })?,
            ItemContentData::Alias | ItemContentData::Note => Vec::new(),
        };

        let wire_item = WireItem {
            format_version: self.config.content_format_version,
            metadata: WireMetadata {
                name: item.name.clone(),
                note: item.note.clone(),
                item_uuid: item.item_uuid.clone(),
            },
            content_kind: item.content_type().discriminator(),
            content_body,
            extra_fields: item
                .custom_fields
                .iter()
                .map(|field| WireExtraField {
                    name: field.title.clone(),
                    kind: field.kind.discriminator(),
                    value: field.content.clone(),
                })
                .collect(),
        };
        wire::to_bytes(&wire_item)
    }

    /// Parses the plaintext wire form.
    pub fn from_bytes(&self, bytes: &[u8]) -> CodecResult<ItemContent> {
        let version = wire::peek_format_version(bytes)?;
        if version != CONTENT_FORMAT_VERSION {
            return Err(CodecError::UnsupportedFormatVersion(version));
        }

        let wire_item: WireItem = wire::from_bytes(bytes)?;
        let content_type = ItemContentType::from_discriminator(wire_item.content_kind).ok_or(
            CodecError::UnknownContentVariant {
                field: "content",
                discriminator: wire_item.content_kind,
            },
        )?;

        let data = match content_type {
            ItemContentType::Login => {
                let login: WireLogin = wire::from_bytes(&wire_item.content_body)?;
                ItemContentData::Login(LoginData {
                    username: login.username,
                    password: login.password,
                    totp_uri: login.totp_uri,
                    urls: login.urls,
                })
            }
            ItemContentType::Alias => ItemContentData::Alias,
            ItemContentType::Note => ItemContentData::Note,
        };

        let custom_fields = wire_item
            .extra_fields
            .into_iter()
            .map(|field| self.custom_field(field))
            .collect::<CodecResult<Vec<_>>>()?;

        Ok(ItemContent {
            item_uuid: wire_item.metadata.item_uuid,
            name: wire_item.metadata.name,
            note: wire_item.metadata.note,
            data,
            custom_fields,
        })
    }

    fn custom_field(&self, field: WireExtraField) -> CodecResult<CustomField> {
        match CustomFieldKind::from_discriminator(field.kind) {
            Some(kind) => Ok(CustomField {
                title: field.name,
                kind,
                content: field.value,
            }),
            None => match self.config.unknown_custom_field {
                UnknownFieldPolicy::Reject => Err(CodecError::UnknownContentVariant {
                    field: "custom field",
                    discriminator: field.kind,
                }),
                UnknownFieldPolicy::FallbackToText => {
                    warn!(
                        "reading custom field of unknown kind {} as empty text",
                        field.kind
                    );
                    Ok(CustomField {
                        title: field.name,
                        kind: CustomFieldKind::Text,
                        content: String::new(),
                    })
                }
            },
        }
    }
}
