//! Sealing item content into create and update request bodies.
//!
//! A new item gets a fresh item key: the content is sealed under it and the
//! key itself is wrapped under the latest share key. Updates reuse the
//! latest item key.

use crate::codec::ItemContentCodec;
use crate::error::CodecResult;
use crate::model::ItemContent;
use base64::{engine::general_purpose::STANDARD, Engine};
use passcore_crypto::{encrypt_symmetric, generate_random_key, AssociatedData};
use passcore_keys::{DecryptedShareKey, RotatedKey};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    /// Rotation of the share key that wraps `item_key`.
    pub key_rotation: i64,
    pub content_format_version: u8,
    /// Base64 content sealed under the new item key.
    pub content: String,
    /// Base64 item key wrapped under the share key.
    pub item_key: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    pub key_rotation: i64,
    pub content_format_version: u8,
    pub content: String,
}

pub fn seal_new_item(
    codec: &ItemContentCodec,
    item: &ItemContent,
    share_key: &DecryptedShareKey,
) -> CodecResult<CreateItemRequest> {
    let item_key = generate_random_key();
    let content = codec.encrypt_with_key(item, &item_key)?;
    let wrapped = encrypt_symmetric(share_key.key_data(), item_key.as_bytes(), AssociatedData::ItemKey)?;

    debug!(
        "sealed new {} item for share {}, rotation {}",
        item.content_type(),
        share_key.share_id,
        share_key.key_rotation
    );
    Ok(CreateItemRequest {
        key_rotation: share_key.key_rotation,
        content_format_version: codec.format_version(),
        content,
        item_key: STANDARD.encode(wrapped),
    })
}

/// Seals edited content under `item_key`, normally the item's latest key.
pub fn seal_item_update<K: RotatedKey + ?Sized>(
    codec: &ItemContentCodec,
    item: &ItemContent,
    item_key: &K,
) -> CodecResult<UpdateItemRequest> {
    Ok(UpdateItemRequest {
        key_rotation: item_key.key_rotation(),
        content_format_version: codec.format_version(),
        content: codec.encrypt(item, item_key)?,
    })
}
