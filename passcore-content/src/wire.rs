//! Serialized item content layout (postcard).
//!
//! `format_version` is the first field so it can be read before the rest.
//! Discriminators are raw integers here and mapped to the closed model enums
//! by the codec.

use crate::error::{CodecError, CodecResult};
use serde::{Deserialize, Serialize};

pub const CONTENT_FORMAT_VERSION: u8 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct WireItem {
    pub format_version: u8,
    pub metadata: WireMetadata,
    pub content_kind: u32,
    /// Postcard-encoded type body; empty for kinds without one.
    pub content_body: Vec<u8>,
    pub extra_fields: Vec<WireExtraField>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct WireMetadata {
    pub name: String,
    pub note: String,
    pub item_uuid: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct WireLogin {
    pub username: String,
    pub password: String,
    pub totp_uri: String,
    pub urls: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct WireExtraField {
    pub name: String,
    pub kind: u32,
    pub value: String,
}

pub(crate) fn to_bytes<T: Serialize>(value: &T) -> CodecResult<Vec<u8>> {
    postcard::to_allocvec(value).map_err(|e| CodecError::Malformed(format!("encode failed: {e}")))
}

pub(crate) fn from_bytes<'a, T: Deserialize<'a>>(bytes: &'a [u8]) -> CodecResult<T> {
    postcard::from_bytes(bytes).map_err(|e| CodecError::Malformed(e.to_string()))
}

/// Reads the leading format version without decoding the rest.
pub(crate) fn peek_format_version(bytes: &[u8]) -> CodecResult<u8> {
    postcard::take_from_bytes::<u8>(bytes)
        .map(|(version, _)| version)
        .map_err(|e| CodecError::Malformed(format!("missing format version: {e}")))
}
