//! Item content model and its encrypted representation.
//!
//! [`ItemContentCodec`] turns [`ItemContent`] into base64 ciphertext sealed
//! under an item (or share) key and back. Decoding is strict: unknown content
//! kinds and format versions are errors, and unknown custom field kinds are
//! too unless [`CodecConfig`] opts into the text fallback.

mod codec;
pub mod config;
mod error;
mod model;
mod request;
mod vault;
mod wire;

pub use codec::ItemContentCodec;
pub use config::{CodecConfig, UnknownFieldPolicy};
pub use error::{CodecError, CodecResult};
pub use model::{
    filter_by_type, CustomField, CustomFieldKind, ItemContent, ItemContentData, ItemContentType,
    LoginData,
};
pub use request::{seal_item_update, seal_new_item, CreateItemRequest, UpdateItemRequest};
pub use vault::{VaultContent, VaultContentCodec, VaultDisplay};
pub use wire::CONTENT_FORMAT_VERSION;
