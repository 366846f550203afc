//! Codec configuration.

use crate::wire::CONTENT_FORMAT_VERSION;
use serde::{Deserialize, Serialize};

/// What to do with a custom field whose kind this build does not know.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownFieldPolicy {
    /// Fail decoding with `CodecError::UnknownContentVariant`.
    #[default]
    Reject,
    /// Read the field as empty text and keep going.
    FallbackToText,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    #[serde(default)]
    pub unknown_custom_field: UnknownFieldPolicy,

    /// Format version written into new content. Must be one this build can
    /// read.
    #[serde(default = "default_content_format_version")]
    pub content_format_version: u8,
}

fn default_content_format_version() -> u8 {
    CONTENT_FORMAT_VERSION
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            unknown_custom_field: UnknownFieldPolicy::default(),
            content_format_version: default_content_format_version(),
        }
    }
}
