//! Content codec error types.

use passcore_crypto::CryptoError;
use thiserror::Error;

pub type CodecResult<T> = Result<T, CodecError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("malformed base64: {0}")]
    MalformedBase64(String),

    #[error("unknown {field} variant {discriminator}")]
    UnknownContentVariant {
        field: &'static str,
        discriminator: u32,
    },

    #[error("unsupported content format version {0}")]
    UnsupportedFormatVersion(u8),

    #[error("malformed content: {0}")]
    Malformed(String),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
}
