use passcore_content::CodecError;
use passcore_crypto::CryptoError;

#[test]
fn malformed_base64_display() {
    let err = CodecError::MalformedBase64("Invalid byte 37, offset 0.".into());
    assert_eq!(err.to_string(), "malformed base64: Invalid byte 37, offset 0.");
}

#[test]
fn unknown_content_variant_display() {
    let err = CodecError::UnknownContentVariant {
        field: "custom field",
        discriminator: 7,
    };
    assert_eq!(err.to_string(), "unknown custom field variant 7");
}

#[test]
fn unsupported_format_version_display() {
    assert_eq!(
        CodecError::UnsupportedFormatVersion(3).to_string(),
        "unsupported content format version 3"
    );
}

#[test]
fn malformed_display() {
    let err = CodecError::Malformed("unexpected end".into());
    assert_eq!(err.to_string(), "malformed content: unexpected end");
}

#[test]
fn crypto_error_converts() {
    let err: CodecError = CryptoError::AuthenticationFailed.into();
    assert_eq!(err, CodecError::Crypto(CryptoError::AuthenticationFailed));
    assert!(err.to_string().starts_with("crypto error: "));
}
