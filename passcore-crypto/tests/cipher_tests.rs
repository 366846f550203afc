//! Adversarial tests for ChaCha20-Poly1305 sealing.
//!
//! Covers wrong keys, cross-purpose substitution, tampering, truncation and
//! nonce freshness. Every layer of the key hierarchy relies on these.

use passcore_crypto::{
    decrypt, decrypt_symmetric, encrypt, encrypt_symmetric, generate_random_key, AssociatedData,
    CryptoError, SymmetricKey, MIN_CIPHERTEXT_SIZE, NONCE_SIZE,
};
use std::collections::HashSet;

// ── Round trip ──

#[test]
fn encrypt_decrypt_roundtrip_for_every_purpose() {
    let key = generate_random_key();
    for ad in AssociatedData::ALL {
        let sealed = encrypt_symmetric(&key, b"vault payload", ad).unwrap();
        assert_eq!(decrypt_symmetric(&key, &sealed, ad).unwrap(), b"vault payload");
    }
}

#[test]
fn structured_roundtrip() {
    let key = generate_random_key();
    let encrypted = encrypt(&key, b"structured", AssociatedData::ItemContent).unwrap();
    assert_eq!(
        decrypt(&key, &encrypted, AssociatedData::ItemContent).unwrap(),
        b"structured"
    );
}

// ── Wrong key / wrong purpose ──

#[test]
fn wrong_key_is_authentication_failure() {
    let key_a = generate_random_key();
    let key_b = generate_random_key();

    let sealed = encrypt_symmetric(&key_a, b"secret", AssociatedData::ItemKey).unwrap();
    let err = decrypt_symmetric(&key_b, &sealed, AssociatedData::ItemKey).unwrap_err();

    assert_eq!(err, CryptoError::AuthenticationFailed);
}

#[test]
fn cross_purpose_substitution_is_rejected() {
    let key = generate_random_key();
    for sealed_for in AssociatedData::ALL {
        let sealed = encrypt_symmetric(&key, b"blob", sealed_for).unwrap();
        for opened_as in AssociatedData::ALL {
            let result = decrypt_symmetric(&key, &sealed, opened_as);
            if sealed_for == opened_as {
                assert!(result.is_ok());
            } else {
                assert_eq!(
                    result.unwrap_err(),
                    CryptoError::AuthenticationFailed,
                    "{sealed_for} must not open as {opened_as}"
                );
            }
        }
    }
}

// ── Tampering ──

#[test]
fn every_single_bit_flip_is_detected() {
    let key = generate_random_key();
    let sealed = encrypt_symmetric(&key, b"integrity-protected", AssociatedData::ItemContent).unwrap();

    for byte in 0..sealed.len() {
        for bit in 0..8 {
            let mut tampered = sealed.clone();
            tampered[byte] ^= 1 << bit;
            assert_eq!(
                decrypt_symmetric(&key, &tampered, AssociatedData::ItemContent).unwrap_err(),
                CryptoError::AuthenticationFailed,
                "bit {bit} of byte {byte} flipped without detection"
            );
        }
    }
}

#[test]
fn appended_bytes_are_detected() {
    let key = generate_random_key();
    let mut sealed = encrypt_symmetric(&key, b"data", AssociatedData::ItemKey).unwrap();
    sealed.push(0);
    assert_eq!(
        decrypt_symmetric(&key, &sealed, AssociatedData::ItemKey).unwrap_err(),
        CryptoError::AuthenticationFailed
    );
}

// ── Truncation ──

#[test]
fn input_shorter_than_nonce_and_tag_is_malformed() {
    let key = generate_random_key();
    for len in [0, 1, NONCE_SIZE, MIN_CIPHERTEXT_SIZE - 1] {
        let err = decrypt_symmetric(&key, &vec![0u8; len], AssociatedData::ItemKey).unwrap_err();
        assert!(
            matches!(err, CryptoError::MalformedInput(_)),
            "len {len} should be malformed, got {err:?}"
        );
    }
}

#[test]
fn truncated_ciphertext_fails() {
    let key = generate_random_key();
    let sealed = encrypt_symmetric(&key, b"a longer payload here", AssociatedData::ItemKey).unwrap();
    let truncated = &sealed[..sealed.len() - 1];
    assert_eq!(
        decrypt_symmetric(&key, truncated, AssociatedData::ItemKey).unwrap_err(),
        CryptoError::AuthenticationFailed
    );
}

// ── Nonce freshness ──

#[test]
fn repeated_encryption_never_repeats_nonce_or_ciphertext() {
    let key = generate_random_key();
    let mut nonces = HashSet::new();
    let mut ciphertexts = HashSet::new();

    for _ in 0..500 {
        let sealed = encrypt_symmetric(&key, b"same plaintext", AssociatedData::ItemContent).unwrap();
        assert!(nonces.insert(sealed[..NONCE_SIZE].to_vec()), "nonce reused");
        assert!(ciphertexts.insert(sealed), "ciphertext repeated");
    }
}

// ── Known key ──

#[test]
fn fixed_key_decrypts_its_own_output() {
    let key = SymmetricKey::from_bytes([0x42; 32]);
    let sealed = encrypt_symmetric(&key, b"known", AssociatedData::LocalShareKey).unwrap();
    let same_key = SymmetricKey::from_slice(&[0x42; 32]).unwrap();
    assert_eq!(
        decrypt_symmetric(&same_key, &sealed, AssociatedData::LocalShareKey).unwrap(),
        b"known"
    );
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn seal_open_always_roundtrips(plaintext in proptest::collection::vec(any::<u8>(), 0..512)) {
            let key = generate_random_key();
            let sealed = encrypt_symmetric(&key, &plaintext, AssociatedData::ItemContent).unwrap();
            prop_assert_eq!(
                decrypt_symmetric(&key, &sealed, AssociatedData::ItemContent).unwrap(),
                plaintext
            );
        }
    }
}
