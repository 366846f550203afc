//! Signed recipient wrapping for sharing.
//!
//! Uses X25519 key exchange + XSalsa20-Poly1305 (crypto_box) to seal a key
//! for a recipient's public key, with an Ed25519 signature from the sender
//! bound to a signature context. The sealed envelope is serialized as JSON,
//! base64-encoded and armored so it can travel as a plain string.

use crate::error::{CryptoError, CryptoResult};
use base64::{engine::general_purpose::STANDARD, Engine};
use chacha20poly1305::aead::OsRng;
use crypto_box::aead::{Aead, AeadCore};
use crypto_box::{PublicKey, SalsaBox, SecretKey};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey, SIGNATURE_LENGTH};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

pub const ARMOR_HEADER: &str = "-----BEGIN PASSCORE WRAPPED KEY-----";
pub const ARMOR_FOOTER: &str = "-----END PASSCORE WRAPPED KEY-----";

const ENVELOPE_VERSION: u8 = 1;

/// X25519 keypair a user publishes so others can wrap keys for them.
///
/// The secret key implements `ZeroizeOnDrop` automatically (from crypto_box).
pub struct RecipientKeyPair {
    pub secret: SecretKey,
    pub public: PublicKey,
}

impl RecipientKeyPair {
    pub fn generate() -> Self {
        let secret = SecretKey::generate(&mut OsRng);
        let public = secret.public_key();
        Self { secret, public }
    }

    /// Returns the public key as raw 32-byte array.
    pub fn public_bytes(&self) -> [u8; 32] {
        *self.public.as_bytes()
    }

    /// Reconstructs a keypair from raw secret key bytes.
    pub fn from_secret_bytes(bytes: [u8; 32]) -> Self {
        let secret = SecretKey::from(bytes);
        let public = secret.public_key();
        Self { secret, public }
    }
}

/// Ed25519 keypair used to sign wrapped keys.
pub struct SigningKeyPair {
    signing: SigningKey,
}

impl SigningKeyPair {
    pub fn generate() -> Self {
        Self {
            signing: SigningKey::generate(&mut OsRng),
        }
    }

    pub fn from_secret_bytes(bytes: [u8; 32]) -> Self {
        Self {
            signing: SigningKey::from_bytes(&bytes),
        }
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing.verifying_key()
    }

    fn sign(&self, message: &[u8]) -> Signature {
        self.signing.sign(message)
    }
}

/// Domain string the signature is bound to, e.g. the vault invitation flow.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignatureContext(pub String);

impl SignatureContext {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Serialize, Deserialize)]
struct WrappedEnvelope {
    version: u8,
    ephemeral_public_key: [u8; 32],
    nonce: [u8; 24],
    /// Sealed `plaintext ‖ signature`.
    ciphertext: Vec<u8>,
    context: SignatureContext,
}

/// Message covered by the signature: `len(context) ‖ context ‖ plaintext`.
fn signed_message(context: &SignatureContext, plaintext: &[u8]) -> Vec<u8> {
    let context = context.as_str().as_bytes();
    let mut message = Vec::with_capacity(4 + context.len() + plaintext.len());
    message.extend_from_slice(&(context.len() as u32).to_be_bytes());
    message.extend_from_slice(context);
    message.extend_from_slice(plaintext);
    message
}

/// Signs `plaintext` under `context` and seals it for `recipient`.
///
/// A fresh ephemeral X25519 key and nonce are generated for every call.
pub fn wrap_for_recipient(
    recipient: &PublicKey,
    plaintext: &[u8],
    signer: &SigningKeyPair,
    context: &SignatureContext,
) -> CryptoResult<String> {
    let mut message = signed_message(context, plaintext);
    let signature = signer.sign(&message);
    message.zeroize();

    let mut payload = Vec::with_capacity(plaintext.len() + SIGNATURE_LENGTH);
    payload.extend_from_slice(plaintext);
    payload.extend_from_slice(&signature.to_bytes());

    let ephemeral = SecretKey::generate(&mut OsRng);
    let salsa_box = SalsaBox::new(recipient, &ephemeral);
    let nonce = SalsaBox::generate_nonce(&mut OsRng);

    let sealed = salsa_box.encrypt(&nonce, payload.as_slice());
    payload.zeroize();
    let ciphertext =
        sealed.map_err(|e| CryptoError::Encryption(format!("recipient wrap failed: {e}")))?;

    let mut nonce_bytes = [0u8; 24];
    nonce_bytes.copy_from_slice(&nonce);

    let envelope = WrappedEnvelope {
        version: ENVELOPE_VERSION,
        ephemeral_public_key: *ephemeral.public_key().as_bytes(),
        nonce: nonce_bytes,
        ciphertext,
        context: context.clone(),
    };
    let json = serde_json::to_vec(&envelope)
        .map_err(|e| CryptoError::Encryption(format!("envelope serialization failed: {e}")))?;

    Ok(format!("{ARMOR_HEADER}\n{}\n{ARMOR_FOOTER}", STANDARD.encode(json)))
}

fn dearmor(armored: &str) -> CryptoResult<Vec<u8>> {
    let body = armored
        .trim()
        .strip_prefix(ARMOR_HEADER)
        .and_then(|rest| rest.strip_suffix(ARMOR_FOOTER))
        .ok_or_else(|| CryptoError::MalformedInput("missing armor header or footer".into()))?;

    let compact: String = body.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD
        .decode(compact)
        .map_err(|e| CryptoError::MalformedInput(format!("invalid armored base64: {e}")))
}

/// Opens an armored envelope produced by [`wrap_for_recipient`] and verifies
/// the sender's signature under the expected context.
pub fn unwrap_from_sender(
    armored: &str,
    recipient: &SecretKey,
    sender: &VerifyingKey,
    context: &SignatureContext,
) -> CryptoResult<Vec<u8>> {
    let json = dearmor(armored)?;
    let envelope: WrappedEnvelope = serde_json::from_slice(&json)
        .map_err(|e| CryptoError::MalformedInput(format!("invalid envelope: {e}")))?;

    if envelope.version != ENVELOPE_VERSION {
        return Err(CryptoError::MalformedInput(format!(
            "unsupported envelope version {}",
            envelope.version
        )));
    }
    if envelope.context != *context {
        return Err(CryptoError::ContextMismatch {
            expected: context.as_str().to_string(),
            actual: envelope.context.as_str().to_string(),
        });
    }

    let ephemeral = PublicKey::from(envelope.ephemeral_public_key);
    let salsa_box = SalsaBox::new(&ephemeral, recipient);
    let mut payload = salsa_box
        .decrypt(
            crypto_box::Nonce::from_slice(&envelope.nonce),
            envelope.ciphertext.as_slice(),
        )
        .map_err(|_| CryptoError::AuthenticationFailed)?;

    if payload.len() < SIGNATURE_LENGTH {
        payload.zeroize();
        return Err(CryptoError::MalformedInput(
            "wrapped payload shorter than a signature".into(),
        ));
    }

    let split = payload.len() - SIGNATURE_LENGTH;
    let mut signature_bytes = [0u8; SIGNATURE_LENGTH];
    signature_bytes.copy_from_slice(&payload[split..]);
    let signature = Signature::from_bytes(&signature_bytes);
    payload.truncate(split);

    let mut message = signed_message(context, &payload);
    let verified = sender.verify(&message, &signature);
    message.zeroize();

    if let Err(e) = verified {
        payload.zeroize();
        return Err(CryptoError::Signature(e.to_string()));
    }
    Ok(payload)
}
