//! Handing a share key to another user.
//!
//! The inviter seals the latest share key to the invitee's public key and
//! signs it. The invitee opens it, checks the inviter's signature and stores
//! the key re-wrapped under their own master key.

use crate::error::KeyResult;
use crate::manager::KeyManager;
use crate::types::ShareKey;
use passcore_crypto::{
    encrypt_symmetric, unwrap_from_sender, wrap_for_recipient, AssociatedData,
    RecipientPublicKey, RecipientSecretKey, SignatureContext, SigningKeyPair, SymmetricKey,
    VerifyingKey,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use zeroize::Zeroizing;

/// Signature context for inviting an existing user to a vault.
pub const VAULT_INVITE_CONTEXT: &str = "pass.invite.vault.existing-user";

/// A share key sealed for one invitee.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteeKey {
    /// Armored envelope from [`wrap_for_recipient`].
    pub key: String,
    pub key_rotation: i64,
}

/// Seals the latest share key of `share_id` for an invitee.
pub async fn seal_latest_share_key_for_invitee(
    manager: &KeyManager,
    user_id: &str,
    share_id: &str,
    recipient: &RecipientPublicKey,
    signer: &SigningKeyPair,
    context: &SignatureContext,
) -> KeyResult<InviteeKey> {
    let share_key = manager.get_latest_share_key(user_id, share_id).await?;
    let key = wrap_for_recipient(
        recipient,
        share_key.key_data().as_bytes(),
        signer,
        context,
    )?;

    info!(
        "sealed share key for share {share_id}, rotation {} for invitee",
        share_key.key_rotation
    );
    Ok(InviteeKey {
        key,
        key_rotation: share_key.key_rotation,
    })
}

/// Opens an invitee key and re-wraps it under `master_key`, ready to be
/// stored as the invitee's own share key.
pub fn accept_invitee_key(
    invitee_key: &InviteeKey,
    share_id: &str,
    recipient: &RecipientSecretKey,
    inviter: &VerifyingKey,
    context: &SignatureContext,
    master_key: &SymmetricKey,
) -> KeyResult<ShareKey> {
    let raw = Zeroizing::new(unwrap_from_sender(
        &invitee_key.key,
        recipient,
        inviter,
        context,
    )?);
    let share_key = SymmetricKey::from_slice(&raw)?;
    let encrypted_key =
        encrypt_symmetric(master_key, share_key.as_bytes(), AssociatedData::LocalShareKey)?;

    Ok(ShareKey {
        share_id: share_id.to_string(),
        key_rotation: invitee_key.key_rotation,
        encrypted_key,
    })
}
