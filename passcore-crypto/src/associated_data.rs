//! Purpose tags bound into every symmetric ciphertext as AEAD associated data.
//!
//! A blob sealed for one purpose never opens under another, so an item key
//! cannot be replayed as item content (or the other way around).

use std::fmt;

/// The purpose a symmetric ciphertext was produced for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssociatedData {
    /// A share key wrapped under the user's master key for local caching.
    LocalShareKey,
    /// An item key wrapped under a share key.
    ItemKey,
    /// Item content sealed under an item (or share) key.
    ItemContent,
    /// Vault metadata sealed under a share key.
    VaultContent,
}

impl AssociatedData {
    pub const ALL: [AssociatedData; 4] = [
        AssociatedData::LocalShareKey,
        AssociatedData::ItemKey,
        AssociatedData::ItemContent,
        AssociatedData::VaultContent,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            AssociatedData::LocalShareKey => "localsharekey",
            AssociatedData::ItemKey => "itemkey",
            AssociatedData::ItemContent => "itemcontent",
            AssociatedData::VaultContent => "vaultcontent",
        }
    }

    /// The fixed byte string authenticated alongside the ciphertext.
    pub const fn as_bytes(self) -> &'static [u8] {
        self.as_str().as_bytes()
    }
}

impl fmt::Display for AssociatedData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
