//! Key manager configuration.

use serde::{Deserialize, Serialize};

/// Configuration for [`KeyManager`](crate::KeyManager).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyManagerConfig {
    /// Keep decrypted item keys for the lifetime of the session.
    ///
    /// Share keys are always cached. With this off, item keys are still
    /// de-duplicated while in flight but unwrapped again on every request.
    #[serde(default = "default_cache_item_keys")]
    pub cache_item_keys: bool,
}

fn default_cache_item_keys() -> bool {
    true
}

impl Default for KeyManagerConfig {
    fn default() -> Self {
        Self {
            cache_item_keys: default_cache_item_keys(),
        }
    }
}
