//! [`SymmetricKey`]: the process-wide AES-256 key.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::VaultError;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Publicly known development key (`folio-svc-insecure-dev-key-00000`).
///
/// Anything sealed under this key is readable by anyone who has read this
/// file. The service only accepts it when explicitly told to.
pub const DEV_FALLBACK_KEY_B64: &str = "Zm9saW8tc3ZjLWluc2VjdXJlLWRldi1rZXktMDAwMDA=";

/// Fixed-size key buffer holding exactly [`KEY_LEN`] bytes.
///
/// Zeroed on drop. The `Debug` impl never prints key material.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey(Box<[u8; KEY_LEN]>);

impl SymmetricKey {
    /// Build a key from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Configuration`] if `bytes` is not [`KEY_LEN`] long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, VaultError> {
        if bytes.len() != KEY_LEN {
            return Err(VaultError::Configuration(format!(
                "decoded to {} bytes",
                bytes.len()
            )));
        }
        let mut buf = Box::new([0u8; KEY_LEN]);
        buf.copy_from_slice(bytes);
        Ok(Self(buf))
    }

    /// Decode a standard-alphabet base64 key, as found in `ENCRYPTION_KEY`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Configuration`] if the text is not base64 or
    /// does not decode to [`KEY_LEN`] bytes.
    pub fn from_base64(encoded: &str) -> Result<Self, VaultError> {
        let mut decoded = STANDARD
            .decode(encoded.trim())
            .map_err(|e| VaultError::Configuration(format!("not valid base64: {e}")))?;
        let key = Self::from_bytes(&decoded);
        decoded.zeroize();
        key
    }

    /// The well-known development key. See [`DEV_FALLBACK_KEY_B64`].
    pub fn dev_fallback() -> Self {
        let mut buf = Box::new([0u8; KEY_LEN]);
        buf.copy_from_slice(b"folio-svc-insecure-dev-key-00000");
        Self(buf)
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0[..]
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SymmetricKey([REDACTED])")
    }
}
