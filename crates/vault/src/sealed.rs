//! [`SealedAddress`]: the at-rest form of an encrypted wallet address.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::VaultError;

/// Byte length of the GCM initialisation vector.
pub const IV_LEN: usize = 16;

/// Byte length of the GCM authentication tag.
pub const TAG_LEN: usize = 16;

/// Smallest decoded blob that can be opened: IV plus tag, empty ciphertext.
pub const MIN_SEALED_LEN: usize = IV_LEN + TAG_LEN;

/// Base64 text of `iv || tag || ciphertext`.
///
/// Produced by [`crate::AddressVault::seal_address`]; the string is what gets
/// stored next to a user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedAddress(String);

/// Borrowed view of a decoded sealed blob.
pub(crate) struct SealedParts<'a> {
    pub iv: &'a [u8],
    pub tag: &'a [u8],
    pub ciphertext: &'a [u8],
}

impl SealedAddress {
    /// Wrap stored text without validating it. Validation happens on open.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// The base64 text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    pub(crate) fn from_parts(iv: &[u8; IV_LEN], tag: &[u8], ciphertext: &[u8]) -> Self {
        let mut blob = Vec::with_capacity(IV_LEN + tag.len() + ciphertext.len());
        blob.extend_from_slice(iv);
        blob.extend_from_slice(tag);
        blob.extend_from_slice(ciphertext);
        Self(STANDARD.encode(blob))
    }

    /// Decode the base64 text into raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Encoding`] if the text is not base64 or the
    /// decoded blob is shorter than [`MIN_SEALED_LEN`].
    pub(crate) fn decode(&self) -> Result<Vec<u8>, VaultError> {
        let blob = STANDARD
            .decode(self.0.trim())
            .map_err(|e| VaultError::Encoding(format!("not valid base64: {e}")))?;
        if blob.len() < MIN_SEALED_LEN {
            return Err(VaultError::too_short(blob.len()));
        }
        Ok(blob)
    }
}

impl<'a> SealedParts<'a> {
    /// Split a decoded blob per the fixed layout. The caller guarantees
    /// `blob.len() >= MIN_SEALED_LEN`.
    pub(crate) fn split(blob: &'a [u8]) -> Self {
        let (iv, rest) = blob.split_at(IV_LEN);
        let (tag, ciphertext) = rest.split_at(TAG_LEN);
        Self {
            iv,
            tag,
            ciphertext,
        }
    }
}

impl std::fmt::Display for SealedAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SealedAddress {
    fn from(s: String) -> Self {
        Self(s)
    }
}
