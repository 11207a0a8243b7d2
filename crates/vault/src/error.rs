//! Errors produced by the vault.

use thiserror::Error;

use crate::key::KEY_LEN;
use crate::sealed::MIN_SEALED_LEN;

/// Errors produced by [`crate::AddressVault`] and its key handling.
///
/// The variants separate a misconfigured process (`Configuration`,
/// `Primitive`) from a single bad stored value (`Encoding`,
/// `AuthenticationFailure`).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VaultError {
    /// The symmetric key could not be decoded to exactly [`KEY_LEN`] bytes.
    #[error("invalid encryption key: {0} (expected {KEY_LEN} bytes, base64-encoded)")]
    Configuration(String),

    /// The sealed value is not valid base64 or is shorter than
    /// [`MIN_SEALED_LEN`] bytes once decoded.
    #[error("malformed sealed address: {0}")]
    Encoding(String),

    /// The authentication tag did not verify: tampered data, corrupted
    /// storage, or the wrong key.
    #[error("sealed address failed authentication")]
    AuthenticationFailure,

    /// The random source or the cipher primitive is unusable.
    #[error("cryptographic primitive unavailable: {0}")]
    Primitive(String),
}

impl VaultError {
    /// Returns `true` for errors that concern the process configuration or
    /// environment rather than a particular stored value.
    pub fn is_fatal(&self) -> bool {
        matches!(self, VaultError::Configuration(_) | VaultError::Primitive(_))
    }

    pub(crate) fn too_short(len: usize) -> Self {
        VaultError::Encoding(format!(
            "decoded length {len} is below the minimum of {MIN_SEALED_LEN} bytes"
        ))
    }
}
