//! Wallet address pseudonymisation.
//!
//! A wallet address is never persisted verbatim. Instead the record layer
//! receives two derived values from an [`AddressVault`]:
//!
//! - a [`LookupKey`]: `hex(sha256(address))`, deterministic, used as the
//!   unique index of a user record;
//! - a [`SealedAddress`]: an AES-256-GCM ciphertext of the address that can
//!   be opened again with the process key.
//!
//! # Sealed format
//!
//! ```text
//! base64( iv[16] || tag[16] || ciphertext[len(address)] )
//! ```
//!
//! The layout is byte-compatible with values written by Node's
//! `crypto.createCipheriv("aes-256-gcm", key, iv)` with a 16-byte IV.

pub mod error;
pub mod key;
pub mod lookup;
pub mod sealed;

mod address_vault;

pub use address_vault::AddressVault;
pub use error::VaultError;
pub use key::{SymmetricKey, DEV_FALLBACK_KEY_B64, KEY_LEN};
pub use lookup::{lookup_key, LookupKey, LOOKUP_KEY_HEX_LEN};
pub use sealed::{SealedAddress, IV_LEN, MIN_SEALED_LEN, TAG_LEN};
