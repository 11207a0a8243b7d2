//! [`AddressVault`]: lookup-key derivation plus AES-256-GCM seal/open.

use std::sync::Arc;

use aes_gcm::{
    aead::{
        consts::U16, generic_array::GenericArray, rand_core::RngCore, AeadInPlace, KeyInit, OsRng,
    },
    aes::Aes256,
    AesGcm,
};
use zeroize::Zeroize;

use crate::error::VaultError;
use crate::key::SymmetricKey;
use crate::lookup::{lookup_key, LookupKey};
use crate::sealed::{SealedAddress, SealedParts, IV_LEN};

/// AES-256-GCM with a 128-bit IV, matching the stored format.
type Aes256Gcm16 = AesGcm<Aes256, U16>;

const SELF_TEST_PROBE: &str = "folio-svc:self-test";

/// Derives lookup keys and seals/opens wallet addresses under one key.
///
/// The key is fixed at construction and never exposed again. Clones share
/// the same expanded cipher, so an `AddressVault` can be handed to every
/// request handler without copying key material.
#[derive(Clone)]
pub struct AddressVault {
    cipher: Arc<Aes256Gcm16>,
}

impl AddressVault {
    /// Build a vault around `key`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Configuration`] if the cipher rejects the key
    /// (unreachable for a well-formed [`SymmetricKey`]).
    pub fn new(key: &SymmetricKey) -> Result<Self, VaultError> {
        let cipher = Aes256Gcm16::new_from_slice(key.as_bytes())
            .map_err(|_| VaultError::Configuration("rejected by AES-256-GCM".into()))?;
        Ok(Self {
            cipher: Arc::new(cipher),
        })
    }

    /// Non-reversible index key for `address`. See [`lookup_key`].
    pub fn derive_lookup_key(&self, address: &str) -> LookupKey {
        lookup_key(address)
    }

    /// Encrypt `address` under a fresh random IV.
    ///
    /// Two calls with the same address return different values; both open
    /// to the same address.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Primitive`] if the OS random source fails or the
    /// cipher refuses the input. Either means the environment is broken.
    pub fn seal_address(&self, address: &str) -> Result<SealedAddress, VaultError> {
        let mut iv = [0u8; IV_LEN];
        OsRng
            .try_fill_bytes(&mut iv)
            .map_err(|e| VaultError::Primitive(format!("OS random source: {e}")))?;

        let mut buffer = address.as_bytes().to_vec();
        let tag = self
            .cipher
            .encrypt_in_place_detached(GenericArray::from_slice(&iv), b"", &mut buffer)
            .map_err(|_| VaultError::Primitive("AES-256-GCM encryption failed".into()))?;

        Ok(SealedAddress::from_parts(&iv, tag.as_slice(), &buffer))
    }

    /// Decrypt a [`SealedAddress`] back to the wallet address.
    ///
    /// # Errors
    ///
    /// - [`VaultError::Encoding`] if the value is not base64, decodes to fewer
    ///   than 32 bytes, or the authenticated plaintext is not UTF-8.
    /// - [`VaultError::AuthenticationFailure`] if the tag does not verify.
    ///   No plaintext is returned in that case.
    pub fn open_sealed_address(&self, sealed: &SealedAddress) -> Result<String, VaultError> {
        let blob = sealed.decode()?;
        let parts = SealedParts::split(&blob);

        let mut buffer = parts.ciphertext.to_vec();
        if self
            .cipher
            .decrypt_in_place_detached(
                GenericArray::from_slice(parts.iv),
                b"",
                &mut buffer,
                GenericArray::from_slice(parts.tag),
            )
            .is_err()
        {
            buffer.zeroize();
            return Err(VaultError::AuthenticationFailure);
        }

        String::from_utf8(buffer).map_err(|e| {
            let mut bytes = e.into_bytes();
            bytes.zeroize();
            VaultError::Encoding("authenticated plaintext is not UTF-8".into())
        })
    }

    /// Seal and reopen a fixed probe value.
    ///
    /// Run once at startup so a broken key or random source stops the
    /// process before any record is written.
    ///
    /// # Errors
    ///
    /// Propagates any [`VaultError`] from sealing or opening, and reports
    /// [`VaultError::Primitive`] if the round trip returns a different value.
    pub fn self_test(&self) -> Result<(), VaultError> {
        let sealed = self.seal_address(SELF_TEST_PROBE)?;
        let opened = self.open_sealed_address(&sealed)?;
        if opened != SELF_TEST_PROBE {
            return Err(VaultError::Primitive("seal/open round trip mismatch".into()));
        }
        Ok(())
    }
}

impl std::fmt::Debug for AddressVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AddressVault([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KEY_LEN;
    use crate::sealed::{MIN_SEALED_LEN, TAG_LEN};
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use proptest::prelude::*;

    const WALLET: &str = "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU";

    /// Written by Node `aes-256-gcm` under the dev key with IV = 00 01 .. 0f.
    const NODE_SEALED_WALLET: &str = "AAECAwQFBgcICQoLDA0ODy7NLN7GMv6stCSdNfjJaCEqoqEBKOn/2eE+v6HLy+z4l3Nx7PBJqdXxGuRLPp8IKvoC/A1JzxexoFRJvw==";

    /// Node output for the empty string under the dev key with IV = 07 * 16.
    const NODE_SEALED_EMPTY: &str = "BwcHBwcHBwcHBwcHBwcHB3zG0zurFJ5GAADVQ3OqGaI=";

    fn random_vault() -> AddressVault {
        let mut key = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut key);
        AddressVault::new(&SymmetricKey::from_bytes(&key).unwrap()).unwrap()
    }

    fn dev_vault() -> AddressVault {
        AddressVault::new(&SymmetricKey::dev_fallback()).unwrap()
    }

    fn flip_byte(sealed: &SealedAddress, index: usize) -> SealedAddress {
        let mut blob = STANDARD.decode(sealed.as_str()).unwrap();
        blob[index] ^= 0x01;
        SealedAddress::new(STANDARD.encode(blob))
    }

    #[test]
    fn seal_open_round_trip() {
        let vault = random_vault();
        let sealed = vault.seal_address(WALLET).unwrap();
        assert_eq!(vault.open_sealed_address(&sealed).unwrap(), WALLET);
    }

    #[test]
    fn sealed_length_is_iv_tag_plus_plaintext() {
        let vault = random_vault();
        let sealed = vault.seal_address(WALLET).unwrap();
        let blob = STANDARD.decode(sealed.as_str()).unwrap();
        assert_eq!(blob.len(), MIN_SEALED_LEN + WALLET.len());
    }

    #[test]
    fn sealing_is_not_deterministic() {
        let vault = random_vault();
        let a = vault.seal_address(WALLET).unwrap();
        let b = vault.seal_address(WALLET).unwrap();
        assert_ne!(a, b);
        assert_eq!(vault.open_sealed_address(&a).unwrap(), WALLET);
        assert_eq!(vault.open_sealed_address(&b).unwrap(), WALLET);
    }

    #[test]
    fn opens_value_written_by_node() {
        let vault = dev_vault();
        let opened = vault
            .open_sealed_address(&SealedAddress::new(NODE_SEALED_WALLET))
            .unwrap();
        assert_eq!(opened, WALLET);
    }

    #[test]
    fn opens_empty_plaintext_written_by_node() {
        let vault = dev_vault();
        let opened = vault
            .open_sealed_address(&SealedAddress::new(NODE_SEALED_EMPTY))
            .unwrap();
        assert_eq!(opened, "");
    }

    #[test]
    fn every_tag_and_ciphertext_byte_is_authenticated() {
        let vault = random_vault();
        let sealed = vault.seal_address(WALLET).unwrap();
        let blob_len = MIN_SEALED_LEN + WALLET.len();
        for index in IV_LEN..blob_len {
            let tampered = flip_byte(&sealed, index);
            assert_eq!(
                vault.open_sealed_address(&tampered),
                Err(VaultError::AuthenticationFailure),
                "byte {index} was not authenticated"
            );
        }
    }

    #[test]
    fn tampered_iv_fails_auth() {
        let vault = random_vault();
        let sealed = vault.seal_address(WALLET).unwrap();
        let tampered = flip_byte(&sealed, 0);
        assert_eq!(
            vault.open_sealed_address(&tampered),
            Err(VaultError::AuthenticationFailure)
        );
    }

    #[test]
    fn wrong_key_fails_auth() {
        let sealed = random_vault().seal_address(WALLET).unwrap();
        assert_eq!(
            random_vault().open_sealed_address(&sealed),
            Err(VaultError::AuthenticationFailure)
        );
    }

    #[test]
    fn truncated_tag_is_rejected() {
        let vault = random_vault();
        let sealed = vault.seal_address("").unwrap();
        let blob = STANDARD.decode(sealed.as_str()).unwrap();
        assert_eq!(blob.len(), IV_LEN + TAG_LEN);

        let short = SealedAddress::new(STANDARD.encode(&blob[..blob.len() - 1]));
        assert!(matches!(
            vault.open_sealed_address(&short),
            Err(VaultError::Encoding(_))
        ));
    }

    #[test]
    fn undersized_inputs_report_encoding_error() {
        let vault = random_vault();
        for len in [0usize, 1, 16, 31] {
            let sealed = SealedAddress::new(STANDARD.encode(vec![0u8; len]));
            assert!(
                matches!(vault.open_sealed_address(&sealed), Err(VaultError::Encoding(_))),
                "length {len}"
            );
        }
    }

    #[test]
    fn malformed_base64_reports_encoding_error() {
        let vault = random_vault();
        let result = vault.open_sealed_address(&SealedAddress::new("%%%"));
        assert!(matches!(result, Err(VaultError::Encoding(_))));
    }

    #[test]
    fn lookup_key_is_independent_of_vault_key() {
        assert_eq!(
            random_vault().derive_lookup_key(WALLET),
            random_vault().derive_lookup_key(WALLET)
        );
    }

    #[test]
    fn self_test_passes() {
        random_vault().self_test().unwrap();
    }

    #[test]
    fn vault_redacted_in_debug() {
        assert!(format!("{:?}", random_vault()).contains("REDACTED"));
    }

    #[test]
    fn vault_is_shareable_across_threads() {
        let vault = random_vault();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let vault = vault.clone();
                std::thread::spawn(move || {
                    let address = format!("wallet-{i}");
                    let sealed = vault.seal_address(&address).unwrap();
                    vault.open_sealed_address(&sealed).unwrap() == address
                })
            })
            .collect();
        for h in handles {
            assert!(h.join().unwrap());
        }
    }

    proptest! {
        #[test]
        fn round_trip_arbitrary_strings(address in ".*") {
            let vault = dev_vault();
            let sealed = vault.seal_address(&address).unwrap();
            prop_assert_eq!(vault.open_sealed_address(&sealed).unwrap(), address);
        }

        #[test]
        fn lookup_key_deterministic(address in ".*") {
            let vault = dev_vault();
            prop_assert_eq!(vault.derive_lookup_key(&address), vault.derive_lookup_key(&address));
        }

        #[test]
        fn distinct_addresses_distinct_keys(a in "[1-9A-HJ-NP-Za-km-z]{32,44}", b in "[1-9A-HJ-NP-Za-km-z]{32,44}") {
            prop_assume!(a != b);
            prop_assert_ne!(lookup_key(&a), lookup_key(&b));
        }
    }
}
