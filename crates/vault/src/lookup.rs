//! Deterministic lookup keys.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::VaultError;

/// Length of a lookup key in hex characters (SHA-256 = 32 bytes = 64 hex).
pub const LOOKUP_KEY_HEX_LEN: usize = 64;

/// Lowercase hex SHA-256 digest of a wallet address.
///
/// Used as the unique index for user records so the raw address never has
/// to be stored. Equal addresses always map to equal keys.
///
/// Serialises as the bare hex string. Deserialising rejects anything that is
/// not exactly [`LOOKUP_KEY_HEX_LEN`] lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LookupKey(String);

impl LookupKey {
    /// The 64-character hex form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short, non-identifying prefix for log fields.
    pub fn short(&self) -> &str {
        self.0.get(..8).unwrap_or(&self.0)
    }
}

impl TryFrom<String> for LookupKey {
    type Error = VaultError;

    fn try_from(hex: String) -> Result<Self, VaultError> {
        let well_formed = hex.len() == LOOKUP_KEY_HEX_LEN
            && hex.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
        if !well_formed {
            return Err(VaultError::Encoding(format!(
                "lookup key must be {LOOKUP_KEY_HEX_LEN} lowercase hex characters"
            )));
        }
        Ok(Self(hex))
    }
}

impl From<LookupKey> for String {
    fn from(key: LookupKey) -> Self {
        key.0
    }
}

impl std::fmt::Display for LookupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LookupKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Derive the [`LookupKey`] for `address`.
///
/// No validation is applied: any string, including an empty or malformed
/// address, hashes to a key.
pub fn lookup_key(address: &str) -> LookupKey {
    let digest = Sha256::digest(address.as_bytes());
    LookupKey(hex::encode(digest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn known_wallet_digest() {
        let key = lookup_key("7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU");
        assert_eq!(
            key.as_str(),
            "f0f571fa2e7ec7b5470df5574dd1fc2db2929528b7e2c1d625508eb0a5ecff16"
        );
    }

    #[test]
    fn empty_string_digest() {
        assert_eq!(
            lookup_key("").as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn deterministic() {
        let a = lookup_key("So11111111111111111111111111111111111111112");
        let b = lookup_key("So11111111111111111111111111111111111111112");
        assert_eq!(a, b);
    }

    #[test]
    fn fixed_length_lowercase_hex() {
        for input in ["a", "abc", &"x".repeat(10_000), "日本語のアドレス"] {
            let key = lookup_key(input);
            assert_eq!(key.as_str().len(), LOOKUP_KEY_HEX_LEN);
            assert!(key
                .as_str()
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        }
    }

    #[test]
    fn no_collisions_in_sample() {
        let keys: HashSet<LookupKey> = (0..2_000)
            .map(|i| lookup_key(&format!("wallet-{i}")))
            .collect();
        assert_eq!(keys.len(), 2_000);
    }

    #[test]
    fn serialises_as_plain_string() {
        let key = lookup_key("abc");
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(
            json,
            "\"ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad\""
        );
        assert_eq!(key.short(), "ba7816bf");
    }

    #[test]
    fn deserialise_accepts_stored_key() {
        let key: LookupKey = serde_json::from_str(
            "\"f0f571fa2e7ec7b5470df5574dd1fc2db2929528b7e2c1d625508eb0a5ecff16\"",
        )
        .unwrap();
        assert_eq!(key, lookup_key("7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU"));
        assert_eq!(key.short(), "f0f571fa");
    }

    #[test]
    fn deserialise_rejects_malformed_keys() {
        let upper = format!("\"{}\"", "F".repeat(LOOKUP_KEY_HEX_LEN));
        let non_hex = format!("\"{}\"", "g".repeat(LOOKUP_KEY_HEX_LEN));
        let too_long = format!("\"{}\"", "a".repeat(LOOKUP_KEY_HEX_LEN + 1));
        let cases = [
            "\"abc\"",
            "\"\"",
            "\"日本\"",
            upper.as_str(),
            non_hex.as_str(),
            too_long.as_str(),
        ];
        for json in cases {
            assert!(
                serde_json::from_str::<LookupKey>(json).is_err(),
                "accepted {json}"
            );
        }
    }

    #[test]
    fn try_from_reports_encoding_error() {
        let err = LookupKey::try_from("abc".to_owned()).unwrap_err();
        assert!(matches!(err, VaultError::Encoding(_)));
    }
}
