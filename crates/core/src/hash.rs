//! SHA-256 fingerprints for content-addressed cache keys

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Separator fed before every key, keeps `("ab","c")` apart from `("a","bc")`
const KEY_TAG: &[u8] = b"KEY";
/// Separator fed before every value
const VAL_TAG: &[u8] = b"VAL";

/// A SHA-256 fingerprint (32 bytes)
#[derive(Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Create a new Fingerprint from bytes
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the fingerprint as a byte slice
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to lowercase hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string
    ///
    /// Returns `None` for anything that is not exactly 64 hex characters.
    pub fn from_hex(hex_str: &str) -> Option<Self> {
        if hex_str.len() != 64 {
            return None;
        }

        let mut bytes = [0u8; 32];
        hex::decode_to_slice(hex_str, &mut bytes).ok()?;
        Some(Self(bytes))
    }
}

impl std::fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Fingerprint a mapping of named string parameters
///
/// Keys are visited in lexicographic order, so the result does not depend on
/// insertion order. Each pair contributes `KEY`, key bytes, `VAL`, value bytes.
pub fn fingerprint<K, V>(properties: &BTreeMap<K, V>) -> Fingerprint
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut hasher = Sha256::new();
    for (key, value) in properties {
        hasher.update(KEY_TAG);
        hasher.update(key.as_ref().as_bytes());
        hasher.update(VAL_TAG);
        hasher.update(value.as_ref().as_bytes());
    }
    Fingerprint::from_bytes(hasher.finalize().into())
}

/// Fingerprint an unordered list of `(key, value)` pairs
///
/// Pairs are collected into a sorted map first; a repeated key keeps its last value.
pub fn fingerprint_pairs<'a, I>(pairs: I) -> Fingerprint
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let properties: BTreeMap<&str, &str> = pairs.into_iter().collect();
    fingerprint(&properties)
}
