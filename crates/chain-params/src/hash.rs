//! Block hashes and the header hashing capability

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Length of a block or transaction hash in bytes
pub const HASH_LEN: usize = 32;

/// A 256-bit hash.
///
/// Bytes are held in the order the hash function produced them. Text form is
/// the reversed (big-endian) hex used by block explorers and by the literals
/// compiled into network profiles.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Hash256([u8; HASH_LEN]);

impl Hash256 {
    /// The all-zero hash (previous-block field of a genesis header)
    pub const ZERO: Hash256 = Hash256([0u8; HASH_LEN]);

    /// Wrap raw hash output
    pub const fn from_bytes(bytes: [u8; HASH_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw bytes in hash-output order
    pub const fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }

    /// Big-endian hex, matching the literal convention
    pub fn to_hex(&self) -> String {
        let mut reversed = self.0;
        reversed.reverse();
        hex::encode(reversed)
    }

    /// Parse a big-endian hex literal
    pub fn from_hex(s: &str) -> Result<Self, HashParseError> {
        if s.len() != HASH_LEN * 2 {
            return Err(HashParseError::Length(s.len()));
        }
        let mut bytes = [0u8; HASH_LEN];
        hex::decode_to_slice(s, &mut bytes).map_err(|e| HashParseError::Hex(e.to_string()))?;
        bytes.reverse();
        Ok(Self(bytes))
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash256({})", self.to_hex())
    }
}

impl FromStr for Hash256 {
    type Err = HashParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Hash256 {
    type Error = HashParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl From<Hash256> for String {
    fn from(hash: Hash256) -> Self {
        hash.to_hex()
    }
}

/// Hash literal parse failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HashParseError {
    /// Wrong number of hex characters
    #[error("expected 64 hex characters, got {0}")]
    Length(usize),

    /// Not valid hex
    #[error("invalid hex: {0}")]
    Hex(String),
}

/// The network's block id hash over a serialized header.
///
/// Header hashing is a dependency of this crate, not part of it: networks
/// that use a different proof-of-work hash plug in their own implementation.
pub trait HeaderHasher: Send + Sync {
    /// Hash a serialized header
    fn double_hash(&self, bytes: &[u8]) -> Hash256;
}

impl<T: HeaderHasher + ?Sized> HeaderHasher for &T {
    fn double_hash(&self, bytes: &[u8]) -> Hash256 {
        (**self).double_hash(bytes)
    }
}

/// SHA-256 applied twice
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256d;

impl HeaderHasher for Sha256d {
    fn double_hash(&self, bytes: &[u8]) -> Hash256 {
        let first = Sha256::digest(bytes);
        let second: [u8; HASH_LEN] = Sha256::digest(first).into();
        Hash256(second)
    }
}

/// Proof-of-work hash a network's headers are identified by
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PowHash {
    /// Double SHA-256, provided by [`Sha256d`]
    #[default]
    Sha256d,
    /// The eleven-round X11 chain; supplied by the embedding node
    X11,
}

impl PowHash {
    /// Lowercase algorithm name
    pub fn as_str(&self) -> &'static str {
        match self {
            PowHash::Sha256d => "sha256d",
            PowHash::X11 => "x11",
        }
    }
}

impl fmt::Display for PowHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Header hashers available to the process, keyed by algorithm
#[derive(Default)]
pub struct HasherSet {
    hashers: BTreeMap<PowHash, Box<dyn HeaderHasher>>,
}

impl HasherSet {
    /// Empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set holding only [`Sha256d`]
    pub fn with_sha256d() -> Self {
        let mut set = Self::new();
        set.insert(PowHash::Sha256d, Sha256d);
        set
    }

    /// Register (or replace) the hasher for an algorithm
    pub fn insert<H: HeaderHasher + 'static>(&mut self, algorithm: PowHash, hasher: H) {
        self.hashers.insert(algorithm, Box::new(hasher));
    }

    /// Hasher for an algorithm, if one was registered
    pub fn get(&self, algorithm: PowHash) -> Option<&dyn HeaderHasher> {
        self.hashers.get(&algorithm).map(|h| h.as_ref())
    }

    /// Check if a hasher is registered for an algorithm
    pub fn contains(&self, algorithm: PowHash) -> bool {
        self.hashers.contains_key(&algorithm)
    }
}

impl fmt::Debug for HasherSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.hashers.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_is_reversed() {
        let mut bytes = [0u8; HASH_LEN];
        bytes[0] = 0xab;
        let hash = Hash256::from_bytes(bytes);
        assert!(hash.to_hex().ends_with("ab"));
        assert_eq!(hash.to_hex().parse::<Hash256>().unwrap(), hash);
    }

    #[test]
    fn test_parse_rejects_bad_literals() {
        assert_eq!(Hash256::from_hex("abcd"), Err(HashParseError::Length(4)));
        let not_hex = "zz".repeat(32);
        assert!(matches!(Hash256::from_hex(&not_hex), Err(HashParseError::Hex(_))));
    }

    #[test]
    fn test_sha256d_empty_input() {
        // SHA256(SHA256("")) in hash-output order
        let hash = Sha256d.double_hash(b"");
        assert_eq!(
            hex::encode(hash.as_bytes()),
            "5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456"
        );
    }

    #[test]
    fn test_hasher_set_lookup() {
        struct Fixed;

        impl HeaderHasher for Fixed {
            fn double_hash(&self, _bytes: &[u8]) -> Hash256 {
                Hash256::from_bytes([7; HASH_LEN])
            }
        }

        let mut set = HasherSet::with_sha256d();
        assert!(set.get(PowHash::X11).is_none());
        set.insert(PowHash::X11, Fixed);

        let x11 = set.get(PowHash::X11).unwrap();
        assert_eq!(x11.double_hash(b"abc"), Hash256::from_bytes([7; HASH_LEN]));
        let sha = set.get(PowHash::Sha256d).unwrap();
        assert_eq!(sha.double_hash(b"abc"), Sha256d.double_hash(b"abc"));
        assert_eq!(format!("{set:?}"), "{Sha256d, X11}");
    }

    #[test]
    fn test_pow_hash_names() {
        assert_eq!(serde_json::to_string(&PowHash::X11).unwrap(), "\"x11\"");
        assert_eq!(PowHash::default(), PowHash::Sha256d);
        assert_eq!(PowHash::Sha256d.to_string(), "sha256d");
    }

    #[test]
    fn test_serde_uses_hex_string() {
        let hash = Sha256d.double_hash(b"abc");
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"{}\"", hash.to_hex()));
        let back: Hash256 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hash);
    }
}
