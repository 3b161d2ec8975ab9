//! Content addresses
//!
//! An [`Address`] names a record (or an identity) by the digest of its own
//! bytes, tagged with the address algorithm that produced it.
//!
//! ## Wire Format
//!
//! ```text
//! ┌──────────┬───────────────────────────────┐
//! │ algo: u8 │ digest: [u8; digest_len(algo)] │
//! └──────────┴───────────────────────────────┘
//! ```

use crate::crypto::address_algo::{digest_len, PLACEHOLDER_DIGEST};
use crate::error::{GolixError, GolixResult};
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Algorithm-tagged content address.
///
/// Immutable once built; construction fails when the digest length does not
/// match the length declared for `algo`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    algo: u8,
    digest: Vec<u8>,
}

impl Address {
    /// Build an address from an algorithm tag and digest.
    pub fn new(algo: u8, digest: impl Into<Vec<u8>>) -> GolixResult<Self> {
        let digest = digest.into();
        let expected = digest_len(algo).ok_or_else(|| {
            GolixError::Validation(format!("Address algorithm {} is undefined", algo))
        })?;
        if digest.len() != expected {
            return Err(GolixError::Validation(format!(
                "Address digest for algorithm {} must be {} bytes, got {}",
                algo,
                expected,
                digest.len()
            )));
        }
        Ok(Self { algo, digest })
    }

    /// Symbolic algo-0 address, for inspecting layouts and for tests.
    pub fn placeholder() -> Self {
        Self {
            algo: 0,
            digest: PLACEHOLDER_DIGEST.to_vec(),
        }
    }

    /// Random address for the given algorithm.
    ///
    /// Not derived from any content; only useful as a stand-in target in tests
    /// and examples.
    pub fn pseudorandom(algo: u8) -> GolixResult<Self> {
        let len = digest_len(algo).ok_or_else(|| {
            GolixError::Validation(format!("Address algorithm {} is undefined", algo))
        })?;
        let mut digest = vec![0u8; len];
        rand::rng().fill_bytes(&mut digest);
        Ok(Self { algo, digest })
    }

    /// The address algorithm tag.
    pub fn algo(&self) -> u8 {
        self.algo
    }

    /// The raw digest bytes.
    pub fn digest(&self) -> &[u8] {
        &self.digest
    }

    /// Length of the serialized address (tag plus digest).
    pub fn encoded_len(&self) -> usize {
        1 + self.digest.len()
    }

    /// Serialize to wire form: `[algo][digest]`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.encoded_len());
        bytes.push(self.algo);
        bytes.extend_from_slice(&self.digest);
        bytes
    }

    /// Parse an address occupying the whole of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> GolixResult<Self> {
        let (&algo, digest) = bytes
            .split_first()
            .ok_or_else(|| GolixError::Format("Empty address".to_string()))?;
        Self::new(algo, digest).map_err(GolixError::into_format)
    }

    /// URL-safe base64 of the wire form.
    pub fn as_str(&self) -> String {
        URL_SAFE.encode(self.to_bytes())
    }
}

impl std::str::FromStr for Address {
    type Err = GolixError;

    /// Inverse of [`Address::as_str`].
    fn from_str(encoded: &str) -> GolixResult<Self> {
        let raw = URL_SAFE
            .decode(encoded)
            .map_err(|e| GolixError::Format(format!("Invalid address encoding: {}", e)))?;
        Self::from_bytes(&raw)
    }
}

impl std::fmt::Debug for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Address")
            .field("algo", &self.algo)
            .field("digest", &hex::encode(&self.digest))
            .finish()
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let encoded = self.as_str();
        // The first character only reflects the algo byte.
        let short: String = encoded.chars().skip(1).take(8).collect();
        write!(f, "Address({}:{}...)", self.algo, short)
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.as_str())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        encoded.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_mismatch_rejected() {
        let result = Address::new(1, vec![0u8; 32]);
        assert!(result.unwrap_err().is_validation());
    }

    #[test]
    fn test_unknown_algo_rejected() {
        assert!(Address::new(7, vec![0u8; 64]).is_err());
        assert!(Address::pseudorandom(7).is_err());
    }

    #[test]
    fn test_string_roundtrip() {
        let address = Address::pseudorandom(1).unwrap();
        let encoded = address.as_str();
        assert_eq!(encoded.parse::<Address>().unwrap(), address);
    }

    #[test]
    fn test_equality_combines_algo_and_digest() {
        let digest = vec![0x42u8; 64];
        let a = Address::new(0, digest.clone()).unwrap();
        let b = Address::new(1, digest).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_from_bytes_truncated_is_format_error() {
        let mut bytes = Address::pseudorandom(1).unwrap().to_bytes();
        bytes.pop();
        assert!(Address::from_bytes(&bytes).unwrap_err().is_format());
        assert!(Address::from_bytes(&[]).unwrap_err().is_format());
    }

    #[test]
    fn test_serde_roundtrip() {
        let address = Address::placeholder();
        let json = serde_json::to_string(&address).unwrap();
        let recovered: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(address, recovered);
    }

    #[test]
    fn test_display_is_short() {
        let display = format!("{}", Address::pseudorandom(1).unwrap());
        assert!(display.starts_with("Address(1:"));
        assert!(display.len() < 30);
    }
}
