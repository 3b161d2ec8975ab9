//! Symmetric container secrets
//!
//! A [`Secret`] carries the key (and, for some suites, a seed) that encrypts
//! exactly one container. It zeroizes on drop; callers should let it go as
//! soon as the container is built or read.
//!
//! ## Wire Format
//!
//! ```text
//! ┌───────────┬──────────────┬────────────┬─────────────┬──────────────┐
//! │ magic "SH"│ version: u16 │ cipher: u8 │ key[suite]  │ seed[suite]  │
//! └───────────┴──────────────┴────────────┴─────────────┴──────────────┘
//! ```

use crate::crypto::{component_lengths_for, CipherSuite, ComponentLengths};
use crate::error::{GolixError, GolixResult};
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Magic prefix of a serialized secret.
pub const SECRET_MAGIC: &[u8; 2] = b"SH";

/// Current secret wire version.
pub const SECRET_VERSION: u16 = 2;

const HEADER_LEN: usize = 2 + 2 + 1;

/// Symmetric key and seed bound to a cipher suite.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Secret {
    cipher: u8,
    key: Vec<u8>,
    seed: Vec<u8>,
}

fn lengths_for(cipher: u8) -> GolixResult<ComponentLengths> {
    component_lengths_for(cipher)
        .ok_or_else(|| GolixError::Validation(format!("Unknown cipher suite {}", cipher)))
}

impl Secret {
    /// Build a secret, validating key and seed lengths against the suite.
    pub fn new(cipher: u8, key: Vec<u8>, seed: Vec<u8>) -> GolixResult<Self> {
        // Wrap first so rejected material is still wiped
        let key = Zeroizing::new(key);
        let seed = Zeroizing::new(seed);
        let lengths = lengths_for(cipher)?;
        if key.len() != lengths.key {
            return Err(GolixError::Validation(format!(
                "Secret key for cipher {} must be {} bytes, got {}",
                cipher,
                lengths.key,
                key.len()
            )));
        }
        if seed.len() != lengths.seed {
            return Err(GolixError::Validation(format!(
                "Secret seed for cipher {} must be {} bytes, got {}",
                cipher,
                lengths.seed,
                seed.len()
            )));
        }
        Ok(Self {
            cipher,
            key: key.to_vec(),
            seed: seed.to_vec(),
        })
    }

    /// Fresh random secret sized for `suite`.
    pub fn generate(suite: &dyn CipherSuite) -> Self {
        let lengths = suite.lengths();
        let mut key = vec![0u8; lengths.key];
        let mut seed = vec![0u8; lengths.seed];
        rand::rng().fill_bytes(&mut key);
        rand::rng().fill_bytes(&mut seed);
        Self {
            cipher: suite.id(),
            key,
            seed,
        }
    }

    /// Cipher suite tag.
    pub fn cipher(&self) -> u8 {
        self.cipher
    }

    /// Key bytes.
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// Seed bytes (empty for suites without one).
    pub fn seed(&self) -> &[u8] {
        &self.seed
    }

    /// Key as a fixed 32-byte array, for AEAD constructors.
    pub(crate) fn key_array(&self) -> GolixResult<Zeroizing<[u8; 32]>> {
        let mut array = Zeroizing::new([0u8; 32]);
        if self.key.len() != array.len() {
            return Err(GolixError::Validation(format!(
                "Secret key must be 32 bytes for this suite, got {}",
                self.key.len()
            )));
        }
        array.copy_from_slice(&self.key);
        Ok(array)
    }

    /// Serialized length.
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN + self.key.len() + self.seed.len()
    }

    /// Serialize to wire form. The buffer is wiped when dropped.
    pub fn to_bytes(&self) -> Zeroizing<Vec<u8>> {
        let mut bytes = Zeroizing::new(Vec::with_capacity(self.encoded_len()));
        bytes.extend_from_slice(SECRET_MAGIC);
        bytes.extend_from_slice(&SECRET_VERSION.to_be_bytes());
        bytes.push(self.cipher);
        bytes.extend_from_slice(&self.key);
        bytes.extend_from_slice(&self.seed);
        bytes
    }

    /// Parse a secret occupying the whole of `bytes`.
    ///
    /// # Errors
    ///
    /// [`GolixError::Format`] for bad magic, version, cipher or length.
    pub fn from_bytes(bytes: &[u8]) -> GolixResult<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(GolixError::Format(format!(
                "Secret too short: {} bytes",
                bytes.len()
            )));
        }
        if &bytes[..2] != SECRET_MAGIC {
            return Err(GolixError::Format("Invalid secret magic".to_string()));
        }
        let version = u16::from_be_bytes([bytes[2], bytes[3]]);
        if version != SECRET_VERSION {
            return Err(GolixError::Format(format!(
                "Unsupported secret version {}",
                version
            )));
        }
        let cipher = bytes[4];
        let lengths = lengths_for(cipher).map_err(GolixError::into_format)?;
        let body = &bytes[HEADER_LEN..];
        if body.len() != lengths.key + lengths.seed {
            return Err(GolixError::Format(format!(
                "Secret body for cipher {} must be {} bytes, got {}",
                cipher,
                lengths.key + lengths.seed,
                body.len()
            )));
        }
        let (key, seed) = body.split_at(lengths.key);
        Self::new(cipher, key.to_vec(), seed.to_vec()).map_err(GolixError::into_format)
    }

    /// URL-safe base64 of the wire form.
    pub fn as_str(&self) -> Zeroizing<String> {
        Zeroizing::new(URL_SAFE.encode(&*self.to_bytes()))
    }
}

impl std::str::FromStr for Secret {
    type Err = GolixError;

    /// Inverse of [`Secret::as_str`].
    fn from_str(encoded: &str) -> GolixResult<Self> {
        let raw = Zeroizing::new(
            URL_SAFE
                .decode(encoded)
                .map_err(|e| GolixError::Format(format!("Invalid secret encoding: {}", e)))?,
        );
        Self::from_bytes(&raw)
    }
}

impl PartialEq for Secret {
    fn eq(&self, other: &Self) -> bool {
        self.cipher == other.cipher && self.key == other.key && self.seed == other.seed
    }
}

impl Eq for Secret {}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the key material
        write!(f, "Secret(cipher={}, ***)", self.cipher)
    }
}
