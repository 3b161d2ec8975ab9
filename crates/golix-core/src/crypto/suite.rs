//! Cipher suite contract and key material containers

use crate::error::{GolixError, GolixResult};
use crate::secret::Secret;
use zeroize::Zeroizing;

/// Fixed byte lengths of every cryptographic component a suite produces or
/// consumes.
///
/// The codec sizes placeholders from this table and [`Secret`] validates its
/// key and seed against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentLengths {
    /// Symmetric key carried by a [`Secret`].
    pub key: usize,
    /// Symmetric seed carried by a [`Secret`] (may be zero).
    pub seed: usize,
    /// Signature trailer of signed records.
    pub signature: usize,
    /// MAC trailer of requests.
    pub mac: usize,
    /// Encrypted payload of requests.
    pub asymmetric: usize,
    /// Public signature key in an identity container.
    pub signature_public_key: usize,
    /// Public encryption key in an identity container.
    pub encryption_public_key: usize,
    /// Public exchange key in an identity container.
    pub exchange_public_key: usize,
    /// Private signing key.
    pub signature_private_key: usize,
    /// Private decryption key.
    pub decryption_private_key: usize,
    /// Private exchange key.
    pub exchange_private_key: usize,
}

/// Public half of an identity: the three keys published in its identity
/// container.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKeys {
    /// Verifies signatures on records.
    pub signature: Vec<u8>,
    /// Encrypts asymmetric request payloads to this identity.
    pub encryption: Vec<u8>,
    /// Agrees on request MAC keys with this identity.
    pub exchange: Vec<u8>,
}

impl PublicKeys {
    /// Check every key against the suite's length table.
    pub fn validate(&self, lengths: &ComponentLengths) -> GolixResult<()> {
        check_len("public signature key", self.signature.len(), lengths.signature_public_key)?;
        check_len("public encryption key", self.encryption.len(), lengths.encryption_public_key)?;
        check_len("public exchange key", self.exchange.len(), lengths.exchange_public_key)
    }
}

impl std::fmt::Debug for PublicKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = |key: &[u8]| hex::encode(&key[..key.len().min(8)]);
        f.debug_struct("PublicKeys")
            .field("signature", &prefix(&self.signature))
            .field("encryption", &prefix(&self.encryption))
            .field("exchange", &prefix(&self.exchange))
            .finish()
    }
}

/// Private half of an identity.
///
/// Bytes are wiped when dropped. Suites rebuild their native key objects from
/// these bytes for the duration of a single operation.
#[derive(Clone)]
pub struct PrivateKeys {
    /// Signing key.
    pub signature: Zeroizing<Vec<u8>>,
    /// Asymmetric decryption key.
    pub decryption: Zeroizing<Vec<u8>>,
    /// Key agreement key for request MACs.
    pub exchange: Zeroizing<Vec<u8>>,
}

impl PrivateKeys {
    /// Wrap raw private key bytes.
    pub fn new(signature: Vec<u8>, decryption: Vec<u8>, exchange: Vec<u8>) -> Self {
        Self {
            signature: Zeroizing::new(signature),
            decryption: Zeroizing::new(decryption),
            exchange: Zeroizing::new(exchange),
        }
    }

    /// Check every key against the suite's length table.
    pub fn validate(&self, lengths: &ComponentLengths) -> GolixResult<()> {
        check_len("private signature key", self.signature.len(), lengths.signature_private_key)?;
        check_len("private decryption key", self.decryption.len(), lengths.decryption_private_key)?;
        check_len("private exchange key", self.exchange.len(), lengths.exchange_private_key)
    }
}

impl std::fmt::Debug for PrivateKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKeys").finish_non_exhaustive()
    }
}

fn check_len(what: &str, actual: usize, expected: usize) -> GolixResult<()> {
    if actual != expected {
        return Err(GolixError::Validation(format!(
            "Invalid {} length: expected {}, got {}",
            what, expected, actual
        )));
    }
    Ok(())
}

/// Pluggable bundle of signature, asymmetric, MAC and symmetric primitives,
/// selected by the 1-byte cipher tag in every record header.
///
/// New suites are introduced only in the [`Registry`](super::Registry); the
/// codec reads everything it needs from [`CipherSuite::lengths`].
pub trait CipherSuite: Send + Sync {
    /// Wire tag.
    fn id(&self) -> u8;

    /// Human-readable name, used in logs.
    fn name(&self) -> &'static str;

    /// Component length table.
    fn lengths(&self) -> ComponentLengths;

    /// Test doubles are only selectable when the registry allows them.
    fn is_test_double(&self) -> bool {
        false
    }

    /// Generate a fresh identity key set.
    fn generate_keys(&self) -> GolixResult<(PrivateKeys, PublicKeys)>;

    /// Sign `data` with the private signature key.
    fn sign(&self, keys: &PrivateKeys, data: &[u8]) -> GolixResult<Vec<u8>>;

    /// Verify a signature; fails with [`GolixError::Security`].
    fn verify(&self, keys: &PublicKeys, signature: &[u8], data: &[u8]) -> GolixResult<()>;

    /// Encrypt `data` to the holder of `recipient`'s private decryption key.
    ///
    /// Output length is always `lengths().asymmetric`.
    fn encrypt_asymmetric(&self, recipient: &PublicKeys, data: &[u8]) -> GolixResult<Vec<u8>>;

    /// Decrypt an asymmetric payload with the private decryption key.
    fn decrypt_asymmetric(&self, keys: &PrivateKeys, data: &[u8]) -> GolixResult<Vec<u8>>;

    /// MAC `data` under a key agreed between `own` and `peer`.
    ///
    /// Either side of the exchange derives the same key.
    fn mac(&self, own: &PrivateKeys, peer: &PublicKeys, data: &[u8]) -> GolixResult<Vec<u8>>;

    /// Verify a MAC produced by [`CipherSuite::mac`] on the other side.
    fn verify_mac(
        &self,
        own: &PrivateKeys,
        peer: &PublicKeys,
        mac: &[u8],
        data: &[u8],
    ) -> GolixResult<()>;

    /// Encrypt container content. The output embeds its own nonce.
    fn encrypt_symmetric(&self, secret: &Secret, data: &[u8]) -> GolixResult<Vec<u8>>;

    /// Decrypt container content.
    fn decrypt_symmetric(&self, secret: &Secret, data: &[u8]) -> GolixResult<Vec<u8>>;
}
