//! Cipher suite 0: structural test double
//!
//! Produces fixed symbolic placeholders instead of signatures and public
//! keys, accepts every signature, and passes symmetric content through
//! unchanged. Asymmetric encryption and MACs cannot be meaningfully faked, so
//! they refuse to run.

use super::suite::{CipherSuite, ComponentLengths, PrivateKeys, PublicKeys};
use crate::error::{GolixError, GolixResult};
use crate::secret::Secret;

const SIGNATURE_LEN: usize = 512;
const PUBLIC_KEY_LEN: usize = 512;
const EXCHANGE_KEY_LEN: usize = 32;

/// `open | fill... | label | fill... | close`, exactly `len` bytes.
fn placeholder(open: &str, label: &str, close: &str, len: usize) -> Vec<u8> {
    let fill = len - open.len() - label.len() - close.len();
    let left = fill / 2;
    let mut out = Vec::with_capacity(len);
    out.extend_from_slice(open.as_bytes());
    out.resize(open.len() + left, b'-');
    out.extend_from_slice(label.as_bytes());
    out.resize(len - close.len(), b'-');
    out.extend_from_slice(close.as_bytes());
    out
}

/// Symbolic signature emitted by suite 0.
pub fn dummy_signature() -> Vec<u8> {
    placeholder("[[ Start signature ", "", " End signature ]]", SIGNATURE_LEN)
}

fn dummy_public_key() -> Vec<u8> {
    placeholder("[ ", " MOCK PUBLIC KEY ", " ]", PUBLIC_KEY_LEN)
}

fn dummy_exchange_key() -> Vec<u8> {
    placeholder("[", " EXCHANGE KEY ", "]", EXCHANGE_KEY_LEN)
}

fn refuse(operation: &str) -> GolixError {
    GolixError::Validation(format!(
        "Cipher suite 0 cannot perform {}; use a real suite",
        operation
    ))
}

/// FOR TESTING ONLY.
pub struct NullSuite;

impl CipherSuite for NullSuite {
    fn id(&self) -> u8 {
        0
    }

    fn name(&self) -> &'static str {
        "null"
    }

    fn lengths(&self) -> ComponentLengths {
        ComponentLengths {
            key: 32,
            seed: 0,
            signature: SIGNATURE_LEN,
            mac: 64,
            asymmetric: 512,
            signature_public_key: PUBLIC_KEY_LEN,
            encryption_public_key: PUBLIC_KEY_LEN,
            exchange_public_key: EXCHANGE_KEY_LEN,
            signature_private_key: 0,
            decryption_private_key: 0,
            exchange_private_key: 0,
        }
    }

    fn is_test_double(&self) -> bool {
        true
    }

    fn generate_keys(&self) -> GolixResult<(PrivateKeys, PublicKeys)> {
        let public = PublicKeys {
            signature: dummy_public_key(),
            encryption: dummy_public_key(),
            exchange: dummy_exchange_key(),
        };
        Ok((PrivateKeys::new(Vec::new(), Vec::new(), Vec::new()), public))
    }

    fn sign(&self, _keys: &PrivateKeys, _data: &[u8]) -> GolixResult<Vec<u8>> {
        Ok(dummy_signature())
    }

    fn verify(&self, _keys: &PublicKeys, _signature: &[u8], _data: &[u8]) -> GolixResult<()> {
        Ok(())
    }

    fn encrypt_asymmetric(&self, _recipient: &PublicKeys, _data: &[u8]) -> GolixResult<Vec<u8>> {
        Err(refuse("asymmetric encryption"))
    }

    fn decrypt_asymmetric(&self, _keys: &PrivateKeys, _data: &[u8]) -> GolixResult<Vec<u8>> {
        Err(refuse("asymmetric decryption"))
    }

    fn mac(&self, _own: &PrivateKeys, _peer: &PublicKeys, _data: &[u8]) -> GolixResult<Vec<u8>> {
        Err(refuse("MAC generation"))
    }

    fn verify_mac(
        &self,
        _own: &PrivateKeys,
        _peer: &PublicKeys,
        _mac: &[u8],
        _data: &[u8],
    ) -> GolixResult<()> {
        Err(refuse("MAC verification"))
    }

    fn encrypt_symmetric(&self, _secret: &Secret, data: &[u8]) -> GolixResult<Vec<u8>> {
        Ok(data.to_vec())
    }

    fn decrypt_symmetric(&self, _secret: &Secret, data: &[u8]) -> GolixResult<Vec<u8>> {
        Ok(data.to_vec())
    }
}
