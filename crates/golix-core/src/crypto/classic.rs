//! Cipher suite 1: classical elliptic-curve primitives
//!
//! | Component | Primitive |
//! |-----------|-----------|
//! | Signature | Ed25519 (64 bytes) |
//! | Asymmetric | ephemeral X25519 + HKDF-SHA512 + ChaCha20-Poly1305, 512 bytes |
//! | MAC | static X25519 + HKDF-SHA512 + HMAC-SHA512 (64 bytes) |
//! | Symmetric | ChaCha20-Poly1305, random nonce prepended |

use super::aead::{ContentCrypto, NONCE_SIZE, TAG_SIZE};
use super::sealed::{
    derive_key, ephemeral_agreement, exchange_mac, frame, generate_x25519, random_array,
    recipient_agreement, unframe, verify_exchange_mac, MAC_SIZE, X25519_KEY_SIZE,
};
use super::suite::{CipherSuite, ComponentLengths, PrivateKeys, PublicKeys};
use crate::error::{GolixError, GolixResult};
use crate::secret::Secret;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use zeroize::Zeroizing;

/// Ed25519 seed and public key length.
pub const ED25519_KEY_SIZE: usize = 32;

/// Ed25519 signature length.
pub const ED25519_SIGNATURE_SIZE: usize = 64;

const ASYMMETRIC_LEN: usize = 512;

/// Plaintext bytes available inside the sealed box, length prefix included.
const SEALED_CAPACITY: usize = ASYMMETRIC_LEN - X25519_KEY_SIZE - NONCE_SIZE - TAG_SIZE;

const SEALED_CONTEXT: &[u8] = b"classic-sealed";

/// Fresh Ed25519 key pair as raw bytes `(seed, public)`.
pub(crate) fn generate_ed25519() -> (Vec<u8>, Vec<u8>) {
    let seed = random_array::<ED25519_KEY_SIZE>();
    let signing = SigningKey::from_bytes(&seed);
    (seed.to_vec(), signing.verifying_key().to_bytes().to_vec())
}

pub(crate) fn ed25519_sign(seed: &[u8], data: &[u8]) -> GolixResult<[u8; ED25519_SIGNATURE_SIZE]> {
    let seed: Zeroizing<[u8; ED25519_KEY_SIZE]> =
        Zeroizing::new(seed.try_into().map_err(|_| {
            GolixError::Validation(format!(
                "Ed25519 signing key must be {} bytes, got {}",
                ED25519_KEY_SIZE,
                seed.len()
            ))
        })?);
    let signing = SigningKey::from_bytes(&seed);
    Ok(signing.sign(data).to_bytes())
}

pub(crate) fn ed25519_verify(public: &[u8], signature: &[u8], data: &[u8]) -> GolixResult<()> {
    let public: [u8; ED25519_KEY_SIZE] = public
        .try_into()
        .map_err(|_| GolixError::Security("Invalid Ed25519 public key length".to_string()))?;
    let verifying = VerifyingKey::from_bytes(&public)
        .map_err(|e| GolixError::Security(format!("Invalid Ed25519 public key: {}", e)))?;
    let signature: [u8; ED25519_SIGNATURE_SIZE] = signature
        .try_into()
        .map_err(|_| GolixError::Security("Invalid Ed25519 signature length".to_string()))?;
    verifying
        .verify(data, &Signature::from_bytes(&signature))
        .map_err(|_| GolixError::Security("Ed25519 signature verification failed".to_string()))
}

/// Classical suite.
pub struct ClassicSuite;

impl CipherSuite for ClassicSuite {
    fn id(&self) -> u8 {
        1
    }

    fn name(&self) -> &'static str {
        "ed25519-x25519-chacha20poly1305"
    }

    fn lengths(&self) -> ComponentLengths {
        ComponentLengths {
            key: 32,
            seed: 0,
            signature: ED25519_SIGNATURE_SIZE,
            mac: MAC_SIZE,
            asymmetric: ASYMMETRIC_LEN,
            signature_public_key: ED25519_KEY_SIZE,
            encryption_public_key: X25519_KEY_SIZE,
            exchange_public_key: X25519_KEY_SIZE,
            signature_private_key: ED25519_KEY_SIZE,
            decryption_private_key: X25519_KEY_SIZE,
            exchange_private_key: X25519_KEY_SIZE,
        }
    }

    fn generate_keys(&self) -> GolixResult<(PrivateKeys, PublicKeys)> {
        let (signature_private, signature_public) = generate_ed25519();
        let (decryption_private, encryption_public) = generate_x25519();
        let (exchange_private, exchange_public) = generate_x25519();
        Ok((
            PrivateKeys::new(signature_private, decryption_private, exchange_private),
            PublicKeys {
                signature: signature_public,
                encryption: encryption_public,
                exchange: exchange_public,
            },
        ))
    }

    fn sign(&self, keys: &PrivateKeys, data: &[u8]) -> GolixResult<Vec<u8>> {
        Ok(ed25519_sign(&keys.signature, data)?.to_vec())
    }

    fn verify(&self, keys: &PublicKeys, signature: &[u8], data: &[u8]) -> GolixResult<()> {
        ed25519_verify(&keys.signature, signature, data)
    }

    fn encrypt_asymmetric(&self, recipient: &PublicKeys, data: &[u8]) -> GolixResult<Vec<u8>> {
        let framed = frame(data, SEALED_CAPACITY)?;
        let (ephemeral_public, shared) = ephemeral_agreement(&recipient.encryption)?;
        let key = derive_key(&shared[..], Some(&ephemeral_public), SEALED_CONTEXT)?;
        let ciphertext = ContentCrypto::chacha(&key).encrypt(&framed)?;

        let mut sealed = Vec::with_capacity(ASYMMETRIC_LEN);
        sealed.extend_from_slice(&ephemeral_public);
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }

    fn decrypt_asymmetric(&self, keys: &PrivateKeys, data: &[u8]) -> GolixResult<Vec<u8>> {
        if data.len() != ASYMMETRIC_LEN {
            return Err(GolixError::Format(format!(
                "Asymmetric payload must be {} bytes, got {}",
                ASYMMETRIC_LEN,
                data.len()
            )));
        }
        let (ephemeral_public, ciphertext) = data.split_at(X25519_KEY_SIZE);
        let shared = recipient_agreement(&keys.decryption, ephemeral_public)?;
        let key = derive_key(&shared[..], Some(ephemeral_public), SEALED_CONTEXT)?;
        let framed = Zeroizing::new(ContentCrypto::chacha(&key).decrypt(ciphertext)?);
        unframe(&framed)
    }

    fn mac(&self, own: &PrivateKeys, peer: &PublicKeys, data: &[u8]) -> GolixResult<Vec<u8>> {
        exchange_mac(&own.exchange, &peer.exchange, data)
    }

    fn verify_mac(
        &self,
        own: &PrivateKeys,
        peer: &PublicKeys,
        mac: &[u8],
        data: &[u8],
    ) -> GolixResult<()> {
        verify_exchange_mac(&own.exchange, &peer.exchange, mac, data)
    }

    fn encrypt_symmetric(&self, secret: &Secret, data: &[u8]) -> GolixResult<Vec<u8>> {
        ContentCrypto::chacha(&*secret.key_array()?).encrypt(data)
    }

    fn decrypt_symmetric(&self, secret: &Secret, data: &[u8]) -> GolixResult<Vec<u8>> {
        ContentCrypto::chacha(&*secret.key_array()?).decrypt(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sealed_capacity() {
        assert_eq!(SEALED_CAPACITY, 452);
    }

    #[test]
    fn test_sign_verify() {
        let (private, public) = ClassicSuite.generate_keys().unwrap();
        let signature = ClassicSuite.sign(&private, b"record bytes").unwrap();
        assert_eq!(signature.len(), ClassicSuite.lengths().signature);
        assert!(ClassicSuite.verify(&public, &signature, b"record bytes").is_ok());

        let err = ClassicSuite.verify(&public, &signature, b"record bytez").unwrap_err();
        assert!(err.is_security());
    }

    #[test]
    fn test_verify_with_other_key_fails() {
        let (private, _) = ClassicSuite.generate_keys().unwrap();
        let (_, other_public) = ClassicSuite.generate_keys().unwrap();
        let signature = ClassicSuite.sign(&private, b"data").unwrap();
        assert!(ClassicSuite.verify(&other_public, &signature, b"data").is_err());
    }

    #[test]
    fn test_asymmetric_roundtrip_fixed_length() {
        let (private, public) = ClassicSuite.generate_keys().unwrap();
        for message in [&b""[..], &b"short"[..], &[0xAB; 450][..]] {
            let sealed = ClassicSuite.encrypt_asymmetric(&public, message).unwrap();
            assert_eq!(sealed.len(), ASYMMETRIC_LEN);
            assert_eq!(ClassicSuite.decrypt_asymmetric(&private, &sealed).unwrap(), message);
        }
    }

    #[test]
    fn test_asymmetric_oversize_rejected() {
        let (_, public) = ClassicSuite.generate_keys().unwrap();
        let err = ClassicSuite.encrypt_asymmetric(&public, &[0u8; 451]).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_asymmetric_wrong_recipient_fails() {
        let (_, public) = ClassicSuite.generate_keys().unwrap();
        let (other_private, _) = ClassicSuite.generate_keys().unwrap();
        let sealed = ClassicSuite.encrypt_asymmetric(&public, b"hello").unwrap();
        let err = ClassicSuite.decrypt_asymmetric(&other_private, &sealed).unwrap_err();
        assert!(err.is_security());
    }

    #[test]
    fn test_symmetric_roundtrip() {
        let secret = Secret::generate(&ClassicSuite);
        let ciphertext = ClassicSuite.encrypt_symmetric(&secret, b"hello").unwrap();
        assert_ne!(&ciphertext[NONCE_SIZE..], b"hello");
        assert_eq!(ClassicSuite.decrypt_symmetric(&secret, &ciphertext).unwrap(), b"hello");
    }
}
