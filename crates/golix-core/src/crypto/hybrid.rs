//! Cipher suite 2: hybrid classical + post-quantum primitives
//!
//! Every component is only as weak as the stronger of its two halves:
//! signatures carry both an Ed25519 and a Dilithium5 signature and both must
//! verify; sealed payloads mix an X25519 agreement with a Kyber768
//! encapsulation before deriving the AEAD key.
//!
//! Key and signature layouts concatenate the classical half first:
//!
//! ```text
//! signature public key:  ed25519_pk(32)   | dilithium5_pk
//! encryption public key: x25519_pk(32)    | kyber768_pk
//! signature:             ed25519_sig(64)  | dilithium5_detached_sig
//! asymmetric payload:    x25519_eph_pk(32) | kyber768_ct | xnonce(24) | ciphertext+tag
//! ```

use super::aead::{ContentCrypto, TAG_SIZE, XNONCE_SIZE};
use super::classic::{
    ed25519_sign, ed25519_verify, generate_ed25519, ED25519_KEY_SIZE, ED25519_SIGNATURE_SIZE,
};
use super::sealed::{
    derive_key, ephemeral_agreement, exchange_mac, frame, generate_x25519, recipient_agreement,
    unframe, verify_exchange_mac, MAC_SIZE, X25519_KEY_SIZE,
};
use super::suite::{CipherSuite, ComponentLengths, PrivateKeys, PublicKeys};
use crate::error::{GolixError, GolixResult};
use crate::secret::Secret;
use pqcrypto_dilithium::dilithium5;
use pqcrypto_kyber::kyber768;
use pqcrypto_traits::kem::{
    Ciphertext as PqCiphertext, PublicKey as PqKemPublicKey, SecretKey as PqKemSecretKey,
    SharedSecret as PqSharedSecret,
};
use pqcrypto_traits::sign::{
    DetachedSignature as PqDetachedSignature, PublicKey as PqSignPublicKey,
    SecretKey as PqSignSecretKey,
};
use zeroize::Zeroizing;

const ASYMMETRIC_LEN: usize = 1664;

/// Symmetric seed length; salts the content key derivation.
const SEED_LEN: usize = 16;

const SEALED_CONTEXT: &[u8] = b"hybrid-sealed";
const CONTENT_CONTEXT: &[u8] = b"hybrid-content";

fn sealed_capacity() -> usize {
    ASYMMETRIC_LEN - X25519_KEY_SIZE - kyber768::ciphertext_bytes() - XNONCE_SIZE - TAG_SIZE
}

fn concat(first: &[u8], second: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(first.len() + second.len());
    out.extend_from_slice(first);
    out.extend_from_slice(second);
    out
}

fn split_checked<'a>(
    bytes: &'a [u8],
    at: usize,
    total: usize,
    what: &str,
) -> GolixResult<(&'a [u8], &'a [u8])> {
    if bytes.len() != total {
        return Err(GolixError::Validation(format!(
            "Invalid {} length: expected {}, got {}",
            what,
            total,
            bytes.len()
        )));
    }
    Ok(bytes.split_at(at))
}

/// Hybrid post-quantum suite.
pub struct HybridSuite;

impl HybridSuite {
    fn sealed_key(
        x25519_shared: &[u8],
        kem_shared: &[u8],
        ephemeral_public: &[u8],
        kem_ciphertext: &[u8],
    ) -> GolixResult<Zeroizing<[u8; 32]>> {
        let ikm = Zeroizing::new(concat(x25519_shared, kem_shared));
        let salt = concat(ephemeral_public, kem_ciphertext);
        derive_key(&ikm, Some(&salt), SEALED_CONTEXT)
    }

    fn content_crypto(secret: &Secret) -> GolixResult<ContentCrypto> {
        let key = derive_key(secret.key(), Some(secret.seed()), CONTENT_CONTEXT)?;
        Ok(ContentCrypto::xchacha(&key))
    }
}

impl CipherSuite for HybridSuite {
    fn id(&self) -> u8 {
        2
    }

    fn name(&self) -> &'static str {
        "ed25519+dilithium5-x25519+kyber768-xchacha20poly1305"
    }

    fn lengths(&self) -> ComponentLengths {
        ComponentLengths {
            key: 32,
            seed: SEED_LEN,
            signature: ED25519_SIGNATURE_SIZE + dilithium5::signature_bytes(),
            mac: MAC_SIZE,
            asymmetric: ASYMMETRIC_LEN,
            signature_public_key: ED25519_KEY_SIZE + dilithium5::public_key_bytes(),
            encryption_public_key: X25519_KEY_SIZE + kyber768::public_key_bytes(),
            exchange_public_key: X25519_KEY_SIZE,
            signature_private_key: ED25519_KEY_SIZE + dilithium5::secret_key_bytes(),
            decryption_private_key: X25519_KEY_SIZE + kyber768::secret_key_bytes(),
            exchange_private_key: X25519_KEY_SIZE,
        }
    }

    fn generate_keys(&self) -> GolixResult<(PrivateKeys, PublicKeys)> {
        let (ed_private, ed_public) = generate_ed25519();
        let (dilithium_public, dilithium_secret) = dilithium5::keypair();
        let (x_private, x_public) = generate_x25519();
        let (kyber_public, kyber_secret) = kyber768::keypair();
        let (exchange_private, exchange_public) = generate_x25519();

        let private = PrivateKeys::new(
            concat(&ed_private, dilithium_secret.as_bytes()),
            concat(&x_private, kyber_secret.as_bytes()),
            exchange_private,
        );
        let public = PublicKeys {
            signature: concat(&ed_public, dilithium_public.as_bytes()),
            encryption: concat(&x_public, kyber_public.as_bytes()),
            exchange: exchange_public,
        };
        Ok((private, public))
    }

    fn sign(&self, keys: &PrivateKeys, data: &[u8]) -> GolixResult<Vec<u8>> {
        let lengths = self.lengths();
        let (ed_seed, dilithium_bytes) = split_checked(
            &keys.signature,
            ED25519_KEY_SIZE,
            lengths.signature_private_key,
            "hybrid signing key",
        )?;
        let ed_signature = ed25519_sign(ed_seed, data)?;
        let dilithium_secret = dilithium5::SecretKey::from_bytes(dilithium_bytes)
            .map_err(|e| GolixError::Validation(format!("Invalid Dilithium5 secret key: {}", e)))?;
        let dilithium_signature = dilithium5::detached_sign(data, &dilithium_secret);

        let signature = concat(&ed_signature, dilithium_signature.as_bytes());
        if signature.len() != lengths.signature {
            return Err(GolixError::Validation(format!(
                "Dilithium5 produced a {}-byte signature, expected {}",
                signature.len() - ED25519_SIGNATURE_SIZE,
                lengths.signature - ED25519_SIGNATURE_SIZE
            )));
        }
        Ok(signature)
    }

    fn verify(&self, keys: &PublicKeys, signature: &[u8], data: &[u8]) -> GolixResult<()> {
        let lengths = self.lengths();
        let (ed_public, dilithium_public) = split_checked(
            &keys.signature,
            ED25519_KEY_SIZE,
            lengths.signature_public_key,
            "hybrid public signature key",
        )
        .map_err(|e| GolixError::Security(e.to_string()))?;
        let (ed_signature, dilithium_signature) = split_checked(
            signature,
            ED25519_SIGNATURE_SIZE,
            lengths.signature,
            "hybrid signature",
        )
        .map_err(|e| GolixError::Security(e.to_string()))?;

        // Both halves must verify
        ed25519_verify(ed_public, ed_signature, data)?;

        let dilithium_public = dilithium5::PublicKey::from_bytes(dilithium_public)
            .map_err(|e| GolixError::Security(format!("Invalid Dilithium5 public key: {}", e)))?;
        let dilithium_signature = dilithium5::DetachedSignature::from_bytes(dilithium_signature)
            .map_err(|e| GolixError::Security(format!("Invalid Dilithium5 signature: {}", e)))?;
        dilithium5::verify_detached_signature(&dilithium_signature, data, &dilithium_public)
            .map_err(|_| {
                GolixError::Security("Dilithium5 signature verification failed".to_string())
            })
    }

    fn encrypt_asymmetric(&self, recipient: &PublicKeys, data: &[u8]) -> GolixResult<Vec<u8>> {
        let (x_public, kyber_public) = split_checked(
            &recipient.encryption,
            X25519_KEY_SIZE,
            self.lengths().encryption_public_key,
            "hybrid public encryption key",
        )?;
        let kyber_public = kyber768::PublicKey::from_bytes(kyber_public)
            .map_err(|e| GolixError::Validation(format!("Invalid Kyber768 public key: {}", e)))?;

        let framed = frame(data, sealed_capacity())?;
        let (ephemeral_public, x_shared) = ephemeral_agreement(x_public)?;
        let (kem_shared, kem_ciphertext) = kyber768::encapsulate(&kyber_public);
        let key = Self::sealed_key(
            &x_shared[..],
            kem_shared.as_bytes(),
            &ephemeral_public,
            kem_ciphertext.as_bytes(),
        )?;
        let ciphertext = ContentCrypto::xchacha(&key).encrypt(&framed)?;

        let mut sealed = Vec::with_capacity(ASYMMETRIC_LEN);
        sealed.extend_from_slice(&ephemeral_public);
        sealed.extend_from_slice(kem_ciphertext.as_bytes());
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
        let (x_private, kyber_private) = split_checked(
            &keys.decryption,
            X25519_KEY_SIZE,
            self.lengths().decryption_private_key,
            "hybrid decryption key",
        )?;
        let kyber_private = kyber768::SecretKey::from_bytes(kyber_private)
            .map_err(|e| GolixError::Validation(format!("Invalid Kyber768 secret key: {}", e)))?;

        let (ephemeral_public, rest) = data.split_at(X25519_KEY_SIZE);
        let (kem_ciphertext, ciphertext) = rest.split_at(kyber768::ciphertext_bytes());
        let kem_ciphertext_parsed = kyber768::Ciphertext::from_bytes(kem_ciphertext)
            .map_err(|e| GolixError::Format(format!("Invalid Kyber768 ciphertext: {}", e)))?;

        let x_shared = recipient_agreement(x_private, ephemeral_public)?;
        let kem_shared = kyber768::decapsulate(&kem_ciphertext_parsed, &kyber_private);
        let key = Self::sealed_key(
            &x_shared[..],
            kem_shared.as_bytes(),
            ephemeral_public,
            kem_ciphertext,
        )?;
        let framed = Zeroizing::new(ContentCrypto::xchacha(&key).decrypt(ciphertext)?);
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
        Self::content_crypto(secret)?.encrypt(data)
    }

    fn decrypt_symmetric(&self, secret: &Secret, data: &[u8]) -> GolixResult<Vec<u8>> {
        Self::content_crypto(secret)?.decrypt(data)
    }
}
