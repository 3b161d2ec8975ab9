//! AEAD helper shared by the real cipher suites
//!
//! Wraps ChaCha20-Poly1305 (12-byte nonce) and XChaCha20-Poly1305 (24-byte
//! nonce) behind one type.
//!
//! # Wire Format
//!
//! Encrypted data format: `[nonce] + [ciphertext + auth_tag (16 bytes)]`

use crate::error::{GolixError, GolixResult};
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce, XChaCha20Poly1305, XNonce,
};
use rand::RngCore;

/// Nonce size for ChaCha20-Poly1305.
pub const NONCE_SIZE: usize = 12;

/// Nonce size for XChaCha20-Poly1305.
pub const XNONCE_SIZE: usize = 24;

/// Poly1305 authentication tag size.
pub const TAG_SIZE: usize = 16;

enum Cipher {
    ChaCha(ChaCha20Poly1305),
    XChaCha(XChaCha20Poly1305),
}

/// Symmetric AEAD keyed with a 32-byte key.
///
/// A random nonce is generated for each encryption and prepended to the
/// ciphertext, so the output is self-contained.
pub(crate) struct ContentCrypto {
    cipher: Cipher,
}

impl ContentCrypto {
    /// ChaCha20-Poly1305 instance.
    pub fn chacha(key: &[u8; 32]) -> Self {
        Self {
            cipher: Cipher::ChaCha(ChaCha20Poly1305::new(key.into())),
        }
    }

    /// XChaCha20-Poly1305 instance.
    pub fn xchacha(key: &[u8; 32]) -> Self {
        Self {
            cipher: Cipher::XChaCha(XChaCha20Poly1305::new(key.into())),
        }
    }

    /// Length of the prepended nonce.
    pub fn nonce_len(&self) -> usize {
        match self.cipher {
            Cipher::ChaCha(_) => NONCE_SIZE,
            Cipher::XChaCha(_) => XNONCE_SIZE,
        }
    }

    /// Bytes added to a plaintext by [`ContentCrypto::encrypt`].
    pub fn overhead(&self) -> usize {
        self.nonce_len() + TAG_SIZE
    }

    /// Encrypt `plaintext`; output is `[nonce] + [ciphertext + tag]`.
    pub fn encrypt(&self, plaintext: &[u8]) -> GolixResult<Vec<u8>> {
        let mut nonce_bytes = vec![0u8; self.nonce_len()];
        rand::rng().fill_bytes(&mut nonce_bytes);

        let ciphertext = match &self.cipher {
            Cipher::ChaCha(cipher) => cipher.encrypt(Nonce::from_slice(&nonce_bytes), plaintext),
            Cipher::XChaCha(cipher) => {
                cipher.encrypt(XNonce::from_slice(&nonce_bytes), plaintext)
            }
        }
        .map_err(|e| GolixError::Validation(format!("Encryption failed: {}", e)))?;

        let mut result = nonce_bytes;
        result.extend_from_slice(&ciphertext);
        Ok(result)
    }

    /// Decrypt data produced by [`ContentCrypto::encrypt`].
    ///
    /// # Errors
    ///
    /// Returns [`GolixError::Security`] when the data is too short or the
    /// authentication tag does not verify.
    pub fn decrypt(&self, data: &[u8]) -> GolixResult<Vec<u8>> {
        if data.len() < self.overhead() {
            return Err(GolixError::Security(format!(
                "Ciphertext too short: {} bytes, need at least {}",
                data.len(),
                self.overhead()
            )));
        }
        let (nonce_bytes, ciphertext) = data.split_at(self.nonce_len());

        match &self.cipher {
            Cipher::ChaCha(cipher) => cipher.decrypt(Nonce::from_slice(nonce_bytes), ciphertext),
            Cipher::XChaCha(cipher) => cipher.decrypt(XNonce::from_slice(nonce_bytes), ciphertext),
        }
        .map_err(|_| GolixError::Security("Decryption failed: authentication error".to_string()))
    }
}
