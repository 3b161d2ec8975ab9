//! Key agreement helpers for asymmetric payloads and request MACs
//!
//! Asymmetric payloads are sealed boxes: an ephemeral X25519 key (plus, for
//! the hybrid suite, a KEM encapsulation) agrees a one-time AEAD key with
//! the recipient. Request MACs use a static-static X25519 agreement between
//! the two parties' exchange keys, so only a party able to run the exchange
//! can produce or check the tag.

use crate::error::{GolixError, GolixResult};
use hkdf::Hkdf;
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha512;
use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret as X25519StaticSecret};
use zeroize::Zeroizing;

type HmacSha512 = Hmac<Sha512>;

/// Domain separation for HKDF.
const HKDF_INFO: &[u8] = b"golix-key-agreement-v1:";

/// Length of the big-endian length prefix in a framed plaintext.
const FRAME_HEADER: usize = 2;

/// X25519 key length (public and private).
pub const X25519_KEY_SIZE: usize = 32;

/// HMAC-SHA512 tag length.
pub const MAC_SIZE: usize = 64;

/// Derive a 32-byte key from a shared secret using HKDF-SHA512.
pub(crate) fn derive_key(
    shared_secret: &[u8],
    salt: Option<&[u8]>,
    context: &[u8],
) -> GolixResult<Zeroizing<[u8; 32]>> {
    let mut info = Vec::with_capacity(HKDF_INFO.len() + context.len());
    info.extend_from_slice(HKDF_INFO);
    info.extend_from_slice(context);

    let hkdf = Hkdf::<Sha512>::new(salt, shared_secret);
    let mut output = Zeroizing::new([0u8; 32]);
    hkdf.expand(&info, &mut output[..])
        .map_err(|e| GolixError::Validation(format!("Key derivation failed: {}", e)))?;
    Ok(output)
}

/// Fill a fresh array from the system RNG.
pub(crate) fn random_array<const N: usize>() -> Zeroizing<[u8; N]> {
    let mut bytes = Zeroizing::new([0u8; N]);
    rand::rng().fill_bytes(&mut bytes[..]);
    bytes
}

/// Frame `data` as `len:u16 | data | zero padding` to exactly `capacity` bytes.
pub(crate) fn frame(data: &[u8], capacity: usize) -> GolixResult<Zeroizing<Vec<u8>>> {
    let max = capacity.saturating_sub(FRAME_HEADER).min(u16::MAX as usize);
    if data.len() > max {
        return Err(GolixError::Validation(format!(
            "Asymmetric plaintext too large: {} bytes, capacity {}",
            data.len(),
            max
        )));
    }
    let mut framed = Zeroizing::new(Vec::with_capacity(capacity));
    framed.extend_from_slice(&(data.len() as u16).to_be_bytes());
    framed.extend_from_slice(data);
    framed.resize(capacity, 0);
    Ok(framed)
}

/// Inverse of [`frame`].
pub(crate) fn unframe(framed: &[u8]) -> GolixResult<Vec<u8>> {
    if framed.len() < FRAME_HEADER {
        return Err(GolixError::Format("Asymmetric plaintext missing length".to_string()));
    }
    let len = u16::from_be_bytes([framed[0], framed[1]]) as usize;
    framed
        .get(FRAME_HEADER..FRAME_HEADER + len)
        .map(<[u8]>::to_vec)
        .ok_or_else(|| {
            GolixError::Format(format!(
                "Asymmetric plaintext length {} exceeds frame of {}",
                len,
                framed.len() - FRAME_HEADER
            ))
        })
}

/// Rebuild an X25519 private key from raw bytes.
pub(crate) fn x25519_secret(bytes: &[u8]) -> GolixResult<X25519StaticSecret> {
    let raw: Zeroizing<[u8; X25519_KEY_SIZE]> = Zeroizing::new(bytes.try_into().map_err(|_| {
        GolixError::Validation(format!(
            "X25519 private key must be {} bytes, got {}",
            X25519_KEY_SIZE,
            bytes.len()
        ))
    })?);
    Ok(X25519StaticSecret::from(*raw))
}

/// Rebuild an X25519 public key from raw bytes.
pub(crate) fn x25519_public(bytes: &[u8]) -> GolixResult<X25519PublicKey> {
    let raw: [u8; X25519_KEY_SIZE] = bytes.try_into().map_err(|_| {
        GolixError::Validation(format!(
            "X25519 public key must be {} bytes, got {}",
            X25519_KEY_SIZE,
            bytes.len()
        ))
    })?;
    Ok(X25519PublicKey::from(raw))
}

/// Fresh X25519 key pair as raw bytes `(private, public)`.
pub(crate) fn generate_x25519() -> (Vec<u8>, Vec<u8>) {
    let seed = random_array::<X25519_KEY_SIZE>();
    let secret = X25519StaticSecret::from(*seed);
    let public = X25519PublicKey::from(&secret);
    (secret.to_bytes().to_vec(), public.as_bytes().to_vec())
}

/// Ephemeral X25519 agreement with a recipient.
///
/// Returns the ephemeral public key to transmit and the shared secret.
pub(crate) fn ephemeral_agreement(
    recipient_public: &[u8],
) -> GolixResult<([u8; X25519_KEY_SIZE], Zeroizing<[u8; 32]>)> {
    let recipient = x25519_public(recipient_public)?;
    let seed = random_array::<X25519_KEY_SIZE>();
    let ephemeral_secret = X25519StaticSecret::from(*seed);
    let ephemeral_public = X25519PublicKey::from(&ephemeral_secret);
    let shared = ephemeral_secret.diffie_hellman(&recipient);
    Ok((*ephemeral_public.as_bytes(), Zeroizing::new(*shared.as_bytes())))
}

/// Recipient side of [`ephemeral_agreement`].
pub(crate) fn recipient_agreement(
    own_private: &[u8],
    ephemeral_public: &[u8],
) -> GolixResult<Zeroizing<[u8; 32]>> {
    let secret = x25519_secret(own_private)?;
    let ephemeral = x25519_public(ephemeral_public)?;
    let shared = secret.diffie_hellman(&ephemeral);
    Ok(Zeroizing::new(*shared.as_bytes()))
}

/// Derive the HMAC key both parties agree on from their exchange keys.
///
/// The HKDF salt is the two public keys in sorted order, so either side
/// derives the same key.
fn exchange_mac_key(own_private: &[u8], peer_public: &[u8]) -> GolixResult<Zeroizing<[u8; 32]>> {
    let secret = x25519_secret(own_private)?;
    let own_public = X25519PublicKey::from(&secret);
    let peer = x25519_public(peer_public)?;
    let shared = Zeroizing::new(*secret.diffie_hellman(&peer).as_bytes());

    let (first, second) = if own_public.as_bytes() <= peer.as_bytes() {
        (own_public.as_bytes(), peer.as_bytes())
    } else {
        (peer.as_bytes(), own_public.as_bytes())
    };
    let mut salt = Vec::with_capacity(2 * X25519_KEY_SIZE);
    salt.extend_from_slice(first);
    salt.extend_from_slice(second);

    derive_key(&shared[..], Some(&salt), b"request-mac")
}

fn hmac_for(key: &[u8; 32], data: &[u8]) -> GolixResult<HmacSha512> {
    let mut mac = HmacSha512::new_from_slice(key)
        .map_err(|e| GolixError::Validation(format!("Invalid MAC key: {}", e)))?;
    mac.update(data);
    Ok(mac)
}

/// HMAC-SHA512 of `data` under the exchange-derived key.
pub(crate) fn exchange_mac(
    own_private: &[u8],
    peer_public: &[u8],
    data: &[u8],
) -> GolixResult<Vec<u8>> {
    let key = exchange_mac_key(own_private, peer_public)?;
    Ok(hmac_for(&key, data)?.finalize().into_bytes().to_vec())
}

/// Constant-time check of a tag produced by [`exchange_mac`] on the other side.
pub(crate) fn verify_exchange_mac(
    own_private: &[u8],
    peer_public: &[u8],
    tag: &[u8],
    data: &[u8],
) -> GolixResult<()> {
    let key = exchange_mac_key(own_private, peer_public)?;
    hmac_for(&key, data)?
        .verify_slice(tag)
        .map_err(|_| GolixError::Security("Request MAC verification failed".to_string()))
}
