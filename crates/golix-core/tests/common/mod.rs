//! Shared helpers for integration tests

#![allow(dead_code)]

use golix_core::{FirstParty, Registry};
use sha2::{Digest, Sha512};

/// Length of an algo-1 address on the wire.
pub const ADDRESS_LEN: usize = 1 + 64;

/// Install a test subscriber honouring `RUST_LOG`. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Registry for a `(cipher, algo)` pair, with test doubles enabled when
/// either is 0.
pub fn registry_for(cipher: u8, algo: u8) -> Registry {
    if cipher == 0 || algo == 0 {
        Registry::testing()
    } else {
        Registry::production()
    }
}

/// Two fresh identities sharing a configuration.
pub fn parties(cipher: u8, algo: u8) -> (FirstParty, FirstParty) {
    let registry = registry_for(cipher, algo);
    (
        FirstParty::generate_with(registry, cipher, algo).unwrap(),
        FirstParty::generate_with(registry, cipher, algo).unwrap(),
    )
}

/// Offset of the final address field of an algo-1 record.
pub fn address_offset(bytes: &[u8], trailer_len: usize) -> usize {
    bytes.len() - trailer_len - ADDRESS_LEN
}

/// Recompute the SHA-512 address of an address field starting at
/// `offset`, over every byte before its digest.
pub fn rehash_at(bytes: &mut [u8], offset: usize) {
    assert_eq!(bytes[offset], 1, "only algo-1 addresses can be recomputed");
    let digest = Sha512::digest(&bytes[..offset + 1]);
    bytes[offset + 1..offset + ADDRESS_LEN].copy_from_slice(&digest);
}

/// Recompute a record's final address so a body edit survives `unpack`,
/// leaving the signature stale.
pub fn readdress(bytes: &mut [u8], trailer_len: usize) {
    let offset = address_offset(bytes, trailer_len);
    rehash_at(bytes, offset);
}
