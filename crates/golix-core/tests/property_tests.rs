//! Property-based tests for the wire codec
//!
//! Uses proptest to check round trips and address integrity over arbitrary
//! key material and payloads.

mod common;

use common::parties;
use golix_core::{Address, AsymPayload, GolixObject, Registry, Secret, StaticBinding};
use proptest::prelude::*;

// ============================================================================
// Strategy Generators
// ============================================================================

/// A secret for any cipher, with key and seed sized for that cipher.
fn secret_strategy() -> impl Strategy<Value = Secret> {
    (0u8..3).prop_flat_map(|cipher| {
        let seed_len = if cipher == 2 { 16 } else { 0 };
        (
            Just(cipher),
            prop::collection::vec(any::<u8>(), 32),
            prop::collection::vec(any::<u8>(), seed_len),
        )
            .prop_map(|(cipher, key, seed)| Secret::new(cipher, key, seed).unwrap())
    })
}

fn address_strategy() -> impl Strategy<Value = Address> {
    prop::collection::vec(any::<u8>(), 64).prop_map(|digest| Address::new(1, digest).unwrap())
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Secrets survive both the binary and the string form
    #[test]
    fn secret_roundtrip(secret in secret_strategy()) {
        let bytes = secret.to_bytes();
        prop_assert_eq!(bytes.len(), secret.encoded_len());
        prop_assert_eq!(Secret::from_bytes(&bytes).unwrap(), secret.clone());

        let text = secret.as_str();
        prop_assert_eq!(text.parse::<Secret>().unwrap(), secret);
    }

    /// Addresses survive both the binary and the string form
    #[test]
    fn address_roundtrip(address in address_strategy()) {
        prop_assert_eq!(Address::from_bytes(&address.to_bytes()).unwrap(), address.clone());
        prop_assert_eq!(address.as_str().parse::<Address>().unwrap(), address);
    }

    /// Address digests of the wrong length are rejected
    #[test]
    fn address_length_enforced(len in 0usize..128) {
        prop_assume!(len != 64);
        prop_assert!(Address::new(1, vec![0u8; len]).unwrap_err().is_validation());
    }

    /// Application payloads up to the envelope size round trip
    #[test]
    fn else_payload_roundtrip(payload in prop::collection::vec(any::<u8>(), 0..400)) {
        let message = AsymPayload::Else {
            author: Address::pseudorandom(1).unwrap(),
            payload,
        };
        let bytes = message.to_bytes().unwrap();
        prop_assert_eq!(AsymPayload::from_bytes(&bytes).unwrap(), message);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Any plaintext can be packed into a container and received intact
    #[test]
    fn container_roundtrip(plaintext in prop::collection::vec(any::<u8>(), 0..2048)) {
        let (alice, bob) = parties(1, 1);
        let secret = alice.new_secret();
        let container = alice.make_container(&secret, &plaintext).unwrap();

        let received = bob.unpack_container(container.as_bytes()).unwrap();
        prop_assert_eq!(&received, &container);
        let opened = bob
            .receive_container(&alice.second_party(), &secret, &received)
            .unwrap();
        prop_assert_eq!(opened, plaintext);
    }

    /// Flipping any byte between the header and the address breaks the
    /// address
    #[test]
    fn prefix_flip_breaks_address(
        target in address_strategy(),
        offset in 0usize..128,
        mask in 1u8..=255,
    ) {
        let (alice, _) = parties(1, 1);
        let binding = alice.make_bind_static(&target).unwrap();
        let mut bytes = binding.as_bytes().to_vec();

        // Skip the algo tags at 9 and 74; they change the layout, not just
        // the digest input
        let index = match 10 + offset {
            i if i >= 74 => i + 1,
            i => i,
        };
        bytes[index] ^= mask;
        let err = StaticBinding::unpack(&bytes, &Registry::production()).unwrap_err();
        prop_assert!(err.is_integrity(), "byte {}: {:?}", index, err);
    }
}
