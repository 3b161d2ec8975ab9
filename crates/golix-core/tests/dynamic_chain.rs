//! Dynamic binding chains across versions

mod common;

use common::{address_offset, init_tracing, parties, readdress, rehash_at, ADDRESS_LEN};
use golix_core::{Address, DynamicBinding, GolixObject};

fn target() -> Address {
    Address::pseudorandom(1).unwrap()
}

#[test]
fn test_second_version_keeps_dynamic_address() {
    init_tracing();
    let (alice, bob) = parties(1, 1);

    let v1 = alice.make_bind_dynamic(&target(), None, 0, Vec::new()).unwrap();
    assert_eq!(v1.counter(), 0);
    assert!(v1.history().is_empty());
    assert_ne!(v1.dynamic_address(), v1.address());

    let new_target = target();
    let v2 = alice
        .make_bind_dynamic(
            &new_target,
            Some(v1.dynamic_address().clone()),
            1,
            vec![v1.address().clone()],
        )
        .unwrap();

    let unpacked = bob.unpack_bind_dynamic(v2.as_bytes()).unwrap();
    assert_eq!(unpacked.dynamic_address(), v1.dynamic_address());
    assert_eq!(unpacked.history(), &[v1.address().clone()]);
    assert_eq!(unpacked.counter(), 1);
    assert_eq!(unpacked.target(), &new_target);
    assert_eq!(unpacked, v2);

    DynamicBinding::verify_succession(&v1, &unpacked).unwrap();
    assert_eq!(
        bob.receive_bind_dynamic(&alice.second_party(), &unpacked)
            .unwrap(),
        vec![new_target, v1.address().clone()]
    );
}

#[test]
fn test_advance_builds_history_most_recent_first() {
    for cipher in [1, 2] {
        let (alice, _) = parties(cipher, 1);

        let v1 = alice.make_bind_dynamic(&target(), None, 0, Vec::new()).unwrap();
        let v2 = alice.advance_bind_dynamic(&v1, &target()).unwrap();
        let v3 = alice.advance_bind_dynamic(&v2, &target()).unwrap();

        assert_eq!(v3.counter(), 2);
        assert_eq!(v3.dynamic_address(), v1.dynamic_address());
        assert_eq!(
            v3.history(),
            &[v2.address().clone(), v1.address().clone()]
        );
        DynamicBinding::verify_succession(&v1, &v2).unwrap();
        DynamicBinding::verify_succession(&v2, &v3).unwrap();
        assert_eq!(v3.target_vector().len(), 3);
    }
}

#[test]
fn test_history_and_dynamic_address_travel_together() {
    let (alice, _) = parties(1, 1);
    let v1 = alice.make_bind_dynamic(&target(), None, 0, Vec::new()).unwrap();

    let err = alice
        .make_bind_dynamic(&target(), None, 1, vec![v1.address().clone()])
        .unwrap_err();
    assert!(err.is_validation());

    let err = alice
        .make_bind_dynamic(&target(), Some(v1.dynamic_address().clone()), 1, Vec::new())
        .unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn test_counter_must_match_chain_shape() {
    let (alice, _) = parties(1, 1);
    let v1 = alice.make_bind_dynamic(&target(), None, 0, Vec::new()).unwrap();

    assert!(alice
        .make_bind_dynamic(&target(), None, 5, Vec::new())
        .unwrap_err()
        .is_validation());
    assert!(alice
        .make_bind_dynamic(
            &target(),
            Some(v1.dynamic_address().clone()),
            0,
            vec![v1.address().clone()],
        )
        .unwrap_err()
        .is_validation());
}

#[test]
fn test_succession_rejects_out_of_order_versions() {
    let (alice, bob) = parties(1, 1);
    let v1 = alice.make_bind_dynamic(&target(), None, 0, Vec::new()).unwrap();
    let v2 = alice.advance_bind_dynamic(&v1, &target()).unwrap();
    let v3 = alice.advance_bind_dynamic(&v2, &target()).unwrap();

    // Reversed
    assert!(DynamicBinding::verify_succession(&v2, &v1)
        .unwrap_err()
        .is_validation());
    // Skips a version
    assert!(DynamicBinding::verify_succession(&v1, &v3)
        .unwrap_err()
        .is_validation());
    // Another chain
    let other = bob.make_bind_dynamic(&target(), None, 0, Vec::new()).unwrap();
    let other_next = bob.advance_bind_dynamic(&other, &target()).unwrap();
    assert!(DynamicBinding::verify_succession(&v1, &other_next)
        .unwrap_err()
        .is_validation());
}

#[test]
fn test_fresh_dynamic_address_is_verified_on_unpack() {
    let (alice, bob) = parties(1, 1);
    let v1 = alice.make_bind_dynamic(&target(), None, 0, Vec::new()).unwrap();
    let trailer_len = v1.signature().len();

    let mut bytes = v1.as_bytes().to_vec();
    let dynamic_offset = address_offset(&bytes, trailer_len) - ADDRESS_LEN;
    bytes[dynamic_offset + 1] ^= 0x80;
    readdress(&mut bytes, trailer_len);

    assert!(bob.unpack_bind_dynamic(&bytes).unwrap_err().is_integrity());
}

#[test]
fn test_carried_dynamic_address_is_covered_by_signature() {
    let (alice, bob) = parties(1, 1);
    let v1 = alice.make_bind_dynamic(&target(), None, 0, Vec::new()).unwrap();
    let v2 = alice.advance_bind_dynamic(&v1, &target()).unwrap();
    let trailer_len = v2.signature().len();

    // Swap in another chain's dynamic address and re-address the record
    let mut bytes = v2.as_bytes().to_vec();
    let dynamic_offset = address_offset(&bytes, trailer_len) - ADDRESS_LEN;
    let foreign = target().to_bytes();
    bytes[dynamic_offset..dynamic_offset + ADDRESS_LEN].copy_from_slice(&foreign);
    let offset = address_offset(&bytes, trailer_len);
    rehash_at(&mut bytes, offset);

    let forged = bob.unpack_bind_dynamic(&bytes).unwrap();
    assert_ne!(forged.dynamic_address(), v1.dynamic_address());
    assert!(bob
        .receive_bind_dynamic(&alice.second_party(), &forged)
        .unwrap_err()
        .is_security());
}

/// Offset of the low byte of the counter behind the header and binder.
const COUNTER_LOW_BYTE: usize = 9 + ADDRESS_LEN + 3;

#[test]
fn test_counter_disagreeing_with_history_is_format_error() {
    let (alice, bob) = parties(1, 1);
    let v1 = alice.make_bind_dynamic(&target(), None, 0, Vec::new()).unwrap();
    let v2 = alice.advance_bind_dynamic(&v1, &target()).unwrap();

    // Fresh chain claiming a later version, both addresses recomputed
    let trailer_len = v1.signature().len();
    let mut bytes = v1.as_bytes().to_vec();
    bytes[COUNTER_LOW_BYTE] = 7;
    let dynamic_offset = address_offset(&bytes, trailer_len) - ADDRESS_LEN;
    rehash_at(&mut bytes, dynamic_offset);
    readdress(&mut bytes, trailer_len);
    assert!(bob.unpack_bind_dynamic(&bytes).unwrap_err().is_format());

    // Continuation rewound to counter 0
    let trailer_len = v2.signature().len();
    let mut bytes = v2.as_bytes().to_vec();
    assert_eq!(bytes[COUNTER_LOW_BYTE], 1);
    bytes[COUNTER_LOW_BYTE] = 0;
    readdress(&mut bytes, trailer_len);
    assert!(bob.unpack_bind_dynamic(&bytes).unwrap_err().is_format());
}
