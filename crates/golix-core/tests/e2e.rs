//! End-to-end scenarios between identities
//!
//! Each test drives records through the same path a deployment would:
//! one identity makes a record, the bytes travel, another identity unpacks
//! them and receives the record against the author's public identity.

mod common;

use common::{init_tracing, parties, readdress, registry_for};
use golix_core::{
    Address, AsymPayload, FirstParty, GolixConfig, GolixObject, ObjectKind, Registry, SecondParty,
    WireObject,
};

/// Cipher / address algorithm pairs exercised by the round-trip tests.
const CONFIGS: [(u8, u8); 3] = [(0, 0), (1, 1), (2, 1)];

/// Offset of a container payload behind an algo-1 author.
const CONTAINER_PAYLOAD_OFFSET: usize = 9 + 65 + 8;

// ============================================================================
// Containers
// ============================================================================

#[test]
fn test_hello_container_scenario() {
    init_tracing();
    let (alice, bob) = parties(1, 1);

    let secret = alice.new_secret();
    let container = alice.make_container(&secret, b"hello").unwrap();
    let bytes = container.as_bytes().to_vec();

    let received = bob.unpack_container(&bytes).unwrap();
    let plaintext = bob
        .receive_container(&alice.second_party(), &secret, &received)
        .unwrap();
    assert_eq!(plaintext, b"hello");
}

#[test]
fn test_tampered_container_payload_is_security_error() {
    init_tracing();
    let (alice, bob) = parties(1, 1);

    let secret = alice.new_secret();
    let container = alice.make_container(&secret, b"hello").unwrap();
    let mut bytes = container.as_bytes().to_vec();
    bytes[CONTAINER_PAYLOAD_OFFSET] ^= 0x01;

    // Without a fresh address the edit is caught at unpack
    assert!(bob.unpack_container(&bytes).unwrap_err().is_integrity());

    // With one it reaches the signature check
    readdress(&mut bytes, container.signature().len());
    let tampered = bob.unpack_container(&bytes).unwrap();
    let err = bob
        .receive_container(&alice.second_party(), &secret, &tampered)
        .unwrap_err();
    assert!(err.is_security(), "got {:?}", err);
}

#[test]
fn test_container_from_wrong_author_rejected() {
    let (alice, bob) = parties(1, 1);
    let secret = alice.new_secret();
    let container = alice.make_container(&secret, b"hello").unwrap();

    let err = alice
        .receive_container(&bob.second_party(), &secret, &container)
        .unwrap_err();
    assert!(err.is_security());
}

#[test]
fn test_container_with_wrong_secret_rejected() {
    let (alice, bob) = parties(2, 1);
    let container = alice.make_container(&alice.new_secret(), b"hello").unwrap();

    let err = bob
        .receive_container(&alice.second_party(), &bob.new_secret(), &container)
        .unwrap_err();
    assert!(err.is_security());
}

#[test]
fn test_empty_container() {
    for (cipher, algo) in CONFIGS {
        let (alice, bob) = parties(cipher, algo);
        let secret = alice.new_secret();
        let container = alice.make_container(&secret, b"").unwrap();
        let received = bob.unpack_container(container.as_bytes()).unwrap();
        let plaintext = bob
            .receive_container(&alice.second_party(), &secret, &received)
            .unwrap();
        assert!(plaintext.is_empty());
    }
}

// ============================================================================
// Round trips for every kind
// ============================================================================

fn all_records(alice: &FirstParty, bob: &FirstParty, algo: u8) -> Vec<WireObject> {
    let target = Address::pseudorandom(algo).unwrap();
    let secret = alice.new_secret();

    let first = alice.make_bind_dynamic(&target, None, 0, Vec::new()).unwrap();
    let second = alice.advance_bind_dynamic(&first, &target).unwrap();

    let mut records = vec![
        WireObject::from(alice.second_party().identity().clone()),
        alice.make_container(&secret, b"round trip").unwrap().into(),
        alice.make_bind_static(&target).unwrap().into(),
        first.into(),
        second.into(),
        alice.make_debind(&target).unwrap().into(),
    ];
    if alice.cipher() != 0 && algo != 0 {
        let ack = alice.make_ack(&target, 200);
        records.push(alice.make_request(&bob.second_party(), &ack).unwrap().into());
    }
    records
}

#[test]
fn test_unpack_reproduces_every_kind() {
    init_tracing();
    for (cipher, algo) in CONFIGS {
        let registry = registry_for(cipher, algo);
        let (alice, bob) = parties(cipher, algo);

        for record in all_records(&alice, &bob, algo) {
            let unpacked = WireObject::unpack(record.as_bytes(), &registry).unwrap();
            assert_eq!(unpacked, record, "({}, {}) {}", cipher, algo, record.kind());
            assert_eq!(unpacked.packed().cipher(), cipher);
            assert_eq!(unpacked.address().algo(), algo);
        }
    }
}

#[test]
fn test_receive_every_signed_kind() {
    for (cipher, algo) in CONFIGS {
        let (alice, bob) = parties(cipher, algo);
        let author = alice.second_party();
        let target = Address::pseudorandom(algo).unwrap();

        let binding = bob
            .unpack_bind_static(alice.make_bind_static(&target).unwrap().as_bytes())
            .unwrap();
        assert_eq!(bob.receive_bind_static(&author, &binding).unwrap(), target);

        let debinding = bob
            .unpack_debind(alice.make_debind(&target).unwrap().as_bytes())
            .unwrap();
        assert_eq!(bob.receive_debind(&author, &debinding).unwrap(), target);

        let dynamic = alice.make_bind_dynamic(&target, None, 0, Vec::new()).unwrap();
        let dynamic = bob.unpack_bind_dynamic(dynamic.as_bytes()).unwrap();
        assert_eq!(
            bob.receive_bind_dynamic(&author, &dynamic).unwrap(),
            vec![target.clone()]
        );
    }
}

#[test]
fn test_production_registry_refuses_test_double_records() {
    let (alice, _) = parties(0, 0);
    let binding = alice
        .make_bind_static(&Address::pseudorandom(0).unwrap())
        .unwrap();

    let err = WireObject::unpack(binding.as_bytes(), &Registry::production()).unwrap_err();
    assert!(err.is_format());
}

// ============================================================================
// Requests
// ============================================================================

#[test]
fn test_handshake_roundtrip() {
    init_tracing();
    for cipher in [1, 2] {
        let (alice, bob) = parties(cipher, 1);

        let secret = alice.new_secret();
        let container = alice.make_container(&secret, b"for bob").unwrap();
        let handshake = alice.make_handshake(container.address(), secret.clone());
        let request = alice.make_request(&bob.second_party(), &handshake).unwrap();
        assert_eq!(request.recipient(), bob.address());

        let request = bob.unpack_request(request.as_bytes()).unwrap();
        let payload = bob.receive_request(&alice.second_party(), &request).unwrap();
        match payload {
            AsymPayload::Handshake {
                author,
                target,
                secret: shared,
            } => {
                assert_eq!(&author, alice.address());
                assert_eq!(&target, container.address());
                assert_eq!(shared, secret);

                let plaintext = bob
                    .receive_container(&alice.second_party(), &shared, &container)
                    .unwrap();
                assert_eq!(plaintext, b"for bob");
            }
            other => panic!("expected a handshake, got {:?}", other),
        }
    }
}

#[test]
fn test_ack_nak_else_roundtrip() {
    let (alice, bob) = parties(1, 1);
    let target = Address::pseudorandom(1).unwrap();

    for payload in [
        bob.make_ack(&target, 0),
        bob.make_nak(&target, 403),
        bob.make_else(b"application bytes".to_vec()),
    ] {
        let request = bob.make_request(&alice.second_party(), &payload).unwrap();
        let request = alice.unpack_request(request.as_bytes()).unwrap();
        let received = alice.receive_request(&bob.second_party(), &request).unwrap();
        assert_eq!(received, payload);
    }
}

#[test]
fn test_request_for_someone_else_rejected() {
    let (alice, bob) = parties(1, 1);
    let (carol, _) = parties(1, 1);

    let request = alice
        .make_request(&bob.second_party(), &alice.make_else(vec![1, 2, 3]))
        .unwrap();
    let err = carol
        .receive_request(&alice.second_party(), &request)
        .unwrap_err();
    assert!(err.is_security());
}

#[test]
fn test_request_from_wrong_requestor_rejected() {
    let (alice, bob) = parties(1, 1);
    let (carol, _) = parties(1, 1);

    let request = alice
        .make_request(&bob.second_party(), &alice.make_else(vec![1, 2, 3]))
        .unwrap();
    let err = bob
        .receive_request(&carol.second_party(), &request)
        .unwrap_err();
    assert!(err.is_security());
}

#[test]
fn test_request_across_suites_rejected() {
    let (alice, _) = parties(1, 1);
    let (bob, _) = parties(2, 1);

    let err = alice
        .make_request(&bob.second_party(), &alice.make_else(Vec::new()))
        .unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn test_oversized_request_payload_rejected() {
    let (alice, bob) = parties(1, 1);
    let err = alice
        .make_request(&bob.second_party(), &alice.make_else(vec![0u8; 1024]))
        .unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn test_test_double_suite_refuses_requests() {
    init_tracing();
    let (alice, bob) = parties(0, 0);
    let err = alice
        .make_request(&bob.second_party(), &alice.make_else(vec![1]))
        .unwrap_err();
    assert!(err.is_validation());

    // A real suite with the test-double address algorithm is refused too
    let sender = FirstParty::generate_with(Registry::testing(), 1, 1).unwrap();
    let receiver = FirstParty::generate_with(Registry::testing(), 1, 0).unwrap();
    let request = sender
        .make_request(&receiver.second_party(), &sender.make_else(vec![1]))
        .unwrap();
    let err = receiver
        .receive_request(&sender.second_party(), &request)
        .unwrap_err();
    assert!(err.is_validation());
    let err = receiver
        .make_request(&sender.second_party(), &receiver.make_else(vec![1]))
        .unwrap_err();
    assert!(err.is_validation());
}

// ============================================================================
// Identities
// ============================================================================

#[test]
fn test_second_party_from_packed_identity() {
    let (alice, _) = parties(2, 1);
    let public = SecondParty::from_packed(alice.second_party().as_bytes(), &Registry::production())
        .unwrap();
    assert_eq!(public.address(), alice.address());
    assert_eq!(public.cipher(), 2);
    assert_eq!(public.identity().packed().kind(), ObjectKind::IdentityContainer);
}

#[test]
fn test_config_driven_generation() {
    let config = GolixConfig::from_json(r#"{ "default_cipher": 2 }"#).unwrap();
    let party = FirstParty::generate(&config).unwrap();
    assert_eq!(party.cipher(), 2);
    assert_eq!(party.address_algo(), 1);

    let testing = FirstParty::generate(&GolixConfig::testing()).unwrap();
    assert_eq!(testing.cipher(), 0);
    assert_eq!(testing.address_algo(), 0);
}

#[test]
fn test_third_party_verifies_on_behalf_of_others() {
    init_tracing();
    let (alice, bob) = parties(1, 1);
    let (server, _) = parties(1, 1);
    let observer = server.third_party();
    assert_eq!(observer.address(), server.address());

    let target = Address::pseudorandom(1).unwrap();
    let binding = alice.make_bind_static(&target).unwrap();
    let wire = WireObject::unpack(binding.as_bytes(), &Registry::production()).unwrap();
    assert_eq!(wire.kind(), ObjectKind::StaticBinding);

    observer.verify_object(&alice.second_party(), &wire).unwrap();
    assert!(observer
        .verify_object(&bob.second_party(), &wire)
        .unwrap_err()
        .is_security());

    let identity = WireObject::from(alice.second_party().identity().clone());
    observer.verify_object(&alice.second_party(), &identity).unwrap();
    assert!(observer
        .verify_object(&bob.second_party(), &identity)
        .unwrap_err()
        .is_security());

    let request = alice
        .make_request(&bob.second_party(), &alice.make_ack(&target, 0))
        .unwrap();
    assert!(observer
        .verify_object(&alice.second_party(), &WireObject::from(request))
        .unwrap_err()
        .is_validation());
}
